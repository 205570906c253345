//! Dashboard session: the current answer, the table state bound to it and
//! the history of answered questions.
//!
//! The current answer is replaced in a single assignment, so the rows,
//! columns and chart descriptor shown always come from the same answer.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::chart::{ChartOutcome, normalize};
use crate::config::Config;
use crate::core::models::{Answer, HeaderFigures, QueryHistory};
use crate::core::types::{Row, TriadId};
use crate::error::Result;
use crate::insight::{Insight, InsightEngine};
use crate::services::export::ExportScope;
use crate::table::{TableAction, TableState, TableView, arrange, page_buttons};

/// Summary block shown above the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardHeader {
    pub title: String,
    pub description: String,
    /// Suggested visualization as named by the orchestrator
    pub suggestion: String,
    pub confidence_percent: i64,
    pub reasoning: String,
    pub figures: HeaderFigures,
}

/// Everything presented for the current answer, in one serializable value
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub question: &'a str,
    pub sql: &'a str,
    pub header: DashboardHeader,
    pub chart: ChartOutcome,
    pub insights: Option<Vec<Insight>>,
    pub table: TableView<'a>,
    pub page_buttons: Vec<usize>,
}

/// One line of the history list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryLine {
    pub id: TriadId,
    pub question: String,
    pub sql_preview: String,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct DashboardSession {
    config: Config,
    insight_engine: InsightEngine,
    current: Option<Arc<Answer>>,
    table: TableState,
    history: QueryHistory,
    last_error: Option<String>,
}

impl DashboardSession {
    pub fn new(config: Config) -> Self {
        Self {
            insight_engine: InsightEngine::with_config(config.insights),
            table: TableState::with_page_size(config.table.page_size),
            config,
            current: None,
            history: QueryHistory::new(),
            last_error: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current(&self) -> Option<&Answer> {
        self.current.as_deref()
    }

    /// Error message of the last failed question, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn table_state(&self) -> &TableState {
        &self.table
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Install the outcome of one question.
    ///
    /// A success becomes the current answer and is recorded in history. A
    /// failure clears the dashboard and records nothing.
    pub fn apply_outcome(&mut self, outcome: Result<Answer>) -> Option<TriadId> {
        match outcome {
            Ok(answer) => {
                let answer = Arc::new(answer);
                let id = self.history.record(answer.clone()).id();
                info!(%id, rows = answer.rows().len(), "new answer: {}", answer.question);
                self.install(answer);
                self.last_error = None;
                Some(id)
            }
            Err(e) => {
                error!("question failed: {e}");
                self.current = None;
                self.table.reset();
                self.last_error = Some(e.user_message());
                None
            }
        }
    }

    /// Bring a history entry back as the current answer, with a fresh table
    /// state. Returns false when no entry has this id.
    pub fn replay(&mut self, id: TriadId) -> bool {
        let Some(answer) = self.history.get(id).map(|e| e.answer.clone()) else {
            return false;
        };
        info!(%id, "replaying: {}", answer.question);
        self.install(answer);
        self.last_error = None;
        true
    }

    fn install(&mut self, answer: Arc<Answer>) {
        self.current = Some(answer);
        self.table.reset();
    }

    fn rows(&self) -> &[Row] {
        self.current.as_deref().map(Answer::rows).unwrap_or(&[])
    }

    pub fn update_table(&mut self, action: TableAction) {
        let rows = self.current.as_deref().map(Answer::rows).unwrap_or(&[]);
        self.table.update(action, rows);
    }

    pub fn table_view(&self) -> Option<TableView<'_>> {
        let answer = self.current.as_deref()?;
        Some(self.table.view(answer.rows(), answer.columns()))
    }

    /// Page numbers to offer as direct jumps
    pub fn page_buttons(&self) -> Vec<usize> {
        page_buttons(self.table.total_pages(self.rows()), self.config.table.page_buttons)
    }

    /// Rows to export: the whole filtered and sorted set, or the current page
    pub fn export_rows(&self, scope: ExportScope) -> Vec<&Row> {
        match scope {
            ExportScope::All => arrange(self.rows(), &self.table.filters, self.table.sort.as_ref()),
            ExportScope::Page => self
                .table_view()
                .map(|v| v.visible_rows)
                .unwrap_or_default(),
        }
    }

    pub fn header(&self) -> Option<DashboardHeader> {
        let answer = self.current.as_deref()?;
        let dashboard = &answer.dashboard;
        Some(DashboardHeader {
            title: dashboard.title.clone(),
            description: dashboard.description.clone(),
            suggestion: dashboard.kind.clone(),
            confidence_percent: dashboard.confidence_percent(),
            reasoning: dashboard.reasoning.clone(),
            figures: answer.header_figures(),
        })
    }

    /// The chart for the current answer, titled after the suggestion
    pub fn chart(&self) -> Option<ChartOutcome> {
        let answer = self.current.as_deref()?;
        let title = Some(answer.dashboard.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(self.config.chart.default_title.as_str());
        Some(normalize(answer.chart_descriptor(), Some(title)))
    }

    /// Narrative for the current chart; `None` when the chart is a diagnostic
    /// or the data has nothing to describe
    pub fn insights(&self) -> Option<Vec<Insight>> {
        let outcome = self.chart()?;
        let spec = outcome.render_spec()?;
        self.insight_engine.interpret(self.rows(), spec)
    }

    pub fn snapshot(&self) -> Option<DashboardSnapshot<'_>> {
        let answer = self.current.as_deref()?;
        Some(DashboardSnapshot {
            question: &answer.question,
            sql: &answer.sql,
            header: self.header()?,
            chart: self.chart()?,
            insights: self.insights(),
            table: self.table_view()?,
            page_buttons: self.page_buttons(),
        })
    }

    pub fn history_lines(&self) -> Vec<HistoryLine> {
        let max_chars = self.config.history.sql_preview_chars;
        self.history
            .entries()
            .iter()
            .map(|entry| HistoryLine {
                id: entry.id(),
                question: entry.question().to_string(),
                sql_preview: entry.sql_preview(max_chars),
                summary: entry.summary(),
                timestamp: entry.timestamp,
            })
            .collect()
    }
}
