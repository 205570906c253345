use crate::core::types::{ColumnSet, Row, TriadId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Reads an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Execution metadata reported alongside a result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub row_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: ColumnSet,
    /// Fractional timings are kept and rounded for display
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_time_ms: f64,
}

/// Result of executing the generated SQL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: QueryMetadata,
}

/// Visualization suggested by the orchestrator.
///
/// `confidence` and `reasoning` are opaque display values; they are never
/// recomputed or validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSuggestion {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    /// Loosely-typed chart descriptor, normalized by the chart adapter
    #[serde(default)]
    pub config: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

impl DashboardSuggestion {
    /// Confidence as a whole percentage for display
    pub fn confidence_percent(&self) -> i64 {
        (self.confidence * 100.0).round() as i64
    }
}

/// Figures shown above the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFigures {
    pub row_count: u64,
    pub column_count: usize,
    pub execution_time_ms: u64,
}

/// The atomic unit delivered for one answered question: rows, column order
/// and chart descriptor, plus the context they came with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub id: TriadId,
    pub question: String,
    pub sql: String,
    pub result: QueryResult,
    pub dashboard: DashboardSuggestion,
}

impl Answer {
    pub fn new(
        question: impl Into<String>,
        sql: impl Into<String>,
        result: QueryResult,
        dashboard: DashboardSuggestion,
    ) -> Self {
        Self {
            id: TriadId::new(),
            question: question.into(),
            sql: sql.into(),
            result,
            dashboard,
        }
    }

    pub fn rows(&self) -> &[Row] {
        self.result.data.as_deref().unwrap_or(&[])
    }

    pub fn columns(&self) -> &[String] {
        &self.result.metadata.columns
    }

    pub fn chart_descriptor(&self) -> &Value {
        &self.dashboard.config
    }

    pub fn header_figures(&self) -> HeaderFigures {
        HeaderFigures {
            row_count: self.result.metadata.row_count,
            column_count: self.result.metadata.columns.len(),
            execution_time_ms: self.result.metadata.execution_time_ms.round().max(0.0) as u64,
        }
    }
}

/// One answered question kept for replay
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub answer: Arc<Answer>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(answer: Arc<Answer>) -> Self {
        Self {
            answer,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> TriadId {
        self.answer.id
    }

    pub fn question(&self) -> &str {
        &self.answer.question
    }

    /// Leading characters of the SQL text followed by an ellipsis
    pub fn sql_preview(&self, max_chars: usize) -> String {
        let head: String = self.answer.sql.chars().take(max_chars).collect();
        format!("{head}...")
    }

    /// One-line description: record count and suggestion title
    pub fn summary(&self) -> String {
        format!(
            "{} records • {}",
            self.answer.result.metadata.row_count, self.answer.dashboard.title
        )
    }
}

/// Session history, newest entry first. Lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct QueryHistory {
    entries: Vec<HistoryEntry>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered question at the front of the list
    pub fn record(&mut self, answer: Arc<Answer>) -> &HistoryEntry {
        self.entries.insert(0, HistoryEntry::new(answer));
        &self.entries[0]
    }

    pub fn get(&self, id: TriadId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
