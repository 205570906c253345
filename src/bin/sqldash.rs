use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use sqldash::chart::ChartOutcome;
use sqldash::config::Config;
use sqldash::core::types::SortDirection;
use sqldash::logging;
use sqldash::services::{
    DashboardSession, ExportFormat, ExportScope, OrchestratorClient, OrchestratorResponse,
    export_to_path, write_rows,
};
use sqldash::table::{SortState, TableAction, TableView};

/// Ask questions in plain language and explore the answer as a dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum, global = true)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a question to the orchestrator and show the dashboard
    Ask {
        question: String,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the dashboard for a saved orchestrator response
    Show {
        /// JSON file holding an orchestrator response
        response: PathBuf,
        /// Question the response answers, when the file does not carry it
        #[arg(long)]
        question: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// Keep rows whose COLUMN contains PATTERN (case-insensitive). Repeatable.
    #[arg(long = "filter", value_name = "COLUMN=PATTERN", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
    /// Sort by COLUMN, ascending unless suffixed with `:desc`
    #[arg(long, value_name = "COLUMN[:desc]", value_parser = parse_sort)]
    sort: Option<SortState>,
    /// Page to show (1-based, clamped)
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Also write the rows to a file; `.json` files get JSON, anything else
    /// CSV (`.csv` is appended when PATH has no extension)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
    /// Export every filtered row instead of only the shown page
    #[arg(long, requires = "export")]
    all_pages: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat { Text, Json, Csv }

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    let (column, pattern) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=PATTERN, got '{raw}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in '{raw}'"));
    }
    Ok((column.to_string(), pattern.to_string()))
}

fn parse_sort(raw: &str) -> std::result::Result<SortState, String> {
    match raw.rsplit_once(':') {
        Some((column, direction)) if !column.is_empty() => {
            let direction = direction
                .parse::<SortDirection>()
                .map_err(|_| format!("unknown sort direction '{direction}'"))?;
            Ok(SortState::new(column, direction))
        }
        _ if raw.is_empty() => Err("missing sort column".to_string()),
        _ => Ok(SortState::ascending(raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let level = match cli.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn)  => Some(tracing::Level::WARN),
        Some(LogLevel::Info)  => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => None,
    };
    logging::init_with(Some(logging::default_log_path()?), level)?;

    let config = Config::from_path(cli.config.as_deref())?;
    debug!("config loaded: {config:?}");
    let mut session = DashboardSession::new(config);

    let (outcome, view) = match cli.command {
        Command::Ask { question, view } => {
            let client = OrchestratorClient::new(&session.config().orchestrator)?;
            (client.ask(&question).await, view)
        }
        Command::Show { response, question, view } => {
            let body = std::fs::read_to_string(&response)?;
            let outcome = OrchestratorResponse::from_json(&body).and_then(|reply| {
                let question = question
                    .or_else(|| reply.question.clone())
                    .unwrap_or_default();
                reply.into_answer(&question)
            });
            (outcome, view)
        }
    };

    // Only failures to acquire an answer become the dashboard's error state
    let outcome = match outcome {
        Err(e) if !e.is_acquisition_failure() => return Err(e.into()),
        other => other,
    };
    if session.apply_outcome(outcome).is_none() {
        let message = session.last_error().unwrap_or("Unknown error").to_string();
        error!("no dashboard: {message}");
        return Err(eyre!(message));
    }

    for (column, pattern) in view.filters {
        session.update_table(TableAction::SetFilter { column, pattern });
    }
    if let Some(sort) = view.sort {
        session.update_table(TableAction::SetSort(sort));
    }
    session.update_table(TableAction::GoToPage(view.page));

    if let Some(path) = &view.export {
        export(&session, path, view.all_pages)?;
    }

    let mut out = io::stdout().lock();
    match view.format {
        OutputFormat::Text => render_text(&session, &mut out)?,
        OutputFormat::Json => {
            let snapshot = session
                .snapshot()
                .ok_or_else(|| eyre!("no dashboard to show"))?;
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let rows = session.export_rows(ExportScope::Page);
            let columns = session.current().map(|a| a.columns().to_vec()).unwrap_or_default();
            write_rows(&mut out, ExportFormat::Csv, &columns, &rows)?;
        }
    }
    Ok(())
}

fn export(session: &DashboardSession, path: &Path, all_pages: bool) -> Result<()> {
    let format = ExportFormat::for_path(path);
    let path = format.target_path(path);
    let scope = if all_pages { ExportScope::All } else { ExportScope::Page };
    let columns = session.current().map(|a| a.columns().to_vec()).unwrap_or_default();
    export_to_path(&path, format, &columns, &session.export_rows(scope))?;
    eprintln!("Wrote {scope} rows to {}", path.display());
    Ok(())
}

fn render_text(session: &DashboardSession, out: &mut impl Write) -> Result<()> {
    let Some(header) = session.header() else {
        return Ok(());
    };
    writeln!(
        out,
        "{}  ({}, confidence {}%)",
        header.title, header.suggestion, header.confidence_percent
    )?;
    if !header.description.is_empty() {
        writeln!(out, "{}", header.description)?;
    }
    writeln!(
        out,
        "{} records • {} columns • {} ms",
        header.figures.row_count, header.figures.column_count, header.figures.execution_time_ms
    )?;
    if !header.reasoning.is_empty() {
        writeln!(out, "Why: {}", header.reasoning)?;
    }
    writeln!(out)?;

    match session.chart() {
        Some(ChartOutcome::Render(spec)) => writeln!(
            out,
            "Chart: {} {} ({}), {} series over {} categories",
            spec.orientation,
            spec.kind,
            spec.title(),
            spec.data.datasets.len(),
            spec.data.labels.len()
        )?,
        Some(ChartOutcome::Diagnostic(d)) => {
            writeln!(out, "Chart unavailable: {}", d.reason)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&d.raw)?)?;
        }
        None => {}
    }

    if let Some(insights) = session.insights() {
        writeln!(out, "\nInsights")?;
        for insight in insights {
            writeln!(out, "  - {}: {}", insight.title, insight.message)?;
        }
    }
    writeln!(out)?;

    if let Some(view) = session.table_view() {
        render_table(&view, out)?;
        let buttons: Vec<String> = session.page_buttons().iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "{}  |  page {} of {}  [{}]",
            view.caption(),
            view.page_index,
            view.total_pages,
            buttons.join(" ")
        )?;
        if view.filters_active {
            writeln!(out, "(filters active)")?;
        }
    }
    Ok(())
}

fn render_table(view: &TableView<'_>, out: &mut impl Write) -> Result<()> {
    let headers: Vec<String> = view
        .columns
        .iter()
        .map(|c| match c.sort {
            Some(direction) => format!("{} {}", c.name, direction.indicator()),
            None => c.name.clone(),
        })
        .collect();
    let cells = view.cells();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    writeln!(out, "{}", line(&headers).trim_end())?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    )?;
    if view.is_empty() {
        writeln!(out, "(no records)")?;
    }
    for row in &cells {
        writeln!(out, "{}", line(row).trim_end())?;
    }
    Ok(())
}
