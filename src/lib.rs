#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]
#![allow(clippy::collapsible_else_if)]

pub mod chart;
pub mod config;
pub mod core;
pub mod error;
pub mod insight;
pub mod logging;
pub mod services;
pub mod table;

// Re-export commonly used types
pub use chart::{ChartKind, ChartOutcome, DiagnosticPlaceholder, RenderSpec, normalize};
pub use crate::core::{Answer, Row, TriadId};
pub use error::{DashboardError, Result};
pub use insight::{Insight, InsightEngine, InsightKind, interpret};
pub use services::{DashboardSession, OrchestratorClient, OrchestratorResponse};
pub use table::{FilterState, PageState, SortState, TableAction, TableState, TableView, view};
