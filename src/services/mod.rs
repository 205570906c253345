pub mod export;
pub mod orchestrator;
pub mod session;

pub use export::{ExportFormat, ExportScope, export_to_path, write_rows};
pub use orchestrator::{OrchestratorClient, OrchestratorRequest, OrchestratorResponse};
pub use session::{DashboardHeader, DashboardSession, DashboardSnapshot, HistoryLine};
