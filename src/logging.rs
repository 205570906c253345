use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Log file in the current working directory
pub fn default_log_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(LOG_FILE.as_str()))
}

/// Level filter from `RUST_LOG`, with `level` (WARN when absent) as the
/// default directive
pub fn env_filter(level: Option<tracing::Level>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.unwrap_or(tracing::Level::WARN).into())
        .from_env_lossy()
}

/// Initialize logging with custom path and/or level
pub fn init_with(custom_log_path: Option<PathBuf>, level: Option<tracing::Level>) -> Result<()> {
    let log_path = match custom_log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => default_log_path()?,
    };

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter(level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_named_after_package() {
        assert_eq!(LOG_FILE.as_str(), "sqldash.log");
        assert!(default_log_path().unwrap().ends_with("sqldash.log"));
    }
}
