//! Error taxonomy for acquiring query answers.
//!
//! Only data acquisition fails loudly. Presentation shaping (malformed chart
//! descriptors, empty data) degrades to values and never reaches this type.
use thiserror::Error;

/// Failures that end the current query and are reported to the user verbatim
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The orchestrator reported `success=false`, or the call itself failed
    #[error("{0}")]
    UpstreamFailure(String),
    /// The orchestrator succeeded but sent no dashboard suggestion
    #[error("Dashboard suggestion missing")]
    MissingSuggestion,
    /// Transport and decode failures are shown as the client reports them
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DashboardError {
    /// True when the failure happened while acquiring the answer
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamFailure(_) | Self::MissingSuggestion | Self::Http(_) | Self::Decode(_)
        )
    }

    /// Message shown to the user in place of the dashboard
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_failure_is_verbatim() {
        let err = DashboardError::UpstreamFailure("relation \"sales\" does not exist".into());
        assert_eq!(err.user_message(), "relation \"sales\" does not exist");
        assert!(err.is_acquisition_failure());
    }

    #[test]
    fn test_missing_suggestion_message() {
        assert_eq!(
            DashboardError::MissingSuggestion.to_string(),
            "Dashboard suggestion missing"
        );
    }

    #[test]
    fn test_decode_failure_is_verbatim() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let expected = source.to_string();
        let err = DashboardError::from(source);
        assert_eq!(err.user_message(), expected);
        assert!(err.is_acquisition_failure());
    }

    #[test]
    fn test_io_is_not_acquisition_failure() {
        let err = DashboardError::from(std::io::Error::other("disk full"));
        assert!(!err.is_acquisition_failure());
    }
}
