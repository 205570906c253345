//! Boundary with the orchestrator service, which turns a question into SQL,
//! runs it and suggests a visualization in a single call.
//!
//! Everything the orchestrator sends is decoded into one [`Answer`]; a reply
//! that cannot become a complete answer is an error for that question.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::OrchestratorConfig;
use crate::core::models::{Answer, DashboardSuggestion, QueryMetadata, QueryResult};
use crate::core::types::{Row, columns_from_rows};
use crate::error::{DashboardError, Result};

/// Body of the question request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorRequest<'a> {
    pub question: &'a str,
    pub schema: Option<Value>,
    pub context: Option<Value>,
    pub examples: Option<Value>,
}

impl<'a> OrchestratorRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self {
            question,
            schema: None,
            context: None,
            examples: None,
        }
    }
}

/// Raw orchestrator reply. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Echo of the question, when the orchestrator sends it back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QueryMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardSuggestion>,
}

impl OrchestratorResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Turn the reply into the answer for `question`.
    ///
    /// Missing metadata is rebuilt from the rows. A reply without rows or
    /// without a dashboard suggestion is rejected.
    pub fn into_answer(self, question: &str) -> Result<Answer> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Processing failed".to_string());
            return Err(DashboardError::UpstreamFailure(message));
        }
        let Some(rows) = self.data else {
            return Err(DashboardError::UpstreamFailure(
                "Query returned no data".to_string(),
            ));
        };
        let metadata = self.metadata.unwrap_or_else(|| synthesize_metadata(&rows));
        let dashboard = self.dashboard.ok_or(DashboardError::MissingSuggestion)?;

        let result = QueryResult {
            success: true,
            data: Some(rows),
            error: None,
            metadata,
        };
        Ok(Answer::new(
            question,
            self.sql.unwrap_or_default(),
            result,
            dashboard,
        ))
    }
}

/// Metadata for a reply that carried rows but no metadata block
pub fn synthesize_metadata(rows: &[Row]) -> QueryMetadata {
    QueryMetadata {
        row_count: rows.len() as u64,
        columns: columns_from_rows(rows),
        execution_time_ms: 0.0,
    }
}

/// Async client for the orchestrator endpoint
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    http: reqwest::Client,
    url: String,
}

impl OrchestratorClient {
    pub fn new(config: &OrchestratorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask one question and decode the reply into an answer
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        info!("asking orchestrator at {}: {question}", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&OrchestratorRequest::new(question))
            .send()
            .await
            .inspect_err(|e| error!("orchestrator request failed: {e}"))?;

        if !response.status().is_success() {
            error!("orchestrator answered HTTP {}", response.status());
            return Err(DashboardError::UpstreamFailure(
                "Failed to process query".to_string(),
            ));
        }

        let body: OrchestratorResponse = response.json().await?;
        debug!(
            success = body.success,
            rows = body.data.as_ref().map(Vec::len),
            "orchestrator reply decoded"
        );
        body.into_answer(question)
            .inspect_err(|e| error!("orchestrator reply rejected: {e}"))
    }
}
