use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use super::{JobError, JobResult};

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// Minimal GraphQL-over-HTTP client: one POST per document.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(endpoint: impl Into<String>) -> JobResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> JobResult<T> {
        tracing::debug!(endpoint = %self.endpoint, "sending GraphQL request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;
        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(JobError::GraphQl(messages.join("; ")));
        }
        envelope.data.ok_or(JobError::MissingData)
    }
}
