//! # Query Client
//!
//! This module provides the client for the remote query endpoint. Each call
//! is a single JSON POST with no retry, no timeout, and no status-code
//! branching: whatever JSON the service returns is validated into a
//! [`QueryOutcome`], mirroring the behavior of the browser front-end this
//! client replaces.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::QueryError;
use crate::types::{QueryOutcome, QueryRequest};

/// The client for posting questions to the query endpoint.
pub struct QueryClient {
    client: Client,
    endpoint: String,
}

impl QueryClient {
    /// Create a client for the given endpoint URL.
    pub fn new(endpoint: String) -> Result<Self, QueryError> {
        let client = Client::builder().build().map_err(QueryError::ClientBuild)?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one question and validate the response.
    ///
    /// Error responses the service encodes in its body (`{"error": ...}`)
    /// come back as `Ok(QueryOutcome::Error { .. })`; only transport and
    /// parse failures surface as `Err`.
    pub async fn ask(&self, request: &QueryRequest) -> Result<QueryOutcome, QueryError> {
        debug!("posting question to {} with k={}", self.endpoint, request.k);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(QueryError::Request)?;

        let body = response.text().await.map_err(QueryError::Body)?;
        let value: Value = serde_json::from_str(&body)?;

        Ok(QueryOutcome::from_json(value))
    }
}
