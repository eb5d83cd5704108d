use thiserror::Error;

/// Errors produced while exchanging a query with the remote service.
///
/// All of these collapse into a single error-shaped outcome at the submit
/// boundary; the variants exist so logs can tell a connection failure from a
/// body that would not parse.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),
    #[error("failed to parse response as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
