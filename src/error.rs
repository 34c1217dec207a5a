use thiserror::Error;

/// Failures on the load path: CSV ingestion, the NOC join, and model
/// artifact deserialization. Request handlers never produce these; every
/// endpoint is a pure scan of state built once at startup, so load errors
/// abort the process instead of surfacing per-request.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
