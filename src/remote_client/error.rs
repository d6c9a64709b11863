use thiserror::Error;

/// Errors surfaced by the hosted backend. `NotFound` is a distinct variant
/// so callers can treat "no record yet" as a valid empty state instead of a
/// failure; empty result sets on filtered reads are not errors at all.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("not found")]
    NotFound,

    #[error("remote store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode remote payload: {0}")]
    Decode(#[from] serde_json::Error),
}
