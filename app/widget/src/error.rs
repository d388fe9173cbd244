//! Widget error taxonomy.

use thiserror::Error;

/// Errors surfaced by [`crate::SessionController`] operations.
///
/// None of these are fatal; the controller stays usable after each.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// A required field was empty. No request was made.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The backend did not start a session. The visitor may retry.
    #[error("failed to start chat: {0}")]
    StartFailed(#[from] StartError),
    /// Connection-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failure of the session-start request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),
    /// The backend answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),
    /// The response body was not a valid start response.
    #[error("invalid response: {0}")]
    Response(String),
}
