//! Error types for the Cook Me client.

use crate::orchestrator::{UploadEvent, UploadPhase};
use cookme_core::{CoreError, DraftError, RecipeId};
use thiserror::Error;

/// Errors that can occur when talking to the Cook Me API or running a
/// client-side workflow.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server answered 2xx with `status: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Authentication required but no token available (or token refused)
    #[error("Authentication required")]
    AuthRequired,

    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Local image not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Persisted token could not be read, written or removed
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draft failed validation; the message is user-facing
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// A recipe submission is already running
    #[error("A recipe submission is already in progress")]
    SubmissionInProgress,

    /// The recipe was saved but its cover image could not be uploaded
    #[error("Recipe {recipe_id} saved but cover upload failed: {source}")]
    CoverUploadFailed {
        recipe_id: RecipeId,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Invalid upload transition: {event:?} in phase {from:?}")]
    InvalidTransition { from: UploadPhase, event: UploadEvent },

    /// Deep link could not be interpreted
    #[error("Invalid deep link: {0}")]
    DeepLink(String),
}

impl ClientError {
    /// Whether the error came from the transport rather than the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::ServerUnreachable(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
