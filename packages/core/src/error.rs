//! Error taxonomy shared by both adapters.

use crate::verb::Verb;

/// Errors surfaced by handlers and the dispatch machinery.
///
/// Every variant maps to an HTTP-style status via [`ApiError::status_code`];
/// adapters convert each error into a response envelope at their boundary,
/// so no variant ever reaches a caller unconverted.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or incomplete inbound request. Client error, never fatal.
    #[error("invalid request: {reason}")]
    Validation { reason: String },

    /// No handler resolves for the requested verb + resource.
    #[error("no handler for {verb} {resource}")]
    NotFound { verb: Verb, resource: String },

    /// A downstream dependency returned a non-success status; the status is
    /// forwarded verbatim.
    #[error("upstream returned status {code}")]
    Upstream { code: u16 },

    /// Anything unexpected, including failures in the dispatch machinery.
    /// Logged with full detail; callers only ever see the generic status.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP-style status code reported to the caller for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => http::StatusCode::BAD_REQUEST.as_u16(),
            Self::NotFound { .. } => http::StatusCode::NOT_FOUND.as_u16(),
            Self::Upstream { code } => *code,
            Self::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}
