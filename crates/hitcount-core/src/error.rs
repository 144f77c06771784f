//! Shared error type across hitcount crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request body.
    BadRequest,
    /// Counter store unreachable or write rejected.
    Storage,
    /// Invalid or unreadable configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Storage => "STORAGE",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HitCountError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum HitCountError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HitCountError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            HitCountError::BadRequest(_) => ClientCode::BadRequest,
            HitCountError::Storage(_) => ClientCode::Storage,
            HitCountError::Config(_) => ClientCode::Config,
            HitCountError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether the message may be echoed to clients verbatim.
    pub fn is_client_visible(&self) -> bool {
        matches!(self, HitCountError::BadRequest(_))
    }
}
