use thiserror::Error;

/// Domain error taxonomy for the settlement service.
///
/// Every variant except `Internal` carries a client-safe message; `Internal`
/// wraps the source error for server-side logging and is surfaced to clients
/// as a generic message at the HTTP boundary.
#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("payment processor error: {0}")]
    ExternalService(String),
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SettlementError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

impl From<std::io::Error> for SettlementError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for SettlementError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Internal(Box::new(err))
    }
}

impl From<serde_json::Error> for SettlementError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, SettlementError>;
