//! Error types for signer sessions

use std::fmt;

/// Errors from session stores
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "Store I/O error: {}", err),
            StoreError::InvalidKey(key) => write!(f, "Invalid store key: {}", key),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Errors from the signer session state machine
#[derive(Debug)]
pub enum SessionError {
    /// Signer creation failed; the previous session is untouched
    Issuance(String),
    /// A single status poll failed; never surfaced by the polling loop
    PollTransport(String),
    /// A signer record that cannot form a consistent session
    InvalidRecord(String),
    Store(StoreError),
    Serialization(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Issuance(msg) => write!(f, "Signer issuance failed: {}", msg),
            SessionError::PollTransport(msg) => write!(f, "Signer poll failed: {}", msg),
            SessionError::InvalidRecord(msg) => write!(f, "Invalid signer record: {}", msg),
            SessionError::Store(err) => write!(f, "Session store error: {}", err),
            SessionError::Serialization(err) => write!(f, "Session serialization error: {}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(err) => Some(err),
            SessionError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err)
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
