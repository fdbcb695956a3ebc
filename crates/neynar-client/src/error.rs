//! Error types for the Neynar client

use std::fmt;

/// Errors that can occur when talking to Neynar or the signer service
#[derive(Debug)]
pub enum NeynarError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Server answered with a non-success status
    Api { status: u16, message: String },
    /// Failed to parse JSON response
    Json(serde_json::Error),
}

impl fmt::Display for NeynarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Neynar HTTP error: {}", e),
            Self::Api { status, message } => {
                write!(f, "Neynar API error (status {}): {}", status, message)
            }
            Self::Json(e) => write!(f, "Neynar JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for NeynarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for NeynarError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for NeynarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for Neynar API operations
pub type Result<T> = std::result::Result<T, NeynarError>;

/// Why a username could not be turned into a fid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The directory has no user with this handle
    HandleNotFound(String),
    /// Network, status or parse failure while asking the directory
    Transport(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandleNotFound(handle) => write!(f, "Handle not found: {}", handle),
            Self::Transport(msg) => write!(f, "Lookup transport error: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<NeynarError> for LookupError {
    fn from(e: NeynarError) -> Self {
        Self::Transport(e.to_string())
    }
}
