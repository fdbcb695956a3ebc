//! Error types for follow dispatch

use std::fmt;

/// Why a batch follow did not happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No session, or the session is not approved yet
    NotAuthenticated,
    /// Nothing to follow
    EmptyTargetList,
    /// The follow call itself failed
    FollowDispatch(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotAuthenticated => write!(f, "Not signed in with an approved signer"),
            DispatchError::EmptyTargetList => write!(f, "No accounts to follow"),
            DispatchError::FollowDispatch(msg) => write!(f, "Follow request failed: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {}
