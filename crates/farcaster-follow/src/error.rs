//! Error types for the farcaster-follow CLI

use std::fmt;

use farcaster_signer::SessionError;
use follow_dispatcher::DispatchError;
use follow_roster::RosterError;
use neynar_client::NeynarError;

#[derive(Debug)]
pub enum AppError {
    Config(String),
    Session(SessionError),
    Roster(RosterError),
    Neynar(NeynarError),
    Dispatch(DispatchError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Session(err) => write!(f, "Sign-in error: {}", err),
            AppError::Roster(err) => write!(f, "Roster error: {}", err),
            AppError::Neynar(err) => write!(f, "Neynar error: {}", err),
            AppError::Dispatch(err) => write!(f, "Follow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Session(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Neynar(err) => Some(err),
            AppError::Dispatch(err) => Some(err),
            AppError::Config(_) => None,
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        AppError::Roster(err)
    }
}

impl From<NeynarError> for AppError {
    fn from(err: NeynarError) -> Self {
        AppError::Neynar(err)
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::Dispatch(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for AppError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("NEYNAR_API_KEY is not set".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: NEYNAR_API_KEY is not set"
        );
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = AppError::from(DispatchError::NotAuthenticated);
        assert_eq!(
            format!("{}", err),
            "Follow error: Not signed in with an approved signer"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_session_error_display() {
        let err = AppError::from(SessionError::Issuance("status 503".to_string()));
        assert!(format!("{}", err).starts_with("Sign-in error: "));
        assert!(format!("{}", err).contains("status 503"));
    }

    #[test]
    fn test_neynar_error_display() {
        let err = AppError::from(NeynarError::Api {
            status: 401,
            message: "bad key".to_string(),
        });
        assert!(format!("{}", err).starts_with("Neynar error: "));
    }
}
