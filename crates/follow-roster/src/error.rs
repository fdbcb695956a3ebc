//! Error types for roster fetching

use std::fmt;

#[derive(Debug)]
pub enum RosterError {
    Http(reqwest::Error),
    /// The roster export answered with a non-success status
    Fetch { status: u16, url: String },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::Http(err) => write!(f, "Roster HTTP error: {}", err),
            RosterError::Fetch { status, url } => {
                write!(f, "Roster fetch from {} failed with status {}", url, status)
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Http(err) => Some(err),
            RosterError::Fetch { .. } => None,
        }
    }
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        RosterError::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = RosterError::Fetch {
            status: 404,
            url: "https://example/roster.csv".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Roster fetch from https://example/roster.csv failed with status 404"
        );
    }
}
