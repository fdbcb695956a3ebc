use std::env;
use std::path::PathBuf;
use std::time::Duration;

use farcaster_signer::PollConfig;
use follow_roster::SheetSource;
use neynar_client::NeynarConfig;

use crate::error::{AppError, Result};

/// CLI configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub signer_service_url: String,
    pub roster_url: Option<String>,
    pub roster_sheet_id: Option<String>,
    pub session_dir: PathBuf,
    pub poll_interval: Duration,
    pub approval_timeout: Duration,
    pub lookup_concurrency: usize,
    pub viewer_fid: u64,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("NEYNAR_API_KEY");

        let api_url =
            non_empty("NEYNAR_API_URL").unwrap_or_else(|| "https://api.neynar.com/v2".to_string());

        let signer_service_url =
            non_empty("SIGNER_SERVICE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());

        let roster_url = non_empty("ROSTER_URL");
        let roster_sheet_id = non_empty("ROSTER_SHEET_ID");

        let session_dir = non_empty("SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".farcaster-follow"));

        let poll_interval = non_empty("POLL_INTERVAL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(farcaster_signer::DEFAULT_POLL_INTERVAL);

        let approval_timeout = non_empty("APPROVAL_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(600));

        let lookup_concurrency = non_empty("LOOKUP_CONCURRENCY")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1);

        let viewer_fid = non_empty("VIEWER_FID")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3);

        Self {
            api_key,
            api_url,
            signer_service_url,
            roster_url,
            roster_sheet_id,
            session_dir,
            poll_interval,
            approval_timeout,
            lookup_concurrency,
            viewer_fid,
        }
    }

    /// Client settings; the API key may be empty for signer-only commands
    pub fn neynar_config(&self) -> NeynarConfig {
        let mut config = NeynarConfig::new(self.api_key.clone().unwrap_or_default());
        config.api_url = self.api_url.clone();
        config.signer_service_url = self.signer_service_url.clone();
        config.viewer_fid = self.viewer_fid;
        config
    }

    pub fn require_api_key(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(AppError::Config(
                "NEYNAR_API_KEY environment variable is required".to_string(),
            )),
        }
    }

    /// A zero timeout means wait until interrupted
    pub fn poll_config(&self, timeout: Option<Duration>) -> PollConfig {
        let max_wait = timeout.unwrap_or(self.approval_timeout);
        PollConfig {
            interval: self.poll_interval,
            max_wait: (!max_wait.is_zero()).then_some(max_wait),
            visible: true,
        }
    }

    /// `url_override`, then `ROSTER_URL`, then `ROSTER_SHEET_ID`
    pub fn roster_source(&self, url_override: Option<&str>) -> Result<SheetSource> {
        let url = url_override.or(self.roster_url.as_deref());
        let source = match (url, self.roster_sheet_id.as_deref()) {
            (Some(url), _) => SheetSource::new(url)?,
            (None, Some(sheet_id)) => SheetSource::google_sheet(sheet_id)?,
            (None, None) => {
                return Err(AppError::Config(
                    "ROSTER_URL or ROSTER_SHEET_ID environment variable is required".to_string(),
                ))
            }
        };
        Ok(source)
    }
}
