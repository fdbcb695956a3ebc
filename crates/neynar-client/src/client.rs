//! Neynar and signer service HTTP client

use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LookupError, NeynarError, Result};
use crate::types::{Fid, FollowRequest, SignerRecord, UserByUsernameResponse, UserSummary};

const DEFAULT_API_URL: &str = "https://api.neynar.com/v2";
const DEFAULT_SIGNER_SERVICE_URL: &str = "http://localhost:3000";
const DEFAULT_VIEWER_FID: u64 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CACHE_TTL_SECS: u64 = 300; // 5 minutes

/// Connection settings for [`NeynarClient`]
#[derive(Debug, Clone)]
pub struct NeynarConfig {
    pub api_key: String,
    /// Neynar v2 base URL
    pub api_url: String,
    /// Base URL of the backend that issues and tracks signers
    pub signer_service_url: String,
    /// Viewer fid sent along with username lookups
    pub viewer_fid: u64,
    pub timeout: Duration,
}

impl NeynarConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            signer_service_url: DEFAULT_SIGNER_SERVICE_URL.to_string(),
            viewer_fid: DEFAULT_VIEWER_FID,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Client for the signer service and the Neynar v2 API
///
/// Successful username lookups are cached for five minutes. Failed lookups
/// are never cached.
pub struct NeynarClient {
    http: reqwest::Client,
    api_url: String,
    signer_service_url: String,
    api_key: String,
    viewer_fid: u64,
    fid_cache: Cache<String, Fid>,
}

impl NeynarClient {
    /// Create a client against the public Neynar API with default settings
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(NeynarConfig::new(api_key))
    }

    pub fn with_config(config: NeynarConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        let fid_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            signer_service_url: config.signer_service_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            viewer_fid: config.viewer_fid,
            fid_cache,
        })
    }

    /// Ask the signer service to issue a new signer
    pub async fn create_signer(&self) -> Result<SignerRecord> {
        let url = format!("{}/api/signer", self.signer_service_url);
        let response = self.http.post(&url).send().await?;
        read_json(response).await
    }

    /// Fetch the current state of a signer
    pub async fn lookup_signer(&self, signer_uuid: &str) -> Result<SignerRecord> {
        let url = format!(
            "{}/api/signer?signer_uuid={}",
            self.signer_service_url,
            urlencoding::encode(signer_uuid)
        );
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Look up a user by username
    ///
    /// Returns `Ok(None)` when the directory has no such user.
    pub async fn user_by_username(&self, username: &str) -> Result<Option<UserSummary>> {
        let url = format!(
            "{}/farcaster/user/by_username?username={}&viewer_fid={}",
            self.api_url,
            urlencoding::encode(username),
            self.viewer_fid
        );

        let response = self
            .http
            .get(&url)
            .header("api_key", &self.api_key)
            .header("accept", "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let data: UserByUsernameResponse = read_json(response).await?;
        Ok(data.result.and_then(|r| r.user))
    }

    /// Resolve a roster handle to a fid
    ///
    /// Surrounding whitespace, quote characters and a leading `@` are
    /// stripped before the lookup. No retries.
    pub async fn resolve_handle(&self, handle: &str) -> std::result::Result<Fid, LookupError> {
        let handle = normalize_handle(handle);
        if handle.is_empty() {
            return Err(LookupError::HandleNotFound(String::new()));
        }

        if let Some(fid) = self.fid_cache.get(handle).await {
            return Ok(fid);
        }

        match self.user_by_username(handle).await {
            Ok(Some(user)) => {
                debug!(handle, fid = %user.fid, "Resolved handle");
                self.fid_cache.insert(handle.to_string(), user.fid).await;
                Ok(user.fid)
            }
            Ok(None) => Err(LookupError::HandleNotFound(handle.to_string())),
            Err(e) => {
                debug!(handle, error = %e, "Handle lookup failed");
                Err(e.into())
            }
        }
    }

    /// Follow every fid in `target_fids` with an approved signer
    pub async fn follow_users(&self, signer_uuid: &str, target_fids: &[Fid]) -> Result<()> {
        let url = format!("{}/farcaster/user/follow", self.api_url);
        let body = FollowRequest {
            signer_uuid,
            target_fids,
        };

        let response = self
            .http
            .post(&url)
            .header("api_key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Strip whitespace, quotes and a leading `@` from a handle
pub fn normalize_handle(raw: &str) -> &str {
    let is_noise = |c: char| c.is_whitespace() || c == '"' || c == '\'';
    raw.trim_matches(is_noise)
        .trim_start_matches('@')
        .trim_matches(is_noise)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(NeynarError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
