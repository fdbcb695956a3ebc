//! Wire types for the signer service and the Neynar API

use std::fmt;

use serde::{Deserialize, Serialize};

/// Farcaster account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fid(pub u64);

impl Fid {
    /// Parse a roster or CLI field as a non-negative integer fid
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().map(Self)
    }
}

impl fmt::Display for Fid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signer lifecycle status as reported by the signer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerStatus {
    Generated,
    PendingApproval,
    Approved,
}

/// Signer record returned by the signer service
///
/// This is also the shape the local session store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRecord {
    pub signer_uuid: String,
    pub public_key: String,
    pub status: SignerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_approval_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<Fid>,
}

/// Minimal user profile from the username lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub fid: Fid,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserByUsernameResponse {
    pub(crate) result: Option<UserResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResult {
    pub(crate) user: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FollowRequest<'a> {
    pub(crate) signer_uuid: &'a str,
    pub(crate) target_fids: &'a [Fid],
}
