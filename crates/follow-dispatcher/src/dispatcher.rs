use std::sync::Arc;

use async_trait::async_trait;
use farcaster_signer::Session;
use neynar_client::{Fid, NeynarClient};
use tracing::{error, info};

use crate::error::DispatchError;

/// The provider's batch follow endpoint
#[async_trait]
pub trait FollowApi: Send + Sync {
    async fn follow(&self, credential_id: &str, targets: &[Fid]) -> neynar_client::Result<()>;
}

#[async_trait]
impl FollowApi for NeynarClient {
    async fn follow(&self, credential_id: &str, targets: &[Fid]) -> neynar_client::Result<()> {
        self.follow_users(credential_id, targets).await
    }
}

/// Outcome of one batch follow
///
/// The batch is all-or-nothing: there is no per-target detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowBatchResult {
    pub succeeded: bool,
    pub target_count: usize,
    pub failure_reason: Option<DispatchError>,
}

impl FollowBatchResult {
    fn success(target_count: usize) -> Self {
        Self {
            succeeded: true,
            target_count,
            failure_reason: None,
        }
    }

    fn failure(target_count: usize, reason: DispatchError) -> Self {
        Self {
            succeeded: false,
            target_count,
            failure_reason: Some(reason),
        }
    }

    /// The number of accounts followed, or why none were
    pub fn into_result(self) -> Result<usize, DispatchError> {
        match self.failure_reason {
            None => Ok(self.target_count),
            Some(reason) => Err(reason),
        }
    }
}

pub struct FollowDispatcher {
    api: Arc<dyn FollowApi>,
}

impl FollowDispatcher {
    pub fn new(api: Arc<dyn FollowApi>) -> Self {
        Self { api }
    }

    /// Follow every target with the session's signer in one request
    pub async fn dispatch_follow(
        &self,
        session: Option<&Session>,
        targets: &[Fid],
    ) -> FollowBatchResult {
        let target_count = targets.len();

        let Some(session) = session.filter(|s| s.is_approved()) else {
            return FollowBatchResult::failure(target_count, DispatchError::NotAuthenticated);
        };
        if targets.is_empty() {
            return FollowBatchResult::failure(target_count, DispatchError::EmptyTargetList);
        }

        info!(
            credential_id = session.credential_id(),
            targets = target_count,
            "Dispatching batch follow"
        );

        match self.api.follow(session.credential_id(), targets).await {
            Ok(()) => {
                info!(targets = target_count, "Batch follow succeeded");
                FollowBatchResult::success(target_count)
            }
            Err(e) => {
                error!(targets = target_count, error = %e, "Batch follow failed");
                FollowBatchResult::failure(target_count, DispatchError::FollowDispatch(e.to_string()))
            }
        }
    }
}
