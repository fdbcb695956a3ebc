//! Scripted signer API shared by the manager and poller tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use neynar_client::{Fid, NeynarError, SignerRecord, SignerStatus};

use crate::api::SignerApi;

pub(crate) const APPROVAL_URL: &str = "https://example/approve/abc";

pub(crate) fn pending_record() -> SignerRecord {
    pending_record_for("abc")
}

pub(crate) fn pending_record_for(signer_uuid: &str) -> SignerRecord {
    SignerRecord {
        signer_uuid: signer_uuid.to_string(),
        public_key: "0x01".to_string(),
        status: SignerStatus::PendingApproval,
        signer_approval_url: Some(APPROVAL_URL.to_string()),
        fid: None,
    }
}

pub(crate) fn approved_record(fid: u64) -> SignerRecord {
    SignerRecord {
        status: SignerStatus::Approved,
        signer_approval_url: None,
        fid: Some(Fid(fid)),
        ..pending_record()
    }
}

pub(crate) fn server_error() -> NeynarError {
    NeynarError::Api {
        status: 503,
        message: "unavailable".to_string(),
    }
}

/// Answers issuance with `issued` and status polls from a script, falling
/// back to a pending record once the script runs out
pub(crate) struct ScriptedApi {
    issued: Mutex<VecDeque<neynar_client::Result<SignerRecord>>>,
    polls: Mutex<VecDeque<neynar_client::Result<SignerRecord>>>,
    poll_delay: Duration,
    issue_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl ScriptedApi {
    pub(crate) fn new(
        issued: neynar_client::Result<SignerRecord>,
        polls: Vec<neynar_client::Result<SignerRecord>>,
    ) -> Self {
        Self {
            issued: Mutex::new(VecDeque::from([issued])),
            polls: Mutex::new(polls.into()),
            poll_delay: Duration::ZERO,
            issue_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    /// Answer the next issuance with `record`
    pub(crate) fn then_issue(self, record: SignerRecord) -> Self {
        self.issued.lock().unwrap().push_back(Ok(record));
        self
    }

    /// Keep each status request in flight for `delay`
    pub(crate) fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub(crate) fn issue_calls(&self) -> usize {
        self.issue_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignerApi for ScriptedApi {
    async fn issue_signer(&self) -> neynar_client::Result<SignerRecord> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        self.issued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(server_error()))
    }

    async fn signer_status(&self, credential_id: &str) -> neynar_client::Result<SignerRecord> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        if !self.poll_delay.is_zero() {
            tokio::time::sleep(self.poll_delay).await;
        }
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(pending_record_for(credential_id)))
    }
}
