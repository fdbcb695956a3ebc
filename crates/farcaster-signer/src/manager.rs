//! Signer session state machine
//!
//! `Unauthenticated` (no current session) → `PendingApproval` → `Approved`.
//! The store is written only on those transitions and on sign-out.

use std::sync::Arc;

use neynar_client::SignerStatus;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::api::SignerApi;
use crate::error::{Result, SessionError};
use crate::poller::{self, PollConfig, PollHandle};
use crate::session::Session;
use crate::store::{SessionStore, SESSION_KEY};

/// Owns the current signer session and its persisted copy
pub struct SignerSession {
    api: Arc<dyn SignerApi>,
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SignerSession {
    pub fn new(api: Arc<dyn SignerApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            current: RwLock::new(None),
        }
    }

    /// Snapshot of the current session, `None` when signed out
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Issue a new signer and persist it as pending approval
    ///
    /// On failure the current session and the store are left as they were.
    pub async fn create_session(&self) -> Result<Session> {
        let record = self.api.issue_signer().await.map_err(|e| {
            error!(error = %e, "Signer issuance failed");
            SessionError::Issuance(e.to_string())
        })?;

        let session =
            Session::try_from(record).map_err(|e| SessionError::Issuance(e.to_string()))?;
        if !session.is_pending() {
            return Err(SessionError::Issuance(format!(
                "signer {} was issued in state {:?}, expected pending approval",
                session.credential_id(),
                session.status()
            )));
        }

        let mut current = self.current.write().await;
        self.persist(&session).await?;
        *current = Some(session.clone());
        drop(current);

        info!(
            credential_id = session.credential_id(),
            "Signer issued, waiting for approval"
        );
        Ok(session)
    }

    /// Restore whatever session was stored last, without re-validating it
    pub async fn load_persisted_session(&self) -> Result<Option<Session>> {
        let Some(raw) = self.store.get(SESSION_KEY).await? else {
            debug!("No persisted session");
            return Ok(None);
        };

        let session: Session = serde_json::from_str(&raw)?;
        info!(
            credential_id = session.credential_id(),
            status = ?session.status(),
            "Loaded persisted session"
        );
        *self.current.write().await = Some(session.clone());
        Ok(Some(session))
    }

    /// Check the signer's status once
    ///
    /// Returns the approved session once the signer service confirms
    /// approval, otherwise `session` unchanged. Failures are logged and count
    /// as "no change". A session that is no longer the current pending one
    /// (signed out or replaced) is never approved or written.
    pub async fn poll_once(&self, session: Session) -> Session {
        match self.poll_step(session).await {
            PollStep::Approved(session)
            | PollStep::Unchanged(session)
            | PollStep::Superseded(session) => session,
        }
    }

    pub(crate) async fn poll_step(&self, session: Session) -> PollStep {
        if !session.is_pending() {
            return PollStep::Unchanged(session);
        }
        if !holds_pending(self.current.read().await.as_ref(), &session) {
            debug!(
                credential_id = session.credential_id(),
                "Session is no longer current, skipping poll"
            );
            return PollStep::Superseded(session);
        }

        match self.check_approval(&session).await {
            Ok(step) => step.unwrap_or(PollStep::Unchanged(session)),
            Err(e) => {
                warn!(
                    credential_id = session.credential_id(),
                    error = %e,
                    "Signer poll failed, will retry on next tick"
                );
                PollStep::Unchanged(session)
            }
        }
    }

    async fn check_approval(&self, session: &Session) -> Result<Option<PollStep>> {
        let record = self
            .api
            .signer_status(session.credential_id())
            .await
            .map_err(|e| SessionError::PollTransport(e.to_string()))?;

        if record.status != SignerStatus::Approved {
            debug!(
                credential_id = session.credential_id(),
                status = ?record.status,
                "Signer not approved yet"
            );
            return Ok(None);
        }

        if record.signer_uuid != session.credential_id() {
            return Err(SessionError::PollTransport(format!(
                "status response was for signer {}",
                record.signer_uuid
            )));
        }
        let account_id = record.fid.ok_or_else(|| {
            SessionError::PollTransport("approved signer response has no fid".to_string())
        })?;

        // Sign-out or a new sign-in may have happened while the request was out
        let mut current = self.current.write().await;
        if !holds_pending(current.as_ref(), session) {
            info!(
                credential_id = session.credential_id(),
                "Approval arrived for a session that is no longer current, discarding"
            );
            return Ok(Some(PollStep::Superseded(session.clone())));
        }

        let approved = session.clone().approve(account_id);
        self.persist(&approved)
            .await
            .map_err(|e| SessionError::PollTransport(e.to_string()))?;
        *current = Some(approved.clone());
        drop(current);

        info!(
            credential_id = approved.credential_id(),
            fid = %account_id,
            "Signer approved"
        );
        Ok(Some(PollStep::Approved(approved)))
    }

    /// Forget the session locally and in the store
    pub async fn sign_out(&self) -> Result<()> {
        let mut current = self.current.write().await;
        self.store.remove(SESSION_KEY).await?;
        *current = None;
        drop(current);
        info!("Signed out");
        Ok(())
    }

    /// Poll `session` in the background until it is approved
    pub fn start_polling(self: &Arc<Self>, session: Session, config: PollConfig) -> PollHandle {
        poller::spawn(Arc::clone(self), session, config)
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, json).await?;
        Ok(())
    }
}

/// Result of one status check, as seen by the poller
#[derive(Debug)]
pub(crate) enum PollStep {
    Unchanged(Session),
    Approved(Session),
    /// The manager no longer holds this session as pending
    Superseded(Session),
}

fn holds_pending(current: Option<&Session>, session: &Session) -> bool {
    current.is_some_and(|c| c.is_pending() && c.credential_id() == session.credential_id())
}
