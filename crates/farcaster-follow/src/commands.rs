//! Subcommand implementations

use std::sync::Arc;
use std::time::Duration;

use farcaster_signer::{FileStore, PollOutcome, Session, SessionStatus, SignerSession};
use follow_dispatcher::{DispatchError, FollowDispatcher};
use follow_roster::{ResolveMode, RosterResolver};
use neynar_client::NeynarClient;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;

/// Shared state for every subcommand
pub struct App {
    config: Config,
    client: Arc<NeynarClient>,
    signer: Arc<SignerSession>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(NeynarClient::with_config(config.neynar_config())?);
        let store = Arc::new(FileStore::new(config.session_dir.clone()));
        let signer = Arc::new(SignerSession::new(client.clone(), store));

        Ok(Self {
            config,
            client,
            signer,
        })
    }

    /// Issue a signer (or resume a pending one) and wait for approval
    pub async fn sign_in(&self, timeout: Option<Duration>) -> Result<()> {
        let session = match self.signer.load_persisted_session().await? {
            Some(session) if session.is_approved() => {
                print_session(&session);
                return Ok(());
            }
            Some(session) if session.is_pending() => {
                info!(
                    credential_id = session.credential_id(),
                    "Resuming pending sign-in"
                );
                session
            }
            _ => self.signer.create_session().await?,
        };

        if let Some(url) = session.approval_url() {
            println!("Approve this signer in your Farcaster client:\n\n  {}\n", url);
        }

        let poll_config = self.config.poll_config(timeout);
        let mut handle = self.signer.start_polling(session, poll_config);

        let outcome = tokio::select! {
            outcome = handle.wait() => outcome,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping approval polling");
                PollOutcome::Cancelled
            }
        };
        handle.cancel();

        match outcome {
            PollOutcome::Approved(session) | PollOutcome::NotPending(session) => {
                print_session(&session)
            }
            PollOutcome::TimedOut(_) => {
                println!("Signer was not approved in time. Run sign-in again to keep waiting.")
            }
            PollOutcome::Cancelled => {
                println!("Sign-in interrupted. Run sign-in again to keep waiting.")
            }
        }
        Ok(())
    }

    /// Show the stored session, checking a pending one once
    pub async fn status(&self) -> Result<()> {
        match self.signer.load_persisted_session().await? {
            None => println!("Not signed in"),
            Some(session) => {
                let session = self.signer.poll_once(session).await;
                print_session(&session);
            }
        }
        Ok(())
    }

    /// Resolve the roster and follow every account on it
    pub async fn follow(
        &self,
        roster_url: Option<&str>,
        concurrency: Option<usize>,
        dry_run: bool,
    ) -> Result<()> {
        self.config.require_api_key()?;

        let session = self.signer.load_persisted_session().await?;
        if !dry_run && !session.as_ref().is_some_and(Session::is_approved) {
            return Err(DispatchError::NotAuthenticated.into());
        }

        let source = self.config.roster_source(roster_url)?;
        let text = source.fetch().await?;

        let mode = ResolveMode::with_limit(concurrency.unwrap_or(self.config.lookup_concurrency));
        let report = RosterResolver::new(self.client.clone())
            .with_mode(mode)
            .resolve(&text)
            .await;

        for row in &report.unresolved {
            warn!(line = row.line, handle = %row.handle, error = %row.reason, "Unresolved roster row");
        }
        println!(
            "Roster: {} accounts to follow ({} unresolved, {} malformed, {} duplicates)",
            report.targets.len(),
            report.unresolved.len(),
            report.malformed,
            report.duplicates
        );

        if dry_run {
            for fid in &report.targets {
                println!("  {}", fid);
            }
            return Ok(());
        }

        let dispatcher = FollowDispatcher::new(self.client.clone());
        let followed = dispatcher
            .dispatch_follow(session.as_ref(), &report.targets)
            .await
            .into_result()?;
        println!("Followed {} accounts", followed);
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.signer.sign_out().await?;
        println!("Signed out");
        Ok(())
    }
}

fn print_session(session: &Session) {
    match session.status() {
        SessionStatus::Approved { account_id } => println!(
            "Signed in as fid {} (signer {})",
            account_id,
            session.credential_id()
        ),
        SessionStatus::PendingApproval { approval_url } => println!(
            "Waiting for approval of signer {}: {}",
            session.credential_id(),
            approval_url
        ),
        SessionStatus::Created => println!("Signer {} has not been approved", session.credential_id()),
    }
}
