//! Background approval polling
//!
//! One task per [`PollHandle`]. The task owns the only interval timer and
//! drops it whenever the surface becomes hidden, so a resume always arms a
//! fresh interval and two ticks can never overlap. The task also ends as soon
//! as the manager stops holding its session (sign-out or a newer sign-in).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::manager::{PollStep, SignerSession};
use crate::session::Session;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Visibility as seen by the task
///
/// `hides` counts every visible → hidden change, so a hide is noticed even
/// when the surface is visible again before the task looks.
#[derive(Debug, Clone, Copy)]
struct Visibility {
    visible: bool,
    hides: u64,
}

/// Polling settings
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    /// Give up after this long, measured from the start of polling
    pub max_wait: Option<Duration>,
    /// Whether the host surface starts out visible
    pub visible: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
            visible: true,
        }
    }
}

/// How a polling task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Approved(Session),
    /// The session was not pending approval, so nothing was polled
    NotPending(Session),
    TimedOut(Session),
    /// Stopped by the handle, or the session was signed out or replaced
    Cancelled,
}

/// Control surface of a running polling task
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct PollHandle {
    visibility: watch::Sender<Visibility>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    /// Pause (`false`) or resume (`true`) polling
    pub fn set_visible(&self, visible: bool) {
        self.visibility.send_modify(|state| {
            if state.visible && !visible {
                state.hides += 1;
            }
            state.visible = visible;
        });
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the task to end
    ///
    /// If this future is dropped early the task keeps running until the
    /// handle itself is dropped.
    pub async fn wait(&mut self) -> PollOutcome {
        let Some(task) = self.task.as_mut() else {
            return PollOutcome::Cancelled;
        };
        let outcome = task.await.unwrap_or(PollOutcome::Cancelled);
        self.task = None;
        outcome
    }

    /// Stop polling now
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Approval polling cancelled");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

pub(crate) fn spawn(
    manager: Arc<SignerSession>,
    session: Session,
    config: PollConfig,
) -> PollHandle {
    let (visibility, visibility_rx) = watch::channel(Visibility {
        visible: config.visible,
        hides: 0,
    });
    let task = tokio::spawn(run(manager, session, config, visibility_rx));
    PollHandle {
        visibility,
        task: Some(task),
    }
}

async fn run(
    manager: Arc<SignerSession>,
    mut session: Session,
    config: PollConfig,
    mut visibility: watch::Receiver<Visibility>,
) -> PollOutcome {
    if !session.is_pending() {
        return PollOutcome::NotPending(session);
    }

    let deadline = config.max_wait.map(|wait| Instant::now() + wait);
    let expired = async move {
        match deadline {
            Some(at) => sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expired);

    info!(
        credential_id = session.credential_id(),
        interval_ms = config.interval.as_millis() as u64,
        "Polling for signer approval"
    );

    loop {
        let seen_hides = loop {
            let state = *visibility.borrow_and_update();
            if state.visible {
                break state.hides;
            }
            debug!("Approval polling paused");
            tokio::select! {
                changed = visibility.changed() => {
                    if changed.is_err() {
                        return PollOutcome::Cancelled;
                    }
                }
                _ = &mut expired => return PollOutcome::TimedOut(session),
            }
        };

        // First tick one full interval after (re)arming
        let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    session = match manager.poll_step(session).await {
                        PollStep::Approved(approved) => return PollOutcome::Approved(approved),
                        PollStep::Unchanged(pending) => pending,
                        PollStep::Superseded(stale) => {
                            info!(
                                credential_id = stale.credential_id(),
                                "Session signed out or replaced, stopping approval polling"
                            );
                            return PollOutcome::Cancelled;
                        }
                    };
                }
                changed = visibility.changed() => {
                    if changed.is_err() {
                        return PollOutcome::Cancelled;
                    }
                    let state = *visibility.borrow_and_update();
                    if !state.visible || state.hides != seen_hides {
                        break;
                    }
                }
                _ = &mut expired => {
                    info!(
                        credential_id = session.credential_id(),
                        "Gave up waiting for signer approval"
                    );
                    return PollOutcome::TimedOut(session);
                }
            }
        }
    }
}
