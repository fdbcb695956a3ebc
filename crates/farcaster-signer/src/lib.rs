//! Farcaster signer sign-in
//!
//! A signer is issued by the signer service in `pending_approval` state and
//! becomes usable once the account owner approves it in their client.
//! [`SignerSession`] owns the current [`Session`], persists it through a
//! [`SessionStore`] on every state transition, and drives approval polling
//! through a cancellable [`PollHandle`].

mod api;
mod error;
mod manager;
mod poller;
mod session;
mod store;

pub use api::SignerApi;
pub use error::{Result, SessionError, StoreError};
pub use manager::SignerSession;
pub use poller::{PollConfig, PollHandle, PollOutcome, DEFAULT_POLL_INTERVAL};
pub use session::{Session, SessionStatus};
pub use store::{FileStore, MemoryStore, SessionStore, SESSION_KEY};

pub use neynar_client::Fid;

#[cfg(test)]
pub(crate) mod testing;
