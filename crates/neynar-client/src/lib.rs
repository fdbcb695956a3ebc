//! Rust client for the Neynar Farcaster API
//!
//! Covers the three calls a sign-in-and-follow flow needs: issuing and
//! querying a signer through the app's signer service, resolving a username
//! to its fid, and following a batch of fids on behalf of an approved signer.
//!
//! # Example
//!
//! ```no_run
//! use neynar_client::{Fid, NeynarClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NeynarClient::new("NEYNAR_API_DOCS")?;
//!
//! let fid = client.resolve_handle("@dwr").await?;
//! client.follow_users("signer-uuid", &[fid, Fid(3)]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! ## Signer service
//! - `POST /api/signer` - Issue a new signer awaiting approval
//! - `GET /api/signer?signer_uuid=` - Current status of a signer
//!
//! ## Neynar v2
//! - `GET /farcaster/user/by_username` - Look up a user by username
//! - `POST /farcaster/user/follow` - Follow a batch of fids

mod client;
mod error;
mod types;

pub use client::{normalize_handle, NeynarClient, NeynarConfig};
pub use error::{LookupError, NeynarError, Result};
pub use types::{Fid, SignerRecord, SignerStatus, UserSummary};
