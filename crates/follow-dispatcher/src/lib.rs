//! Batch follow dispatch
//!
//! Submits one follow request for a whole resolved roster using an approved
//! signer. Requests that could not possibly succeed (no approved session, no
//! targets) are refused locally without touching the network.

mod dispatcher;
mod error;

pub use dispatcher::{FollowApi, FollowBatchResult, FollowDispatcher};
pub use error::DispatchError;
