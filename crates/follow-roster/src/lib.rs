//! Roster resolution for batch follows
//!
//! A roster is a two-column CSV export (handle, fid) of a shared
//! spreadsheet. Rows may carry a fid, a handle, both, or neither. The
//! resolver accepts fids as-is, looks handles up through a
//! [`HandleResolver`], skips rows it cannot resolve, and returns the
//! deduplicated fids in first-seen order.

mod entry;
mod error;
mod resolver;
mod source;

pub use entry::{parse_roster, RosterEntry};
pub use error::{Result, RosterError};
pub use resolver::{
    HandleResolver, ResolveMode, ResolvedTarget, RosterReport, RosterResolver, UnresolvedRow,
};
pub use source::{sheet_csv_url, SheetSource, DEFAULT_SHEET_RANGE};
