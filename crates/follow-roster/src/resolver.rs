//! Per-row resolution and deduplication

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use neynar_client::{Fid, LookupError, NeynarClient};
use tracing::{debug, info, warn};

use crate::entry::{parse_roster, RosterEntry};

/// A validated follow target
pub type ResolvedTarget = Fid;

/// Turns a handle into a fid
#[async_trait]
pub trait HandleResolver: Send + Sync {
    async fn resolve_handle(&self, handle: &str) -> Result<Fid, LookupError>;
}

#[async_trait]
impl HandleResolver for NeynarClient {
    async fn resolve_handle(&self, handle: &str) -> Result<Fid, LookupError> {
        NeynarClient::resolve_handle(self, handle).await
    }
}

/// How many handle lookups may be in flight at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// One lookup at a time, in row order
    #[default]
    Sequential,
    /// Up to `n` lookups at a time; output order is the same as sequential
    Concurrent(usize),
}

impl ResolveMode {
    /// `Sequential` for a limit of 0 or 1
    pub fn with_limit(limit: usize) -> Self {
        if limit <= 1 {
            Self::Sequential
        } else {
            Self::Concurrent(limit)
        }
    }
}

/// A row whose handle could not be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRow {
    pub line: usize,
    pub handle: String,
    pub reason: LookupError,
}

/// Outcome of resolving a whole roster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterReport {
    /// Unique targets in first-seen order
    pub targets: Vec<ResolvedTarget>,
    pub unresolved: Vec<UnresolvedRow>,
    /// Rows with neither a usable fid nor a handle
    pub malformed: usize,
    /// Resolved rows dropped as repeats of an earlier target
    pub duplicates: usize,
}

enum RowResolution {
    Resolved(Fid),
    Unresolved(UnresolvedRow),
    Malformed,
}

/// Resolves roster text into follow targets
pub struct RosterResolver {
    handles: Arc<dyn HandleResolver>,
    mode: ResolveMode,
}

impl RosterResolver {
    pub fn new(handles: Arc<dyn HandleResolver>) -> Self {
        Self {
            handles,
            mode: ResolveMode::Sequential,
        }
    }

    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Unique fids from the roster, in first-seen order
    ///
    /// An empty roster, or one where no row resolves, gives an empty list.
    pub async fn resolve_roster(&self, raw_roster_text: &str) -> Vec<ResolvedTarget> {
        self.resolve(raw_roster_text).await.targets
    }

    /// Like [`resolve_roster`](Self::resolve_roster), also reporting the
    /// rows that were skipped
    pub async fn resolve(&self, raw_roster_text: &str) -> RosterReport {
        let entries = parse_roster(raw_roster_text);
        let rows = entries.len();

        let resolutions: Vec<RowResolution> = match self.mode {
            ResolveMode::Sequential => {
                let mut out = Vec::with_capacity(rows);
                for entry in entries {
                    out.push(self.resolve_entry(entry).await);
                }
                out
            }
            ResolveMode::Concurrent(limit) => {
                stream::iter(entries)
                    .map(|entry| self.resolve_entry(entry))
                    .buffered(limit.max(1))
                    .collect()
                    .await
            }
        };

        let report = collect_report(resolutions);
        info!(
            rows,
            targets = report.targets.len(),
            unresolved = report.unresolved.len(),
            malformed = report.malformed,
            duplicates = report.duplicates,
            "Resolved roster"
        );
        report
    }

    async fn resolve_entry(&self, entry: RosterEntry) -> RowResolution {
        if let Some(fid) = entry.raw_identifier.as_deref().and_then(Fid::parse) {
            return RowResolution::Resolved(fid);
        }

        let Some(handle) = entry.raw_handle else {
            debug!(
                line = entry.line,
                identifier = entry.raw_identifier.as_deref().unwrap_or(""),
                "Skipping row without a handle or valid fid"
            );
            return RowResolution::Malformed;
        };

        match self.handles.resolve_handle(&handle).await {
            Ok(fid) => RowResolution::Resolved(fid),
            Err(reason) => {
                warn!(
                    line = entry.line,
                    handle = %handle,
                    error = %reason,
                    "Skipping unresolved roster row"
                );
                RowResolution::Unresolved(UnresolvedRow {
                    line: entry.line,
                    handle,
                    reason,
                })
            }
        }
    }
}

fn collect_report(resolutions: Vec<RowResolution>) -> RosterReport {
    let mut seen = HashSet::new();
    let mut report = RosterReport::default();

    for resolution in resolutions {
        match resolution {
            RowResolution::Resolved(fid) => {
                if seen.insert(fid) {
                    report.targets.push(fid);
                } else {
                    report.duplicates += 1;
                }
            }
            RowResolution::Unresolved(row) => report.unresolved.push(row),
            RowResolution::Malformed => report.malformed += 1,
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory directory that records lookups and how many overlapped
    struct FakeDirectory {
        users: HashMap<&'static str, Result<Fid, LookupError>>,
        delay: Duration,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeDirectory {
        fn new(users: Vec<(&'static str, Result<Fid, LookupError>)>) -> Self {
            Self {
                users: users.into_iter().collect(),
                delay: Duration::from_millis(100),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HandleResolver for FakeDirectory {
        async fn resolve_handle(&self, handle: &str) -> Result<Fid, LookupError> {
            self.calls.lock().unwrap().push(handle.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.users
                .get(handle)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::HandleNotFound(handle.to_string())))
        }
    }

    fn resolver(directory: &Arc<FakeDirectory>) -> RosterResolver {
        RosterResolver::new(directory.clone())
    }

    fn directory() -> Arc<FakeDirectory> {
        Arc::new(FakeDirectory::new(vec![
            ("alice", Ok(Fid(7))),
            ("bob", Ok(Fid(8))),
            ("carol", Ok(Fid(9))),
            ("dave", Ok(Fid(42))),
            (
                "flaky",
                Err(LookupError::Transport("connection reset".to_string())),
            ),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_occurrence_order() {
        let directory = directory();
        let text = "username,fid\nalice,\n\"\",\"\"\nbob,42\n";

        let targets = resolver(&directory).resolve_roster(text).await;
        assert_eq!(targets, vec![Fid(7), Fid(42)]);
        // The fid column wins, so bob is never looked up
        assert_eq!(directory.calls(), vec!["alice".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_header_only_rosters() {
        let directory = directory();
        let resolver = resolver(&directory);

        assert!(resolver.resolve_roster("").await.is_empty());
        assert!(resolver.resolve_roster("username,fid\n").await.is_empty());
        assert!(directory.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_rows_are_skipped() {
        let directory = directory();
        let text = "username,fid\n,\n , \n,not-a-fid\n,-3\n";

        let report = resolver(&directory).resolve(text).await;
        assert!(report.targets.is_empty());
        assert!(report.unresolved.is_empty());
        assert_eq!(report.malformed, 4);
        assert!(directory.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_fid_falls_back_to_handle() {
        let directory = directory();
        let text = "username,fid\ncarol,abc\ndave,-1\n";

        let targets = resolver(&directory).resolve_roster(text).await;
        assert_eq!(targets, vec![Fid(9), Fid(42)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_failures_are_recorded_not_fatal() {
        let directory = directory();
        let text = "username,fid\nghost,\nflaky,\nalice,\n";

        let report = resolver(&directory).resolve(text).await;
        assert_eq!(report.targets, vec![Fid(7)]);
        assert_eq!(
            report.unresolved,
            vec![
                UnresolvedRow {
                    line: 2,
                    handle: "ghost".to_string(),
                    reason: LookupError::HandleNotFound("ghost".to_string()),
                },
                UnresolvedRow {
                    line: 3,
                    handle: "flaky".to_string(),
                    reason: LookupError::Transport("connection reset".to_string()),
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_has_no_duplicates() {
        let directory = directory();
        let text = "username,fid\n\
                    alice,\n\
                    ,7\n\
                    bob,\n\
                    alice,\n\
                    x,8\n\
                    dave,\n\
                    ,42\n\
                    carol,9\n";

        let report = resolver(&directory).resolve(text).await;
        assert_eq!(report.targets, vec![Fid(7), Fid(8), Fid(42), Fid(9)]);
        assert_eq!(report.duplicates, 4);

        let unique: HashSet<_> = report.targets.iter().collect();
        assert_eq!(unique.len(), report.targets.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_mode_has_one_lookup_in_flight() {
        let directory = directory();
        let text = "username,fid\nalice,\nbob,\ncarol,\ndave,\n";

        let targets = resolver(&directory).resolve_roster(text).await;
        assert_eq!(targets, vec![Fid(7), Fid(8), Fid(9), Fid(42)]);
        assert_eq!(directory.max_in_flight(), 1);
        assert_eq!(directory.calls(), vec!["alice", "bob", "carol", "dave"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_mode_matches_sequential() {
        let text = "username,fid\nalice,\nghost,\nbob,\n,42\ncarol,\nalice,\ndave,\nflaky,\n";

        let sequential = directory();
        let expected = resolver(&sequential).resolve(text).await;

        let concurrent = directory();
        let report = resolver(&concurrent)
            .with_mode(ResolveMode::Concurrent(3))
            .resolve(text)
            .await;

        assert_eq!(report, expected);
        assert_eq!(report.targets, vec![Fid(7), Fid(8), Fid(42), Fid(9)]);
        assert_eq!(concurrent.max_in_flight(), 3);
    }

    #[test]
    fn test_resolve_mode_with_limit() {
        assert_eq!(ResolveMode::with_limit(0), ResolveMode::Sequential);
        assert_eq!(ResolveMode::with_limit(1), ResolveMode::Sequential);
        assert_eq!(ResolveMode::with_limit(4), ResolveMode::Concurrent(4));
        assert_eq!(ResolveMode::default(), ResolveMode::Sequential);
    }
}
