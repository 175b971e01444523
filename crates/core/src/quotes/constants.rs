//! Quote synchronization constants.

/// Category label stamped on records fetched from the remote feed,
/// distinct from locally authored categories.
pub const REMOTE_CATEGORY: &str = "Server";

/// Selector value meaning "no category filter".
pub const FILTER_ALL: &str = "all";

/// Maximum number of candidate records accepted from one remote fetch.
pub const MAX_REMOTE_BATCH: usize = 5;

/// Interval between scheduled reconciliation cycles.
pub const SYNC_INTERVAL_SECS: u64 = 30;

/// How long the transient sync notification stays visible before the
/// notifier clears it.
pub const NOTIFICATION_CLEAR_SECS: u64 = 3;
