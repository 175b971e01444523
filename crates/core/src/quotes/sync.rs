//! Quote reconciliation engine.
//!
//! `QuoteSyncService` orchestrates periodic and on-demand sync cycles
//! against the remote feed.
//!
//! # Architecture
//!
//! ```text
//! QuoteSyncService
//!       │
//!       ├─► RemoteQuoteSource (fetch candidates / push local state)
//!       ├─► QuoteBook         (in-memory collection, dedup merge)
//!       ├─► SnapshotStore     (persist the merged collection)
//!       └─► DomainEventSink   (category refresh, redisplay, notification)
//! ```
//!
//! A cycle walks `Idle → Fetching → Merging → Persisting → Notifying → Idle`,
//! short-circuiting back to `Idle` when the fetch fails or the merge changes
//! nothing. At most one cycle is in flight at a time; a trigger arriving
//! while one runs is dropped, and the next timer tick retries.
//!
//! The merge is additive only: a remote record is appended when its dedup
//! key is absent from the collection, and existing local records are never
//! overwritten or removed. The remote snapshot is authoritative for
//! existence, nothing else.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::client::RemoteQuoteSource;
use super::constants::NOTIFICATION_CLEAR_SECS;
use super::snapshot::SnapshotStore;
use super::store::{pick_random, QuoteBook};
use crate::categories::{distinct_categories, CategoryService};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};

// =============================================================================
// Cycle Phases
// =============================================================================

/// Where the engine currently is in a reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Merging,
    Persisting,
    Notifying,
}

// =============================================================================
// Cycle Guard
// =============================================================================

/// RAII guard enforcing "at most one cycle in flight".
///
/// The recurring trigger fires regardless of whether the previous cycle has
/// finished; acquisition fails instead of overlapping.
struct CycleGuard<'a> {
    in_flight: &'a AtomicBool,
}

impl<'a> CycleGuard<'a> {
    /// Try to claim the cycle slot. Returns None if a cycle is running.
    fn try_acquire(in_flight: &'a AtomicBool) -> Option<Self> {
        if in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(Self { in_flight })
        } else {
            None
        }
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Sync Outcome
// =============================================================================

/// How a reconciliation cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Remote records were merged and persisted.
    Changed,
    /// The remote snapshot held nothing new; no side effects.
    Unchanged,
    /// The remote fetch failed; the cycle was aborted without side effects.
    FetchFailed,
    /// Another cycle was in flight; this trigger was dropped.
    Skipped,
}

/// Result of one reconciliation cycle.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Number of candidate records the remote returned.
    pub fetched: usize,
    /// Number of records actually merged into the collection.
    pub added: usize,
    /// How the cycle ended.
    pub status: SyncStatus,
    /// When the cycle finished.
    pub completed_at: DateTime<Utc>,
}

impl SyncOutcome {
    fn finish(fetched: usize, added: usize, status: SyncStatus) -> Self {
        Self {
            fetched,
            added,
            status,
            completed_at: Utc::now(),
        }
    }

    /// Whether the cycle changed local state.
    pub fn changed(&self) -> bool {
        self.status == SyncStatus::Changed
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        match self.status {
            SyncStatus::Changed => {
                format!("Merged {} of {} remote quotes", self.added, self.fetched)
            }
            SyncStatus::Unchanged => format!(
                "Up to date ({} remote quotes already present)",
                self.fetched
            ),
            SyncStatus::FetchFailed => "Remote fetch failed, no changes".to_string(),
            SyncStatus::Skipped => "Cycle already in flight, trigger dropped".to_string(),
        }
    }
}

// =============================================================================
// Sync Notifier
// =============================================================================

/// Transient "sync occurred" message observable by view code.
///
/// `notify` sets the message, emits [`DomainEvent::SyncCompleted`], and
/// spawns a one-shot timer that clears the message again. The generation
/// counter keeps an earlier timer from clipping a newer message.
#[derive(Clone)]
pub struct SyncNotifier {
    message: Arc<Mutex<Option<String>>>,
    generation: Arc<AtomicU64>,
    sink: Arc<dyn DomainEventSink>,
    clear_after: Duration,
}

impl SyncNotifier {
    /// Notifier with the default visibility duration.
    pub fn new(sink: Arc<dyn DomainEventSink>) -> Self {
        Self::with_clear_after(sink, Duration::from_secs(NOTIFICATION_CLEAR_SECS))
    }

    /// Notifier with a custom visibility duration.
    pub fn with_clear_after(sink: Arc<dyn DomainEventSink>, clear_after: Duration) -> Self {
        Self {
            message: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            sink,
            clear_after,
        }
    }

    /// The currently visible message, if any.
    pub fn current(&self) -> Option<String> {
        self.message.lock().unwrap().clone()
    }

    /// Show a message and schedule its clearing. Fire-and-forget: the caller
    /// does not wait for the message to clear.
    pub fn notify(&self, message: String) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.message.lock().unwrap() = Some(message.clone());
        self.sink.emit(DomainEvent::SyncCompleted { message });

        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(notifier.clear_after).await;
            // Only the timer belonging to the latest message clears it
            if notifier.generation.load(Ordering::SeqCst) == generation {
                *notifier.message.lock().unwrap() = None;
                notifier.sink.emit(DomainEvent::SyncNotificationCleared);
            }
        });
    }
}

// =============================================================================
// Quote Sync Service
// =============================================================================

/// Reconciliation engine for the quote collection.
///
/// Orchestrates fetch → merge → persist → notify against the remote feed,
/// with an optional best-effort push of the local collection after each
/// successful pull-merge.
pub struct QuoteSyncService<R, S>
where
    R: RemoteQuoteSource + 'static,
    S: SnapshotStore + 'static,
{
    /// The in-memory collection. The lock is never held across an await.
    book: Arc<RwLock<QuoteBook>>,
    /// Remote feed boundary.
    remote: Arc<R>,
    /// Durable snapshot boundary.
    snapshot: Arc<S>,
    /// Remembered-filter access.
    categories: CategoryService<S>,
    /// View boundary for category/display refreshes.
    sink: Arc<dyn DomainEventSink>,
    /// Transient notification state.
    notifier: SyncNotifier,
    /// Reentrancy guard state.
    in_flight: AtomicBool,
    /// Current cycle phase, for observability.
    phase: Mutex<SyncPhase>,
    /// Whether the best-effort push-back is fired after pull-merge cycles.
    push_enabled: bool,
}

impl<R, S> QuoteSyncService<R, S>
where
    R: RemoteQuoteSource + 'static,
    S: SnapshotStore + 'static,
{
    /// Create a new sync service.
    pub fn new(
        book: Arc<RwLock<QuoteBook>>,
        remote: Arc<R>,
        snapshot: Arc<S>,
        sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            categories: CategoryService::new(snapshot.clone()),
            notifier: SyncNotifier::new(sink.clone()),
            book,
            remote,
            snapshot,
            sink,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(SyncPhase::Idle),
            push_enabled: true,
        }
    }

    /// Enable or disable the best-effort push-back of local state.
    pub fn with_push_enabled(mut self, enabled: bool) -> Self {
        self.push_enabled = enabled;
        self
    }

    /// Replace the notifier (tests use a short clear duration).
    pub fn with_notifier(mut self, notifier: SyncNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// The engine's current phase.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().unwrap()
    }

    /// The transient notification message, if one is visible.
    pub fn notification(&self) -> Option<String> {
        self.notifier.current()
    }

    fn set_phase(&self, next: SyncPhase) {
        let mut phase = self.phase.lock().unwrap();
        debug!("Sync phase: {:?} -> {:?}", *phase, next);
        *phase = next;
    }

    /// Run one reconciliation cycle.
    ///
    /// Remote fetch failures are absorbed into [`SyncStatus::FetchFailed`]
    /// rather than raised, and a trigger that lands while another cycle is
    /// in flight is dropped as [`SyncStatus::Skipped`]. Persistence failures
    /// are the only errors that propagate.
    pub async fn run_cycle(&self) -> Result<SyncOutcome> {
        let Some(_guard) = CycleGuard::try_acquire(&self.in_flight) else {
            debug!("Sync trigger dropped: cycle already in flight");
            return Ok(SyncOutcome::finish(0, 0, SyncStatus::Skipped));
        };

        self.set_phase(SyncPhase::Fetching);
        let candidates = match self.remote.fetch().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Remote fetch failed: {}", e);
                self.set_phase(SyncPhase::Idle);
                return Ok(SyncOutcome::finish(0, 0, SyncStatus::FetchFailed));
            }
        };

        self.set_phase(SyncPhase::Merging);
        let fetched = candidates.len();
        let added = {
            let mut book = self.book.write().unwrap();
            let mut added = 0;
            for candidate in candidates {
                if book.add(candidate) {
                    added += 1;
                }
            }
            added
        };

        if added == 0 {
            debug!("Remote snapshot holds nothing new ({} candidates)", fetched);
            self.spawn_push();
            self.set_phase(SyncPhase::Idle);
            return Ok(SyncOutcome::finish(fetched, 0, SyncStatus::Unchanged));
        }

        self.set_phase(SyncPhase::Persisting);
        if let Err(e) = self.persist_and_redisplay(added) {
            self.set_phase(SyncPhase::Idle);
            return Err(e);
        }

        self.set_phase(SyncPhase::Notifying);
        let noun = if added == 1 { "quote" } else { "quotes" };
        self.notifier
            .notify(format!("Synced {} new {} from the server", added, noun));

        self.spawn_push();
        self.set_phase(SyncPhase::Idle);
        Ok(SyncOutcome::finish(fetched, added, SyncStatus::Changed))
    }

    /// Persist the merged collection, refresh derived category state, and
    /// emit a redisplay for the active filter.
    fn persist_and_redisplay(&self, added: usize) -> Result<()> {
        let (records, categories) = {
            let book = self.book.read().unwrap();
            (book.all().to_vec(), distinct_categories(book.all()))
        };

        self.snapshot.save(&records)?;
        self.sink.emit(DomainEvent::quotes_changed(added));
        self.sink
            .emit(DomainEvent::categories_changed(categories.clone()));

        let filter = self.categories.validated_filter(&categories)?;
        let displayed = {
            let book = self.book.read().unwrap();
            let subset = book.by_category(&filter);
            pick_random(&subset).cloned()
        };
        self.sink.emit(DomainEvent::quote_displayed(displayed, filter));
        Ok(())
    }

    /// Fire the best-effort push of local state, if enabled.
    ///
    /// Runs detached so a slow or failing push never delays the cycle's
    /// return to idle. Failures are logged only, never retried.
    fn spawn_push(&self) {
        if !self.push_enabled {
            return;
        }
        let records = self.book.read().unwrap().all().to_vec();
        let remote = self.remote.clone();
        tokio::spawn(async move {
            if let Err(e) = remote.push(&records).await {
                warn!("Best-effort push failed: {}", e);
            }
        });
    }
}
