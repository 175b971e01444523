//! Tests for the reconciliation engine contract.
//!
//! # Critical Contract Points
//!
//! 1. Additive merge: remote records are appended, never overwrite or
//!    remove local records
//! 2. Idempotence: an unchanged remote snapshot produces no records, no
//!    persistence, and no notification on the second run
//! 3. Failure absorption: a failed fetch aborts the cycle without side
//!    effects and without escaping the engine
//! 4. Reentrancy: at most one cycle in the Fetching..Notifying span at a
//!    time; overlapping triggers are dropped

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::timeout;

use super::client::RemoteQuoteSource;
use super::errors::SyncError;
use super::model::{DedupPolicy, QuoteRecord};
use super::snapshot::SnapshotStore;
use super::store::QuoteBook;
use super::sync::{QuoteSyncService, SyncNotifier, SyncPhase, SyncStatus};
use crate::errors::SnapshotError;
use crate::events::{DomainEvent, MockDomainEventSink};

// =============================================================================
// Mock SnapshotStore
// =============================================================================

#[derive(Default)]
struct MemorySnapshotStore {
    records: Mutex<Vec<QuoteRecord>>,
    filter: Mutex<Option<String>>,
    save_calls: AtomicUsize,
    fail_on_save: AtomicBool,
}

impl MemorySnapshotStore {
    fn saved_records(&self) -> Vec<QuoteRecord> {
        self.records.lock().unwrap().clone()
    }

    fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, records: &[QuoteRecord]) -> Result<(), SnapshotError> {
        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(SnapshotError::Io("Intentional save failure".into()));
        }
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }

    fn load(&self) -> Result<Vec<QuoteRecord>, SnapshotError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save_last_filter(&self, value: &str) -> Result<(), SnapshotError> {
        *self.filter.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    fn load_last_filter(&self) -> Result<Option<String>, SnapshotError> {
        Ok(self.filter.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock RemoteQuoteSource
// =============================================================================

#[derive(Default)]
struct MockRemoteSource {
    responses: Mutex<VecDeque<Result<Vec<QuoteRecord>, SyncError>>>,
    pushes: Mutex<Vec<Vec<QuoteRecord>>>,
    pushed: Notify,
}

impl MockRemoteSource {
    fn with_responses(responses: Vec<Result<Vec<QuoteRecord>, SyncError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteQuoteSource for MockRemoteSource {
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, SyncError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn push(&self, records: &[QuoteRecord]) -> Result<(), SyncError> {
        self.pushes.lock().unwrap().push(records.to_vec());
        self.pushed.notify_one();
        Ok(())
    }
}

/// Source whose fetch blocks until released, for reentrancy tests.
struct BlockingRemoteSource {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl RemoteQuoteSource for BlockingRemoteSource {
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, SyncError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(vec![QuoteRecord::new("Late arrival", "Server")])
    }

    async fn push(&self, _records: &[QuoteRecord]) -> Result<(), SyncError> {
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn record(text: &str, category: &str) -> QuoteRecord {
    QuoteRecord::new(text, category)
}

fn seeded_book() -> Arc<RwLock<QuoteBook>> {
    let mut book = QuoteBook::new(DedupPolicy::TextOnly);
    book.add(record("Success is not final.", "Motivation"));
    Arc::new(RwLock::new(book))
}

fn service(
    book: Arc<RwLock<QuoteBook>>,
    remote: Arc<MockRemoteSource>,
    snapshot: Arc<MemorySnapshotStore>,
    sink: &MockDomainEventSink,
) -> QuoteSyncService<MockRemoteSource, MemorySnapshotStore> {
    QuoteSyncService::new(book, remote, snapshot, Arc::new(sink.clone()))
        .with_push_enabled(false)
}

fn sync_completed_count(sink: &MockDomainEventSink) -> usize {
    sink.events()
        .iter()
        .filter(|e| matches!(e, DomainEvent::SyncCompleted { .. }))
        .count()
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[tokio::test]
async fn test_merge_appends_only_new_records() {
    // One duplicate (by text), one genuinely new record
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![
        record("Success is not final.", "Motivation"),
        record("New one", "Server"),
    ])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book.clone(), remote, snapshot.clone(), &sink);

    let outcome = service.run_cycle().await.unwrap();

    assert_eq!(outcome.status, SyncStatus::Changed);
    assert_eq!(outcome.fetched, 2);
    assert_eq!(outcome.added, 1);
    assert_eq!(book.read().unwrap().len(), 2);
    assert_eq!(snapshot.save_calls(), 1);
    assert_eq!(snapshot.saved_records().len(), 2);
    assert_eq!(sync_completed_count(&sink), 1);
    assert_eq!(service.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_unchanged_remote_has_no_side_effects() {
    // The remote holds only a record that is already present
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![record(
        "Success is not final.",
        "Motivation",
    )])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book.clone(), remote, snapshot.clone(), &sink);

    let outcome = service.run_cycle().await.unwrap();

    assert_eq!(outcome.status, SyncStatus::Unchanged);
    assert_eq!(outcome.added, 0);
    assert_eq!(book.read().unwrap().len(), 1);
    assert_eq!(snapshot.save_calls(), 0);
    assert_eq!(sync_completed_count(&sink), 0);
    assert!(service.notification().is_none());
}

#[tokio::test]
async fn test_fetch_failure_aborts_cycle_without_side_effects() {
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Err(
        SyncError::FetchFailed("connection refused".into()),
    )]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book.clone(), remote, snapshot.clone(), &sink);

    let outcome = service.run_cycle().await.unwrap();

    assert_eq!(outcome.status, SyncStatus::FetchFailed);
    assert_eq!(book.read().unwrap().len(), 1);
    assert_eq!(snapshot.save_calls(), 0);
    assert!(sink.is_empty());
    assert_eq!(service.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_second_cycle_with_same_remote_is_idempotent() {
    let book = seeded_book();
    let batch = vec![
        record("Success is not final.", "Motivation"),
        record("New one", "Server"),
    ];
    let remote = Arc::new(MockRemoteSource::with_responses(vec![
        Ok(batch.clone()),
        Ok(batch),
    ]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book.clone(), remote, snapshot.clone(), &sink);

    let first = service.run_cycle().await.unwrap();
    let second = service.run_cycle().await.unwrap();

    assert_eq!(first.status, SyncStatus::Changed);
    assert_eq!(second.status, SyncStatus::Unchanged);
    assert_eq!(second.added, 0);
    assert_eq!(book.read().unwrap().len(), 2);
    // No second persistence, no second notification
    assert_eq!(snapshot.save_calls(), 1);
    assert_eq!(sync_completed_count(&sink), 1);
}

#[tokio::test]
async fn test_merge_never_mutates_existing_records() {
    let book = seeded_book();
    let original = book.read().unwrap().all().to_vec();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![
        record("Entirely different", "Server"),
        record("Another", "Server"),
    ])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book.clone(), remote, snapshot, &sink);

    service.run_cycle().await.unwrap();

    let merged = book.read().unwrap().all().to_vec();
    assert_eq!(merged.len(), 3);
    // The pre-existing records survive untouched and in order
    assert_eq!(&merged[..original.len()], &original[..]);
}

#[tokio::test]
async fn test_overlapping_trigger_is_dropped() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let remote = Arc::new(BlockingRemoteSource {
        started: started.clone(),
        release: release.clone(),
    });
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = Arc::new(
        QuoteSyncService::new(seeded_book(), remote, snapshot, Arc::new(sink.clone()))
            .with_push_enabled(false),
    );

    let background = {
        let service = service.clone();
        tokio::spawn(async move { service.run_cycle().await })
    };

    // Wait until the first cycle is suspended inside the fetch
    timeout(Duration::from_secs(1), started.notified())
        .await
        .expect("first cycle never reached the fetch");
    assert_eq!(service.phase(), SyncPhase::Fetching);

    let second = service.run_cycle().await.unwrap();
    assert_eq!(second.status, SyncStatus::Skipped);

    release.notify_one();
    let first = background.await.unwrap().unwrap();
    assert_eq!(first.status, SyncStatus::Changed);
    assert_eq!(service.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_notification_clears_after_configured_duration() {
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![record(
        "New one", "Server",
    )])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = QuoteSyncService::new(book, remote, snapshot, Arc::new(sink.clone()))
        .with_push_enabled(false)
        .with_notifier(SyncNotifier::with_clear_after(
            Arc::new(sink.clone()),
            Duration::from_millis(50),
        ));

    service.run_cycle().await.unwrap();
    assert!(service.notification().is_some());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(service.notification().is_none());
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, DomainEvent::SyncNotificationCleared)));
}

#[tokio::test]
async fn test_push_fires_even_when_unchanged() {
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![record(
        "Success is not final.",
        "Motivation",
    )])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service =
        QuoteSyncService::new(book, remote.clone(), snapshot, Arc::new(sink.clone()));

    let outcome = service.run_cycle().await.unwrap();
    assert_eq!(outcome.status, SyncStatus::Unchanged);

    timeout(Duration::from_secs(1), remote.pushed.notified())
        .await
        .expect("push never fired");
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.pushes.lock().unwrap()[0].len(), 1);
}

#[tokio::test]
async fn test_persistence_failure_propagates_and_returns_to_idle() {
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![record(
        "New one", "Server",
    )])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    snapshot.set_fail_on_save(true);
    let sink = MockDomainEventSink::new();
    let service = service(book, remote, snapshot, &sink);

    assert!(service.run_cycle().await.is_err());
    assert_eq!(service.phase(), SyncPhase::Idle);
    assert_eq!(sync_completed_count(&sink), 0);
}

#[tokio::test]
async fn test_changed_cycle_emits_category_and_display_refresh() {
    let book = seeded_book();
    let remote = Arc::new(MockRemoteSource::with_responses(vec![Ok(vec![record(
        "New one", "Server",
    )])]));
    let snapshot = Arc::new(MemorySnapshotStore::default());
    let sink = MockDomainEventSink::new();
    let service = service(book, remote, snapshot, &sink);

    service.run_cycle().await.unwrap();

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, DomainEvent::QuotesChanged { added: 1 })));
    let categories = events.iter().find_map(|e| match e {
        DomainEvent::CategoriesChanged { categories } => Some(categories.clone()),
        _ => None,
    });
    assert_eq!(
        categories.unwrap(),
        vec!["Motivation".to_string(), "Server".to_string()]
    );
    // No filter was ever persisted, so the redisplay uses "all"
    let displayed = events.iter().find_map(|e| match e {
        DomainEvent::QuoteDisplayed { record, category } => {
            Some((record.clone(), category.clone()))
        }
        _ => None,
    });
    let (displayed_record, category) = displayed.expect("redisplay event missing");
    assert_eq!(category, "all");
    assert!(displayed_record.is_some());
}
