//! Upload service — simulated upload/analysis records and their observers.
//!
//! DESIGN
//! ======
//! `UploadSimulator` owns a map of live records plus a set of observer
//! channels. `submit` registers a record and spawns one driver task for it
//! (see `ticker`); the driver calls back into `tick` / `begin_analysis` to
//! move the record through its phases.
//!
//! Records and observers share one `RwLock`. Every mutation emits its event
//! while still holding the write lock, so observers see a record's events in
//! mutation order and nothing about a record after its `Removed` event.
//!
//! ERROR HANDLING
//! ==============
//! The only caller-facing failure is an empty identifier on submit. Removing
//! an unknown identifier is a no-op. Transition errors from the record state
//! machine stop that record's driver and are logged, never surfaced.
//!
//! An observer that falls a full queue behind is dropped rather than left
//! with a gap in its view. Its receiver yields `None`, which ends the
//! websocket session; a reconnect resubscribes with a fresh snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{DuplicatePolicy, SimulatorConfig};
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::record::{Phase, UploadRecord};
use crate::services::ticker::{self, TickOutcome};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("file name must not be empty")]
    EmptyIdentifier,
}

impl crate::frame::ErrorCode for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "E_EMPTY_IDENTIFIER",
        }
    }
}

/// Observable change to the record map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordEvent {
    /// Full current state after a submit, tick, or phase transition.
    Changed { record: UploadRecord },
    /// The record was deleted; no further events will reference `id`.
    Removed { id: Uuid, identifier: String },
}

impl RecordEvent {
    #[must_use]
    pub fn record_id(&self) -> Uuid {
        match self {
            Self::Changed { record } => record.id,
            Self::Removed { id, .. } => *id,
        }
    }
}

/// An observer registration. Dropping `events` unsubscribes lazily.
pub struct Subscription {
    pub id: Uuid,
    pub events: mpsc::Receiver<RecordEvent>,
}

/// Aggregate counters over the current records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub failed: usize,
    /// Sum of issue counts across completed records.
    pub issues_found: u32,
}

struct TrackedRecord {
    record: UploadRecord,
    driver: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct SimulatorState {
    records: HashMap<Uuid, TrackedRecord>,
    subscribers: HashMap<Uuid, mpsc::Sender<RecordEvent>>,
    next_seq: u64,
}

// =============================================================================
// SIMULATOR
// =============================================================================

/// Shared handle to the simulation. Clone is cheap; all clones share state.
#[derive(Clone)]
pub struct UploadSimulator {
    inner: Arc<RwLock<SimulatorState>>,
    config: Arc<SimulatorConfig>,
    random: Arc<dyn RandomSource>,
}

impl UploadSimulator {
    /// Build a simulator whose random source follows `config.seed`.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };
        Self::with_random(config, random)
    }

    #[must_use]
    pub fn with_random(config: SimulatorConfig, random: Arc<dyn RandomSource>) -> Self {
        Self { inner: Arc::new(RwLock::new(SimulatorState::default())), config: Arc::new(config), random }
    }

    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register an observer for all subsequent events.
    pub async fn subscribe(&self) -> Subscription {
        let mut state = self.inner.write().await;
        self.register(&mut state)
    }

    /// Register an observer and snapshot the current records atomically.
    ///
    /// Every event the observer receives is newer than the snapshot.
    pub async fn subscribe_with_snapshot(&self) -> (Subscription, Vec<UploadRecord>) {
        let mut state = self.inner.write().await;
        let subscription = self.register(&mut state);
        (subscription, state.sorted_records())
    }

    fn register(&self, state: &mut SimulatorState) -> Subscription {
        let (tx, events) = mpsc::channel(self.config.event_queue_capacity);
        let id = Uuid::new_v4();
        state.subscribers.insert(id, tx);
        debug!(subscriber = %id, total = state.subscribers.len(), "observer subscribed");
        Subscription { id, events }
    }

    pub async fn unsubscribe(&self, subscriber: Uuid) {
        let mut state = self.inner.write().await;
        if state.subscribers.remove(&subscriber).is_some() {
            debug!(%subscriber, total = state.subscribers.len(), "observer unsubscribed");
        }
    }

    // =========================================================================
    // SUBMIT / REMOVE
    // =========================================================================

    /// Register a new upload and start its driver. Returns immediately.
    ///
    /// Surrounding whitespace is stripped from the display name.
    ///
    /// # Errors
    ///
    /// Returns `EmptyIdentifier` if the name is empty after trimming.
    pub async fn submit(&self, identifier: &str) -> Result<UploadRecord, UploadError> {
        let name = identifier.trim();
        if name.is_empty() {
            return Err(UploadError::EmptyIdentifier);
        }

        let mut state = self.inner.write().await;
        let name = match self.config.duplicate_policy {
            DuplicatePolicy::Allow => name.to_owned(),
            DuplicatePolicy::Suffix => state.unique_identifier(name),
        };
        state.next_seq += 1;
        let record = UploadRecord::new(name, self.random.size_label(), state.next_seq);
        let id = record.id;

        let driver = tokio::spawn(ticker::drive_record(self.clone(), id));
        state
            .records
            .insert(id, TrackedRecord { record: record.clone(), driver: Some(driver) });
        state.notify(RecordEvent::Changed { record: record.clone() });

        info!(%id, identifier = %record.identifier, size = %record.size_label, "upload submitted");
        Ok(record)
    }

    /// Delete every record named `identifier` and stop their drivers.
    ///
    /// Returns how many records were removed; zero for unknown names.
    pub async fn remove(&self, identifier: &str) -> usize {
        let identifier = identifier.trim();
        let mut state = self.inner.write().await;

        let mut matching: Vec<(u64, Uuid)> = state
            .records
            .values()
            .filter(|tracked| tracked.record.identifier == identifier)
            .map(|tracked| (tracked.record.seq, tracked.record.id))
            .collect();
        matching.sort_unstable();

        for (_, id) in &matching {
            state.evict(*id);
        }

        if matching.is_empty() {
            debug!(identifier, "remove: no matching records");
        } else {
            info!(identifier, removed = matching.len(), "uploads removed");
        }
        matching.len()
    }

    /// Delete one record by id. `None` if it was not present.
    pub async fn remove_record(&self, id: Uuid) -> Option<UploadRecord> {
        let mut state = self.inner.write().await;
        let removed = state.evict(id);
        if let Some(record) = &removed {
            info!(%id, identifier = %record.identifier, "upload removed");
        }
        removed
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub async fn get(&self, id: Uuid) -> Option<UploadRecord> {
        let state = self.inner.read().await;
        state.records.get(&id).map(|tracked| tracked.record.clone())
    }

    /// All records in submission order.
    pub async fn list(&self) -> Vec<UploadRecord> {
        self.inner.read().await.sorted_records()
    }

    pub async fn stats(&self) -> UploadStats {
        let state = self.inner.read().await;
        let mut stats = UploadStats { total: state.records.len(), ..UploadStats::default() };
        for tracked in state.records.values() {
            match tracked.record.phase {
                Phase::Uploading | Phase::Analyzing => stats.active += 1,
                Phase::Completed => {
                    stats.completed += 1;
                    stats.issues_found += tracked.record.issue_count.unwrap_or(0);
                }
                Phase::Failed => stats.failed += 1,
            }
        }
        stats
    }

    // =========================================================================
    // DRIVER CALLBACKS
    // =========================================================================

    /// Advance one tick of `phase` for record `id`.
    ///
    /// An analysis tick that reaches 100% also completes the record with a
    /// random issue count.
    pub(crate) async fn tick(&self, id: Uuid, phase: Phase) -> TickOutcome {
        let mut state = self.inner.write().await;

        // EDGE: the record may have been removed while the driver slept.
        let Some(tracked) = state.records.get_mut(&id) else {
            return TickOutcome::Stopped;
        };
        if tracked.record.phase != phase {
            debug!(%id, expected = %phase, actual = %tracked.record.phase, "tick for stale phase; stopping");
            return TickOutcome::Stopped;
        }
        if tracked.record.phase_done() {
            return TickOutcome::PhaseFinished;
        }

        let increment = match phase {
            Phase::Uploading => self.random.upload_increment(),
            Phase::Analyzing => self.random.analysis_increment(),
            Phase::Completed | Phase::Failed => return TickOutcome::Stopped,
        };
        let reached = match tracked.record.advance(increment) {
            Ok(reached) => reached,
            Err(e) => {
                warn!(%id, error = %e, "tick rejected by record state machine");
                return TickOutcome::Stopped;
            }
        };

        let mut events = vec![RecordEvent::Changed { record: tracked.record.clone() }];
        if reached && phase == Phase::Analyzing {
            let issues = self.random.issue_count();
            if let Err(e) = tracked.record.complete(issues) {
                warn!(%id, error = %e, "completion rejected by record state machine");
                return TickOutcome::Stopped;
            }
            info!(%id, identifier = %tracked.record.identifier, issues, "analysis completed");
            events.push(RecordEvent::Changed { record: tracked.record.clone() });
        }

        for event in events {
            state.notify(event);
        }

        if reached { TickOutcome::PhaseFinished } else { TickOutcome::Advanced }
    }

    /// Move a fully uploaded record into analysis. `false` if it is gone or
    /// not eligible.
    pub(crate) async fn begin_analysis(&self, id: Uuid) -> bool {
        let mut state = self.inner.write().await;
        let Some(tracked) = state.records.get_mut(&id) else {
            return false;
        };
        if let Err(e) = tracked.record.begin_analysis() {
            warn!(%id, error = %e, "analysis start rejected by record state machine");
            return false;
        }
        debug!(%id, identifier = %tracked.record.identifier, "analysis started");
        let event = RecordEvent::Changed { record: tracked.record.clone() };
        state.notify(event);
        true
    }
}

// =============================================================================
// STATE HELPERS
// =============================================================================

impl SimulatorState {
    /// Fan-out to every observer without blocking. An observer that is full
    /// or closed is pruned; its receiver then ends and the client resyncs
    /// from a fresh snapshot.
    fn notify(&mut self, event: RecordEvent) {
        let mut pruned = Vec::new();
        for (subscriber, tx) in &self.subscribers {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(%subscriber, record = %event.record_id(), "observer queue full; pruned");
                    pruned.push(*subscriber);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%subscriber, "observer channel closed; pruned");
                    pruned.push(*subscriber);
                }
            }
        }
        for subscriber in pruned {
            self.subscribers.remove(&subscriber);
        }
    }

    fn evict(&mut self, id: Uuid) -> Option<UploadRecord> {
        let tracked = self.records.remove(&id)?;
        if let Some(driver) = tracked.driver {
            driver.abort();
        }
        self.notify(RecordEvent::Removed { id, identifier: tracked.record.identifier.clone() });
        Some(tracked.record)
    }

    fn sorted_records(&self) -> Vec<UploadRecord> {
        let mut records: Vec<UploadRecord> = self
            .records
            .values()
            .map(|tracked| tracked.record.clone())
            .collect();
        records.sort_by_key(|record| record.seq);
        records
    }

    fn is_taken(&self, identifier: &str) -> bool {
        self.records
            .values()
            .any(|tracked| tracked.record.identifier == identifier)
    }

    /// `name` if free, otherwise `"stem (n).ext"` with the smallest free `n`.
    fn unique_identifier(&self, name: &str) -> String {
        if !self.is_taken(name) {
            return name.to_owned();
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };
        let mut n: u32 = 1;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            if !self.is_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
