use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

use crate::error::InvalidInput;

// Index into the worker range [0, m)
pub type WorkerId = usize;
// Index into the document Vec; also the position in the input arrays
pub type DocumentId = usize;
pub type Ticks = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub arrival_time: Ticks,
    pub processing_duration: Ticks,
}

impl Document {
    /// Reject documents the event loop cannot order: a negative duration
    /// would complete before it started.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.processing_duration < 0 {
            return Err(InvalidInput::NegativeDuration {
                document: self.id,
                duration: self.processing_duration,
            });
        }
        if self
            .arrival_time
            .checked_add(self.processing_duration)
            .is_none()
        {
            return Err(InvalidInput::CompletionOverflow { document: self.id });
        }
        Ok(())
    }

    /// Tick at which a worker picking this document up at `started_at` frees again.
    pub fn completes_at(&self, started_at: Ticks) -> Ticks {
        started_at.saturating_add(self.processing_duration)
    }
}

/// Idle workers, ordered by id.
///
/// Presence means the worker may take the next document; absence means it is
/// busy with exactly one.
#[derive(Debug, Clone)]
pub struct AvailabilityPool {
    idle: BTreeSet<WorkerId>,
    capacity: usize,
}

impl AvailabilityPool {
    /// Pool with every worker in `[0, capacity)` idle.
    pub fn full(capacity: usize) -> Self {
        Self {
            idle: (0..capacity).collect(),
            capacity,
        }
    }

    /// Total number of workers, idle or not.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns false if the worker was already idle.
    pub fn insert(&mut self, worker: WorkerId) -> bool {
        debug_assert!(
            worker < self.capacity,
            "Worker {worker} outside pool of {}",
            self.capacity
        );
        self.idle.insert(worker)
    }

    pub fn remove(&mut self, worker: WorkerId) -> bool {
        self.idle.remove(&worker)
    }

    pub fn contains(&self, worker: WorkerId) -> bool {
        self.idle.contains(&worker)
    }

    /// Smallest idle worker `>= preferred`, wrapping to the smallest idle
    /// worker overall when none sits at or after `preferred`.
    pub fn ceiling_or_wrap(&self, preferred: WorkerId) -> Option<WorkerId> {
        self.idle
            .range(preferred..)
            .next()
            .or_else(|| self.idle.first())
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.idle.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerLoad {
    pub assigned: u64,
    pub busy_ticks: Ticks,
}

/// Per-worker assignment counters. Only ever incremented.
#[derive(Debug, Clone)]
pub struct LoadTracker {
    workers: Vec<WorkerLoad>,
    total: u64,
}

impl LoadTracker {
    pub fn new(num_workers: usize) -> Self {
        Self {
            workers: vec![WorkerLoad::default(); num_workers],
            total: 0,
        }
    }

    pub fn record(&mut self, worker: WorkerId, duration: Ticks) {
        let load = &mut self.workers[worker];
        load.assigned += 1;
        load.busy_ticks = load.busy_ticks.saturating_add(duration);
        self.total += 1;
    }

    pub fn get(&self, worker: WorkerId) -> WorkerLoad {
        self.workers[worker]
    }

    pub fn assigned(&self, worker: WorkerId) -> u64 {
        self.workers[worker].assigned
    }

    /// Number of successful assignments across all workers.
    pub fn total_assigned(&self) -> u64 {
        self.total
    }

    pub fn counts(&self) -> impl Iterator<Item = (WorkerId, u64)> + '_ {
        self.workers
            .iter()
            .enumerate()
            .map(|(worker, load)| (worker, load.assigned))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkerLoad> {
        self.workers.iter()
    }
}

#[derive(Debug)]
pub struct WorkerCtx {
    pub now: Ticks,
    pub documents: Vec<Document>,
    pub pool: AvailabilityPool,
    // Busy worker --> document it is processing
    pub busy: FxHashMap<WorkerId, DocumentId>,
    pub load: LoadTracker,
}

impl WorkerCtx {
    pub fn new(num_workers: usize, documents: Vec<Document>) -> Self {
        debug_assert!(
            documents.iter().enumerate().all(|(i, doc)| doc.id == i),
            "DocumentId must match Vec index"
        );

        Self {
            now: Ticks::MIN,
            documents,
            pool: AvailabilityPool::full(num_workers),
            busy: FxHashMap::default(),
            load: LoadTracker::new(num_workers),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.pool.capacity()
    }

    pub fn document(&self, document: DocumentId) -> &Document {
        &self.documents[document]
    }

    pub fn advance_to(&mut self, time: Ticks) {
        debug_assert!(
            time >= self.now,
            "Time must not run backwards ({} -> {time})",
            self.now
        );
        self.now = time;
    }

    pub fn worker_is_idle(&self, worker: WorkerId) -> bool {
        self.pool.contains(worker)
    }

    // The policy has already taken `worker` out of the pool
    pub fn mark_busy(&mut self, worker: WorkerId, document: DocumentId) {
        debug_assert!(
            !self.pool.contains(worker),
            "Worker {worker} still idle after being assigned document {document}"
        );
        let prev = self.busy.insert(worker, document);
        debug_assert!(
            prev.is_none(),
            "Worker {worker} already busy with document {prev:?}"
        );

        let duration = self.documents[document].processing_duration;
        self.load.record(worker, duration);
    }

    // Return the document the worker just finished; `None` if it was not busy
    pub fn release(&mut self, worker: WorkerId) -> Option<DocumentId> {
        let document = self.busy.remove(&worker)?;
        self.pool.insert(worker);
        Some(document)
    }
}
