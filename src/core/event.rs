//! Time-ordered event queue.
//!
//! Events are ordered by:
//! 1. Time (earlier first)
//! 2. Kind (completions before arrivals, so capacity freed at a tick is
//!    visible to documents arriving at that same tick)
//! 3. Subject id (lower worker/document id first)

use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Ordering;
use std::fmt;
use tracing::trace;

use crate::core::{DocumentId, Ticks, WorkerId};

/// What an event is about. Also the queue key: a document arrives once and a
/// worker has at most one completion pending, so keys never collide.
///
/// Variant order is part of the tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Completion { worker: WorkerId },
    Arrival { document: DocumentId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: Ticks,
    pub kind: EventKind,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Event's Ord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Due(Event);

impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Due {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

pub struct EventQueue {
    pending: KeyedPriorityQueue<EventKind, Due>,
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: KeyedPriorityQueue::new(),
        }
    }

    pub fn push(&mut self, event: Event) {
        trace!(time = event.time, kind = ?event.kind, "schedule");
        let replaced = self.pending.push(event.kind, Due(event));
        debug_assert!(
            replaced.is_none(),
            "{:?} already pending in the event queue",
            event.kind
        );
    }

    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.pending.pop().map(|(_, Due(event))| event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What a single step of the simulation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCoreEvent {
    Assigned {
        document: DocumentId,
        worker: WorkerId,
        completes_at: Ticks,
    },
    // No idle worker at arrival
    Dropped {
        document: DocumentId,
    },
    Released {
        worker: WorkerId,
        document: DocumentId,
    },
}

impl SimCoreEvent {
    /// The worker whose state this step changed, if any.
    pub fn worker(&self) -> Option<WorkerId> {
        match *self {
            Self::Assigned { worker, .. } | Self::Released { worker, .. } => Some(worker),
            Self::Dropped { .. } => None,
        }
    }
}
