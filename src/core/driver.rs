use tracing::{debug, warn};

use super::{
    event::{Event, EventKind, EventQueue, SimCoreEvent},
    observer::Observer,
    state::{Document, DocumentId, Ticks, WorkerCtx, WorkerId},
};
use crate::{error::InvalidInput, scheduler::AssignmentPolicy};

pub struct SimCore<P: AssignmentPolicy> {
    pub ctx: WorkerCtx,
    pub policy: P,
    queue: EventQueue,
    observer: Observer,
}

impl<P: AssignmentPolicy> SimCore<P> {
    /// Build the core and schedule one arrival per document.
    ///
    /// Documents must be indexed by id and have non-negative durations.
    pub fn new(num_workers: usize, documents: Vec<Document>) -> Result<Self, InvalidInput> {
        let mut queue = EventQueue::new();
        for (index, doc) in documents.iter().enumerate() {
            if doc.id != index {
                return Err(InvalidInput::DocumentIdMismatch { index, id: doc.id });
            }
            doc.validate()?;
            queue.push(Event {
                time: doc.arrival_time,
                kind: EventKind::Arrival { document: doc.id },
            });
        }

        let ctx = WorkerCtx::new(num_workers, documents);
        let policy = P::init(&ctx);
        Ok(Self {
            ctx,
            policy,
            queue,
            observer: Observer::new(),
        })
    }

    /// Process the earliest pending event. `None` once the queue has drained.
    pub fn step(&mut self) -> Option<SimCoreEvent> {
        loop {
            let event = self.queue.pop_earliest()?;
            self.ctx.advance_to(event.time);

            let (outcome, touched) = match event.kind {
                EventKind::Arrival { document } => {
                    let outcome = self.handle_arrival(document);
                    (Some(outcome), outcome.worker())
                }
                EventKind::Completion { worker } => {
                    let released = self.handle_completion(worker);
                    (released, Some(worker))
                }
            };

            self.observer.observe(&self.ctx, touched);
            if outcome.is_some() {
                return outcome;
            }
        }
    }

    fn handle_arrival(&mut self, document: DocumentId) -> SimCoreEvent {
        let doc = *self.ctx.document(document);
        let Some(worker) = self.policy.assign(&doc, &mut self.ctx.pool) else {
            debug!(t = self.ctx.now, document, "dropped, no idle worker");
            return SimCoreEvent::Dropped { document };
        };

        self.ctx.mark_busy(worker, document);
        let completes_at = doc.completes_at(self.ctx.now);
        self.queue.push(Event {
            time: completes_at,
            kind: EventKind::Completion { worker },
        });

        debug!(t = self.ctx.now, document, worker, completes_at, "assigned");
        SimCoreEvent::Assigned {
            document,
            worker,
            completes_at,
        }
    }

    fn handle_completion(&mut self, worker: WorkerId) -> Option<SimCoreEvent> {
        let Some(document) = self.ctx.release(worker) else {
            warn!(t = self.ctx.now, worker, "stray completion, skipped");
            return None;
        };
        debug!(t = self.ctx.now, worker, document, "released");
        Some(SimCoreEvent::Released { worker, document })
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::NearestCyclicPolicy;
    use tracing_test::traced_test;

    type Core = SimCore<NearestCyclicPolicy>;

    fn docs(arrivals: &[Ticks], durations: &[Ticks]) -> Vec<Document> {
        arrivals
            .iter()
            .zip(durations)
            .enumerate()
            .map(|(id, (&arrival_time, &processing_duration))| Document {
                id,
                arrival_time,
                processing_duration,
            })
            .collect()
    }

    fn new_core(workers: usize, arrivals: &[Ticks], durations: &[Ticks]) -> Core {
        Core::new(workers, docs(arrivals, durations)).unwrap()
    }

    fn run(core: &mut Core) -> Vec<(Ticks, SimCoreEvent)> {
        let mut trace = Vec::new();
        while let Some(event) = core.step() {
            trace.push((core.now(), event));
        }
        trace
    }

    fn assigned(document: DocumentId, worker: WorkerId, completes_at: Ticks) -> SimCoreEvent {
        SimCoreEvent::Assigned {
            document,
            worker,
            completes_at,
        }
    }

    fn released(worker: WorkerId, document: DocumentId) -> SimCoreEvent {
        SimCoreEvent::Released { worker, document }
    }

    fn dropped(document: DocumentId) -> SimCoreEvent {
        SimCoreEvent::Dropped { document }
    }

    #[test]
    fn reference_trace() {
        let mut core = new_core(3, &[1, 2, 3, 7], &[5, 4, 3, 2]);
        assert_eq!(core.pending_events(), 4);

        let trace = run(&mut core);
        assert_eq!(
            trace,
            vec![
                (1, assigned(0, 0, 6)),
                (2, assigned(1, 1, 6)),
                (3, assigned(2, 2, 6)),
                (6, released(0, 0)),
                (6, released(1, 1)),
                (6, released(2, 2)),
                (7, assigned(3, 0, 9)),
                (9, released(0, 3)),
            ]
        );
        assert!(core.is_drained());
        assert_eq!(core.observer().steps(), 8);
        assert_eq!(core.ctx.pool.len(), 3);
    }

    #[test]
    fn full_pool_drops_arrival() {
        let mut core = new_core(1, &[0, 0], &[100, 100]);
        let trace = run(&mut core);

        assert_eq!(
            trace,
            vec![
                (0, assigned(0, 0, 100)),
                (0, dropped(1)),
                (100, released(0, 0)),
            ]
        );
        assert_eq!(core.ctx.load.total_assigned(), 1);
    }

    #[test]
    fn same_tick_completion_frees_worker_for_arrival() {
        let mut core = new_core(1, &[0, 5], &[5, 1]);
        let trace = run(&mut core);

        assert_eq!(trace[2], (5, assigned(1, 0, 6)));
        assert_eq!(core.ctx.load.assigned(0), 2);
    }

    #[test]
    fn zero_duration_frees_worker_within_tick() {
        let mut core = new_core(1, &[3, 3], &[0, 0]);
        let trace = run(&mut core);

        assert_eq!(
            trace,
            vec![
                (3, assigned(0, 0, 3)),
                (3, released(0, 0)),
                (3, assigned(1, 0, 3)),
                (3, released(0, 1)),
            ]
        );
    }

    #[test]
    fn no_workers_drops_everything() {
        let mut core = new_core(0, &[1, 2], &[1, 1]);
        let trace = run(&mut core);

        assert_eq!(trace, vec![(1, dropped(0)), (2, dropped(1))]);
        assert_eq!(core.ctx.load.total_assigned(), 0);
    }

    #[test]
    fn new_rejects_negative_duration() {
        let result = Core::new(1, docs(&[10, 11], &[-20, 1]));
        assert_eq!(
            result.err(),
            Some(InvalidInput::NegativeDuration {
                document: 0,
                duration: -20
            })
        );
    }

    #[test]
    fn new_rejects_misnumbered_documents() {
        let mut documents = docs(&[0, 1], &[1, 1]);
        documents[1].id = 5;

        let result = Core::new(1, documents);
        assert_eq!(
            result.err(),
            Some(InvalidInput::DocumentIdMismatch { index: 1, id: 5 })
        );
    }

    #[test]
    #[traced_test]
    fn completion_for_idle_worker_is_skipped() {
        let mut core = new_core(2, &[4], &[1]);
        core.queue.push(Event {
            time: 2,
            kind: EventKind::Completion { worker: 1 },
        });

        let trace = run(&mut core);
        assert_eq!(trace, vec![(4, assigned(0, 0, 5)), (5, released(0, 0))]);
        assert_eq!(core.observer().steps(), 3);
        assert!(logs_contain("stray completion, skipped"));
    }
}
