use super::state::{WorkerCtx, WorkerId};

/// Checks worker bookkeeping after every step.
///
/// Only the worker touched by the step is inspected, so a check costs the
/// same as the step itself.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &WorkerCtx, touched: Option<WorkerId>) {
        self.step += 1;

        let num_workers = ctx.num_workers();
        debug_assert_eq!(
            ctx.pool.len() + ctx.busy.len(),
            num_workers,
            "Idle and busy workers must cover all {num_workers} workers"
        );
        debug_assert!(
            ctx.load.total_assigned() <= ctx.documents.len() as u64,
            "More assignments than documents"
        );

        let Some(worker) = touched else { return };
        debug_assert!(
            worker < num_workers,
            "Worker {worker} outside pool of {num_workers}"
        );

        match ctx.busy.get(&worker) {
            Some(&document) => {
                debug_assert!(
                    !ctx.pool.contains(worker),
                    "Worker {worker} is both idle and busy"
                );
                let doc = ctx.document(document);
                debug_assert!(
                    doc.arrival_time <= ctx.now && doc.completes_at(doc.arrival_time) >= ctx.now,
                    "Worker {worker} holds document {document} outside its processing window at t={}",
                    ctx.now
                );
            }
            None => debug_assert!(
                ctx.pool.contains(worker),
                "Worker {worker} is neither idle nor busy"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Document;

    fn one_doc() -> Vec<Document> {
        vec![Document {
            id: 0,
            arrival_time: 0,
            processing_duration: 1,
        }]
    }

    #[test]
    fn counts_steps() {
        let ctx = WorkerCtx::new(2, Vec::new());
        let mut observer = Observer::new();
        observer.observe(&ctx, None);
        observer.observe(&ctx, Some(1));
        assert_eq!(observer.steps(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "both idle and busy")]
    fn flags_worker_both_idle_and_busy() {
        let mut ctx = WorkerCtx::new(2, one_doc());
        ctx.now = 0;
        // Worker 1 went missing and worker 0 never left the pool
        ctx.pool.remove(1);
        ctx.busy.insert(0, 0);

        Observer::new().observe(&ctx, Some(0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must cover all")]
    fn flags_lost_worker() {
        let mut ctx = WorkerCtx::new(3, one_doc());
        ctx.pool.remove(2);

        Observer::new().observe(&ctx, None);
    }

    #[test]
    fn untouched_workers_are_not_rescanned() {
        let mut ctx = WorkerCtx::new(3, one_doc());
        ctx.now = 0;
        // Worker 1 is double-booked and worker 2 is lost, but only worker 0 was touched
        ctx.pool.remove(0);
        ctx.busy.insert(0, 0);
        ctx.pool.remove(2);
        ctx.busy.insert(1, 0);

        Observer::new().observe(&ctx, Some(0));
    }
}
