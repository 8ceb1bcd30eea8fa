use super::{AssignmentPolicy, AvailabilityPool, Document, WorkerCtx, WorkerId};

/// Sends document `i` to worker `i mod m`, or to the next idle worker after
/// it, wrapping around to the lowest idle id.
#[derive(Debug, Default)]
pub struct NearestCyclicPolicy;

impl AssignmentPolicy for NearestCyclicPolicy {
    fn init(_ctx: &WorkerCtx) -> Self {
        Self
    }

    fn assign(&mut self, document: &Document, pool: &mut AvailabilityPool) -> Option<WorkerId> {
        let capacity = pool.capacity();
        if capacity == 0 {
            return None;
        }

        let preferred = document.id % capacity;
        let worker = pool.ceiling_or_wrap(preferred)?;
        pool.remove(worker);
        Some(worker)
    }
}
