pub mod cyclic;

use crate::core::state::{AvailabilityPool, Document, WorkerCtx, WorkerId};
pub use cyclic::NearestCyclicPolicy;

/// Decides which idle worker, if any, takes an arriving document.
pub trait AssignmentPolicy {
    fn init(ctx: &WorkerCtx) -> Self;

    /// Pick a worker for `document` and take it out of `pool`.
    ///
    /// Returning `None` drops the document: it is never retried and never
    /// counted against any worker.
    fn assign(&mut self, document: &Document, pool: &mut AvailabilityPool) -> Option<WorkerId>;
}
