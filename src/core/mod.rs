pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SimCore;
pub use event::{Event, EventKind, EventQueue, SimCoreEvent};
pub use state::{
    AvailabilityPool, Document, DocumentId, LoadTracker, Ticks, WorkerCtx, WorkerId, WorkerLoad,
};
