pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use config::{Scenario, SimConfig};
pub use crate::core::SimCoreEvent;
pub use error::{InvalidInput, SimError};
pub use scheduler::{AssignmentPolicy, NearestCyclicPolicy};
pub use sim::{Report, Sim, simulate, top_k};
