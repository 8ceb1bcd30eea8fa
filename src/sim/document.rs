use serde::Serialize;

use crate::core::state::{Document, Ticks, WorkerId};
use crate::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Outcome {
    Pending,
    Running {
        worker: WorkerId,
        started_at: Ticks,
    },
    Completed {
        worker: WorkerId,
        started_at: Ticks,
        completed_at: Ticks,
    },
    Dropped,
}

#[derive(Debug, Clone)]
pub struct DocumentInstance {
    pub document: Document,
    pub outcome: Outcome,
}

impl DocumentInstance {
    pub fn is_settled(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. } | Outcome::Dropped)
    }

    pub fn worker(&self) -> Option<WorkerId> {
        match self.outcome {
            Outcome::Running { worker, .. } | Outcome::Completed { worker, .. } => Some(worker),
            Outcome::Pending | Outcome::Dropped => None,
        }
    }
}

/// Zip the two input columns into documents, failing fast on anything the
/// event loop cannot order.
pub fn documents_from_columns(
    arrival_times: &[Ticks],
    processing_durations: &[Ticks],
) -> Result<Vec<Document>, InvalidInput> {
    if arrival_times.len() != processing_durations.len() {
        return Err(InvalidInput::LengthMismatch {
            arrivals: arrival_times.len(),
            durations: processing_durations.len(),
        });
    }

    arrival_times
        .iter()
        .zip(processing_durations)
        .enumerate()
        .map(|(id, (&arrival_time, &processing_duration))| {
            let document = Document {
                id,
                arrival_time,
                processing_duration,
            };
            document.validate()?;
            Ok(document)
        })
        .collect()
}
