use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Ticks;
use crate::error::{InvalidInput, SimError};

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of indexer workers.
    pub workers: usize,
    /// How many of the busiest workers to report.
    pub top_k: usize,
}

impl SimConfig {
    pub fn new(workers: usize, top_k: usize) -> Self {
        Self { workers, top_k }
    }

    /// Build from raw signed values, rejecting negatives.
    pub fn try_from_signed(workers: i64, top_k: i64) -> Result<Self, InvalidInput> {
        let workers =
            usize::try_from(workers).map_err(|_| InvalidInput::WorkersOutOfRange(workers))?;
        let top_k = usize::try_from(top_k).map_err(|_| InvalidInput::TopKOutOfRange(top_k))?;
        Ok(Self { workers, top_k })
    }
}

/// A complete simulation input, as stored in a JSON scenario file.
///
/// ```json
/// {
///   "workers": 3,
///   "top_k": 2,
///   "arrival_times": [1, 2, 3, 7],
///   "processing_durations": [5, 4, 3, 2]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub workers: i64,
    pub top_k: i64,
    pub arrival_times: Vec<Ticks>,
    pub processing_durations: Vec<Ticks>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SimError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn config(&self) -> Result<SimConfig, InvalidInput> {
        SimConfig::try_from_signed(self.workers, self.top_k)
    }
}
