use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

/// Default number of sources the bounded engine keeps staged at once.
pub const DEFAULT_ACTIVE_SET_CAPACITY: usize = 1000;

/// Tunables for the merge engines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum number of sources the bounded engine keeps active. Bounds
    /// memory and the fan-out of open sources.
    pub active_set_capacity: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            active_set_capacity: DEFAULT_ACTIVE_SET_CAPACITY,
        }
    }
}

impl MergeConfig {
    pub fn with_capacity(active_set_capacity: usize) -> Self {
        Self {
            active_set_capacity,
        }
    }

    /// Reject a zero capacity.
    pub fn validate(&self) -> MergeResult<()> {
        if self.active_set_capacity == 0 {
            return Err(MergeError::InvalidCapacity(self.active_set_capacity));
        }
        Ok(())
    }
}
