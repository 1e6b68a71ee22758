//! Training-max progression between cycles, guarded against double application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CycleError, RosterEntry};

/// Persisted alongside the roster so one cycle cannot advance twice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionState {
    pub cycle: u32,
    pub advanced: bool,
    pub advanced_at: Option<DateTime<Utc>>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            cycle: 1,
            advanced: false,
            advanced_at: None,
        }
    }
}

impl ProgressionState {
    /// Move to the next cycle once the current one has been advanced,
    /// re-arming the updater. A no-op if nothing was advanced yet.
    pub fn start_next_cycle(&mut self) {
        if self.advanced {
            self.cycle += 1;
            self.advanced = false;
            self.advanced_at = None;
        }
    }
}

/// Add each entry's per-cycle increment to its training max.
///
/// The increment itself is carried through unchanged. The operation is not
/// idempotent, so `state` rejects a second call within the same cycle
/// instead of silently advancing every training max twice; on rejection the
/// roster is left untouched.
pub fn advance_roster(
    entries: &mut [RosterEntry],
    state: &mut ProgressionState,
) -> Result<(), CycleError> {
    if state.advanced {
        return Err(CycleError::AlreadyAdvanced { cycle: state.cycle });
    }
    for entry in entries.iter_mut() {
        entry.training_max += entry.increment_per_cycle;
    }
    state.advanced = true;
    state.advanced_at = Some(Utc::now());
    Ok(())
}
