//! # Lowest Conflict Resolution
//!
//! A single check reports the first conflicting rule in table order, which
//! is not necessarily the one needing the deepest rewind. Re-checking at
//! each reported rewind height walks down to the lowest conflict.

use super::compatibility::check_compatible;
use crate::domain::{BlockHeight, CheckMode, CompatError, ForkSchedule};

/// Find the conflict that requires the deepest rewind.
///
/// Re-runs [`check_compatible`] at the previous error's `rewind_to` until
/// the check passes or the rewind height stops moving. Terminates because
/// each rewind target lies strictly below the head it was computed at,
/// except at genesis where it repeats.
pub fn resolve_lowest_conflict(
    stored: &ForkSchedule,
    new: &ForkSchedule,
    head: BlockHeight,
    mode: CheckMode,
) -> Result<(), CompatError> {
    let mut height = head;
    let mut lowest: Option<CompatError> = None;

    while let Err(err) = check_compatible(stored, new, height, mode) {
        if lowest
            .as_ref()
            .is_some_and(|last| last.rewind_to == err.rewind_to)
        {
            break;
        }
        height = err.rewind_to;
        lowest = Some(err);
    }

    match lowest {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
