//! # Domain Invariants
//!
//! Properties every compatibility outcome must satisfy.

use super::errors::{BlockHeight, CompatError};
use super::schedule::ForkSchedule;

/// Invariant: the rewind target precedes both conflicting activations.
///
/// Genesis is the floor: an activation at block 0 rewinds to 0.
pub fn invariant_rewind_precedes_activation(err: &CompatError) -> bool {
    [err.stored, err.new]
        .into_iter()
        .flatten()
        .all(|height| err.rewind_to < height || (height == 0 && err.rewind_to == 0))
}

/// Invariant: a conflict is only reported for a rule the stored schedule
/// had already activated at `head`.
///
/// Guarded and stepped rules report the heights of their guarding
/// activation, so this holds for every rule shape.
pub fn invariant_conflict_already_active(err: &CompatError, head: BlockHeight) -> bool {
    err.stored.is_some_and(|stored| stored <= head)
}

/// Invariant: re-applying the same schedule is always accepted.
pub fn invariant_reflexive<F>(check: F, schedule: &ForkSchedule, head: BlockHeight) -> bool
where
    F: Fn(&ForkSchedule, &ForkSchedule, BlockHeight) -> Result<(), CompatError>,
{
    check(schedule, schedule, head).is_ok()
}
