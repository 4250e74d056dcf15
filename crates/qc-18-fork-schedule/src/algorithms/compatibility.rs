//! # Compatibility Check
//!
//! Decides whether replacing the stored fork schedule with a candidate
//! would change rules already applied to processed blocks.
//!
//! For each rule, with `s` the stored and `c` the candidate activation
//! (absent = never):
//!
//! 1. `s == c` → compatible.
//! 2. `head < s` → compatible; no processed block depended on the rule.
//! 3. otherwise → incompatible, rewind to `min(s, c) - 1` (floored at 0).
//!
//! Rules are evaluated in table order and the first conflict wins.

use super::rule_table::SCHEDULE_RULES;
use crate::domain::{
    BlockHeight, CheckMode, CompatError, ForkRule, ForkSchedule, ParameterStep, RuleCheck,
};

/// Check whether `new` may replace `stored` on a node whose highest
/// processed block is `head`.
///
/// Pure: performs no I/O and never panics.
pub fn check_compatible(
    stored: &ForkSchedule,
    new: &ForkSchedule,
    head: BlockHeight,
    mode: CheckMode,
) -> Result<(), CompatError> {
    check_rules(SCHEDULE_RULES, stored, new, head, mode)
}

/// Evaluate a rule table in order, stopping at the first conflict.
pub fn check_rules<S>(
    rules: &[ForkRule<S>],
    stored: &S,
    new: &S,
    head: BlockHeight,
    mode: CheckMode,
) -> Result<(), CompatError> {
    rules
        .iter()
        .filter(|rule| rule.gate.enabled_in(mode))
        .try_for_each(|rule| evaluate_rule(rule, stored, new, head, mode))
}

fn evaluate_rule<S>(
    rule: &ForkRule<S>,
    stored: &S,
    new: &S,
    head: BlockHeight,
    mode: CheckMode,
) -> Result<(), CompatError> {
    let conflict = match &rule.check {
        RuleCheck::Activation(activation) => {
            activation_conflict(rule.name, activation(stored), activation(new), head)
        }
        RuleCheck::ActivationWithAlias {
            activation,
            stored_alias,
        } => {
            let candidate = activation(new);
            activation_conflict(rule.name, activation(stored), candidate, head).filter(|_| {
                activation_conflict(rule.name, stored_alias(stored), candidate, head).is_some()
            })
        }
        RuleCheck::Guarded {
            activation,
            unchanged,
        } => {
            let guard = activation(stored);
            if is_reached(guard, head) && !unchanged(stored, new) {
                Some(CompatError::new(rule.name, guard, activation(new)))
            } else {
                None
            }
        }
        RuleCheck::Stepped(steps) => {
            let (stored_steps, new_steps) = (steps(stored), steps(new));
            stepped_conflict(rule.name, stored_steps, new_steps, head).or_else(|| {
                (mode == CheckMode::Extended)
                    .then(|| stepped_value_conflict(rule.name, stored_steps, new_steps, head))
                    .flatten()
            })
        }
        RuleCheck::Nested(check) => {
            return check(stored, new, head, mode).map_err(|err| err.qualified(rule.name));
        }
    };

    match conflict {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Scalar decision procedure for one activation height.
pub fn activation_conflict(
    what: &str,
    stored: Option<BlockHeight>,
    new: Option<BlockHeight>,
    head: BlockHeight,
) -> Option<CompatError> {
    if stored == new || !is_reached(stored, head) {
        return None;
    }
    Some(CompatError::new(what, stored, new))
}

/// Compare two stepped sequences at their first differing entry.
///
/// The scalar procedure runs on that entry's activation heights. A missing
/// trailing entry counts as an unscheduled step. A value change at an
/// unchanged height is compatible here; see [`stepped_value_conflict`].
pub fn stepped_conflict(
    what: &str,
    stored: &[ParameterStep],
    new: &[ParameterStep],
    head: BlockHeight,
) -> Option<CompatError> {
    let (stored_block, new_block) = first_step_difference(stored, new)?;
    activation_conflict(what, stored_block, new_block, head)
}

/// Stricter stepped check evaluated in [`CheckMode::Extended`]: the first
/// differing entry keeps its height but changes its value, and that height
/// has been reached. Rewinds to just before it.
pub fn stepped_value_conflict(
    what: &str,
    stored: &[ParameterStep],
    new: &[ParameterStep],
    head: BlockHeight,
) -> Option<CompatError> {
    let (stored_block, new_block) = first_step_difference(stored, new)?;
    (stored_block == new_block && is_reached(stored_block, head))
        .then(|| CompatError::new(what, stored_block, new_block))
}

/// Activation heights of the first differing entry, absent past the end.
fn first_step_difference(
    stored: &[ParameterStep],
    new: &[ParameterStep],
) -> Option<(Option<BlockHeight>, Option<BlockHeight>)> {
    let len = stored.len().max(new.len());
    (0..len)
        .map(|i| (stored.get(i), new.get(i)))
        .find(|(s, n)| s != n)
        .map(|(s, n)| (s.map(|step| step.block), n.map(|step| step.block)))
}

/// Whether an activation has taken effect at `head`. Absent never has.
fn is_reached(activation: Option<BlockHeight>, head: BlockHeight) -> bool {
    activation.is_some_and(|block| block <= head)
}
