//! # Rule Tables
//!
//! Evaluation order is the chronological order of protocol upgrades,
//! followed by permissioning and the stepped code size limit. Adding a fork
//! means adding a row here; the comparison algorithm stays untouched.
//! Protocol upgrades after Istanbul go between the Istanbul sub-schedule row
//! and the permissions row.

use super::compatibility::check_rules;
use crate::domain::{
    BlockHeight, CheckMode, CompatError, ForkRule, ForkSchedule, IstanbulSchedule, ParameterStep,
};

/// Scope prefixed to rule names of the Istanbul sub-schedule.
pub const ISTANBUL_SCOPE: &str = "Istanbul";

/// Top-level rule table.
pub static SCHEDULE_RULES: &[ForkRule<ForkSchedule>] = &[
    ForkRule::activation("Homestead fork block", |s: &ForkSchedule| s.homestead_block),
    ForkRule::activation("DAO fork block", |s: &ForkSchedule| s.dao_fork_block),
    ForkRule::guarded(
        "DAO fork support flag",
        |s: &ForkSchedule| s.dao_fork_block,
        |stored: &ForkSchedule, new: &ForkSchedule| stored.dao_fork_support == new.dao_fork_support,
    ),
    ForkRule::activation("EIP150 fork block", |s: &ForkSchedule| s.eip150_block),
    ForkRule::activation("EIP155 fork block", |s: &ForkSchedule| s.eip155_block),
    ForkRule::guarded(
        "EIP155 chain ID",
        |s: &ForkSchedule| s.eip155_block,
        |stored: &ForkSchedule, new: &ForkSchedule| {
            stored.chain_id.is_none() || stored.chain_id == new.chain_id
        },
    )
    .extended(),
    ForkRule::activation("EIP158 fork block", |s: &ForkSchedule| s.eip158_block),
    ForkRule::guarded(
        "EIP158 chain ID",
        |s: &ForkSchedule| s.eip158_block,
        |stored: &ForkSchedule, new: &ForkSchedule| stored.chain_id == new.chain_id,
    ),
    ForkRule::activation("Byzantium fork block", |s: &ForkSchedule| s.byzantium_block),
    ForkRule::activation("Constantinople fork block", |s: &ForkSchedule| {
        s.constantinople_block
    }),
    // Petersburg may be pulled back onto Constantinople: fork ordering
    // requires Petersburg whenever Constantinople is set.
    ForkRule::activation_with_alias(
        "Petersburg fork block",
        |s: &ForkSchedule| s.petersburg_block,
        |s: &ForkSchedule| s.constantinople_block,
    ),
    ForkRule::activation("Istanbul fork block", |s: &ForkSchedule| s.istanbul_block),
    ForkRule::nested(ISTANBUL_SCOPE, check_istanbul),
    ForkRule::activation("permissions fork block", |s: &ForkSchedule| s.qip714_block),
    ForkRule::stepped("max code size change fork block", max_code_size_steps),
];

/// Istanbul sub-schedule rule table.
pub static ISTANBUL_RULES: &[ForkRule<IstanbulSchedule>] = &[ForkRule::activation(
    "Ceil 2N/3 fork block",
    |s: &IstanbulSchedule| s.ceil2nby3_block,
)];

fn max_code_size_steps(schedule: &ForkSchedule) -> &[ParameterStep] {
    &schedule.max_code_size
}

/// A missing sub-schedule behaves as one with every rule unscheduled.
fn check_istanbul(
    stored: &ForkSchedule,
    new: &ForkSchedule,
    head: BlockHeight,
    mode: CheckMode,
) -> Result<(), CompatError> {
    let unscheduled = IstanbulSchedule::default();
    check_rules(
        ISTANBUL_RULES,
        stored.istanbul.as_ref().unwrap_or(&unscheduled),
        new.istanbul.as_ref().unwrap_or(&unscheduled),
        head,
        mode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleGate;
    use std::collections::HashSet;

    #[test]
    fn test_rule_names_unique() {
        let names: HashSet<_> = SCHEDULE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), SCHEDULE_RULES.len());
    }

    #[test]
    fn test_chronological_order() {
        let names: Vec<_> = SCHEDULE_RULES.iter().map(|r| r.name).collect();
        let pos = |name: &str| names.iter().position(|n| *n == name).unwrap();

        assert!(pos("Homestead fork block") < pos("EIP150 fork block"));
        assert!(pos("EIP150 fork block") < pos("Byzantium fork block"));
        assert!(pos("Constantinople fork block") < pos("Petersburg fork block"));
        assert!(pos(ISTANBUL_SCOPE) < pos("permissions fork block"));
        assert_eq!(names.last(), Some(&"max code size change fork block"));
    }

    #[test]
    fn test_only_eip155_chain_id_is_extended() {
        let extended: Vec<_> = SCHEDULE_RULES
            .iter()
            .filter(|r| r.gate == RuleGate::Extended)
            .map(|r| r.name)
            .collect();
        assert_eq!(extended, vec!["EIP155 chain ID"]);
    }

    #[test]
    fn test_missing_istanbul_is_unscheduled() {
        let stored = ForkSchedule::default();
        let new = ForkSchedule {
            istanbul: Some(IstanbulSchedule::default()),
            ..Default::default()
        };
        assert!(check_istanbul(&stored, &new, 100, CheckMode::Baseline).is_ok());
    }
}
