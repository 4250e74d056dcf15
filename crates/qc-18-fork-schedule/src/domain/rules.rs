//! # Fork Rules
//!
//! A rule table is data: an ordered list of named checks over a schedule
//! type. The comparison algorithm never special-cases an individual fork.

use super::errors::{BlockHeight, CompatError};
use super::schedule::ParameterStep;
use crate::error::ScheduleError;
use std::fmt;
use std::str::FromStr;

/// Which rules a compatibility check evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Rules gated [`RuleGate::Always`] only.
    #[default]
    Baseline,
    /// Baseline rules plus rules gated [`RuleGate::Extended`], and stepped
    /// value changes at an unchanged, reached height.
    Extended,
}

impl From<bool> for CheckMode {
    fn from(extended: bool) -> Self {
        if extended {
            Self::Extended
        } else {
            Self::Baseline
        }
    }
}

impl FromStr for CheckMode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" | "false" | "0" => Ok(Self::Baseline),
            "extended" | "true" | "1" => Ok(Self::Extended),
            other => Err(ScheduleError::Config(format!(
                "unknown fork check mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// Mode in which a rule takes part in the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleGate {
    /// Evaluated in every mode.
    Always,
    /// Evaluated only in [`CheckMode::Extended`].
    Extended,
}

impl RuleGate {
    /// Whether a rule with this gate runs under `mode`.
    pub fn enabled_in(self, mode: CheckMode) -> bool {
        match self {
            Self::Always => true,
            Self::Extended => mode == CheckMode::Extended,
        }
    }
}

/// Signature of a nested sub-schedule check.
pub type NestedCheck<S> = fn(&S, &S, BlockHeight, CheckMode) -> Result<(), CompatError>;

/// Shape of a rule.
pub enum RuleCheck<S> {
    /// A single activation height.
    Activation(fn(&S) -> Option<BlockHeight>),
    /// An activation height that may also move to the stored value of
    /// `stored_alias` without conflict.
    ActivationWithAlias {
        /// Activation height of the rule itself.
        activation: fn(&S) -> Option<BlockHeight>,
        /// Stored height the candidate may equal instead.
        stored_alias: fn(&S) -> Option<BlockHeight>,
    },
    /// A value that must not change once `activation` has been reached
    /// under the stored schedule.
    Guarded {
        /// Activation height guarding the value.
        activation: fn(&S) -> Option<BlockHeight>,
        /// Whether the guarded value is the same in (stored, candidate).
        unchanged: fn(&S, &S) -> bool,
    },
    /// An ordered list of stepped parameter values.
    Stepped(fn(&S) -> &[ParameterStep]),
    /// A sub-schedule checked with its own rule table.
    Nested(NestedCheck<S>),
}

/// One named entry of a rule table.
pub struct ForkRule<S> {
    /// Name reported in [`CompatError::what`]; for nested rules, the scope
    /// prefixed to inner rule names.
    pub name: &'static str,
    /// Modes in which the rule is evaluated.
    pub gate: RuleGate,
    /// How stored and candidate schedules are compared.
    pub check: RuleCheck<S>,
}

impl<S> ForkRule<S> {
    /// Scalar activation rule.
    pub const fn activation(name: &'static str, activation: fn(&S) -> Option<BlockHeight>) -> Self {
        Self {
            name,
            gate: RuleGate::Always,
            check: RuleCheck::Activation(activation),
        }
    }

    /// Scalar activation rule with an accepted stored alias.
    pub const fn activation_with_alias(
        name: &'static str,
        activation: fn(&S) -> Option<BlockHeight>,
        stored_alias: fn(&S) -> Option<BlockHeight>,
    ) -> Self {
        Self {
            name,
            gate: RuleGate::Always,
            check: RuleCheck::ActivationWithAlias {
                activation,
                stored_alias,
            },
        }
    }

    /// Value frozen once its guarding fork activated.
    pub const fn guarded(
        name: &'static str,
        activation: fn(&S) -> Option<BlockHeight>,
        unchanged: fn(&S, &S) -> bool,
    ) -> Self {
        Self {
            name,
            gate: RuleGate::Always,
            check: RuleCheck::Guarded {
                activation,
                unchanged,
            },
        }
    }

    /// Stepped parameter rule.
    pub const fn stepped(name: &'static str, steps: fn(&S) -> &[ParameterStep]) -> Self {
        Self {
            name,
            gate: RuleGate::Always,
            check: RuleCheck::Stepped(steps),
        }
    }

    /// Nested sub-schedule reported under `scope`.
    pub const fn nested(scope: &'static str, check: NestedCheck<S>) -> Self {
        Self {
            name: scope,
            gate: RuleGate::Always,
            check: RuleCheck::Nested(check),
        }
    }

    /// Restrict the rule to [`CheckMode::Extended`].
    pub const fn extended(self) -> Self {
        Self {
            gate: RuleGate::Extended,
            ..self
        }
    }
}
