//! # Domain Errors
//!
//! The single failure value of the compatibility check.

use thiserror::Error;

/// Block height (block number).
pub type BlockHeight = u64;

/// A fork rule whose change would rewrite already-processed history.
///
/// Returned as a value: the caller either reports it or rewinds the chain
/// to `rewind_to` and retries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error(
    "mismatching {what} in database (have {}, want {}, rewindto {rewind_to})",
    display_height(.stored),
    display_height(.new)
)]
pub struct CompatError {
    /// Human-readable rule name.
    pub what: String,
    /// Activation height in the stored (active) schedule.
    pub stored: Option<BlockHeight>,
    /// Activation height in the candidate schedule.
    pub new: Option<BlockHeight>,
    /// Highest block at which neither activation had taken effect.
    pub rewind_to: BlockHeight,
}

impl CompatError {
    /// Build an error, computing `rewind_to` from the two activation heights.
    ///
    /// An absent height is unreachable, so the rewind target is one below the
    /// lower of the present heights, saturating at genesis.
    pub fn new(what: impl Into<String>, stored: Option<BlockHeight>, new: Option<BlockHeight>) -> Self {
        let earliest = match (stored, new) {
            (Some(s), Some(n)) => Some(s.min(n)),
            (Some(s), None) => Some(s),
            (None, n) => n,
        };

        Self {
            what: what.into(),
            stored,
            new,
            rewind_to: earliest.map_or(0, |height| height.saturating_sub(1)),
        }
    }

    /// Prefix the rule name with the sub-schedule it was found in.
    pub fn qualified(mut self, scope: &str) -> Self {
        self.what = format!("{} {}", scope, self.what);
        self
    }
}

fn display_height(height: &Option<BlockHeight>) -> String {
    match height {
        Some(h) => h.to_string(),
        None => "nil".to_string(),
    }
}
