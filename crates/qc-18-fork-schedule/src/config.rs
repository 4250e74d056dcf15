//! Fork check configuration from defaults and environment variables.

use crate::domain::CheckMode;
use std::env;

/// Configuration for the fork schedule service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForkCheckConfig {
    /// Rule set evaluated by the compatibility check.
    pub mode: CheckMode,

    /// Report the conflict needing the deepest rewind instead of the first
    /// conflict in rule order.
    pub resolve_lowest_conflict: bool,
}

impl ForkCheckConfig {
    /// Create configuration for testing.
    pub fn for_testing() -> Self {
        Self {
            mode: CheckMode::Extended,
            resolve_lowest_conflict: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_FORK_CHECK_MODE`: `baseline` or `extended` (default: baseline)
    /// - `QC_FORK_RESOLVE_LOWEST`: report the deepest conflict (default: false)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mode = match lookup("QC_FORK_CHECK_MODE") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(value = %raw, error = %err, "Ignoring QC_FORK_CHECK_MODE");
                CheckMode::default()
            }),
            None => CheckMode::default(),
        };

        let resolve_lowest_conflict = lookup("QC_FORK_RESOLVE_LOWEST")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Self {
            mode,
            resolve_lowest_conflict,
        }
    }
}
