//! Error types for the Fork Schedule service layer.

use crate::domain::CompatError;
use thiserror::Error;

/// Fork schedule service errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Candidate schedule would rewrite processed history.
    #[error(transparent)]
    Incompatible(#[from] CompatError),

    /// Reading or writing the persisted schedule failed.
    #[error("Schedule store error: {reason}")]
    Store { reason: String },

    /// The current chain head could not be determined.
    #[error("Chain head unavailable: {reason}")]
    HeadUnavailable { reason: String },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScheduleError {
    /// The conflicting rule, if this is an incompatibility.
    pub fn compat(&self) -> Option<&CompatError> {
        match self {
            Self::Incompatible(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for the Fork Schedule service.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
