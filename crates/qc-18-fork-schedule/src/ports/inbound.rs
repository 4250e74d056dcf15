//! # Inbound Ports
//!
//! API trait defining what the Fork Schedule subsystem can do.

use crate::domain::{BlockHeight, ForkSchedule};
use crate::error::ScheduleResult;
use async_trait::async_trait;

/// Fork Schedule API - inbound port.
#[async_trait]
pub trait ForkScheduleApi: Send + Sync {
    /// Snapshot of the currently active schedule.
    fn active_schedule(&self) -> ForkSchedule;

    /// Check a candidate against the active schedule at the current head.
    ///
    /// Returns `ScheduleError::Incompatible` when the candidate conflicts.
    async fn check_candidate(&self, candidate: &ForkSchedule) -> ScheduleResult<()>;

    /// Height the chain must be rewound to before `candidate` can be
    /// applied, `None` if it can be applied now.
    async fn plan_rewind(&self, candidate: &ForkSchedule) -> ScheduleResult<Option<BlockHeight>>;

    /// Check, persist and activate a candidate schedule.
    ///
    /// Nothing is persisted when the check fails.
    async fn apply_schedule(&self, candidate: ForkSchedule) -> ScheduleResult<()>;
}
