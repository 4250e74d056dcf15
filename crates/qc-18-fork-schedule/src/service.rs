//! Fork Schedule Service - wires the compatibility check to its ports.

use crate::algorithms::{check_compatible, resolve_lowest_conflict};
use crate::config::ForkCheckConfig;
use crate::domain::{BlockHeight, CompatError, ForkSchedule};
use crate::error::{ScheduleError, ScheduleResult};
use crate::metrics;
use crate::ports::inbound::ForkScheduleApi;
use crate::ports::outbound::{ChainHeadProvider, ScheduleStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fork Schedule Service implementation.
///
/// Holds the active schedule snapshot. Candidates are checked against it
/// at the head reported by the [`ChainHeadProvider`] and persisted through
/// the [`ScheduleStore`] before the snapshot is swapped.
pub struct ForkScheduleService<S, H>
where
    S: ScheduleStore,
    H: ChainHeadProvider,
{
    config: ForkCheckConfig,
    active: RwLock<ForkSchedule>,
    store: Arc<S>,
    chain_head: Arc<H>,
    /// Serializes check-then-persist so two candidates cannot both pass
    /// against the same snapshot.
    apply_lock: Mutex<()>,
}

impl<S, H> ForkScheduleService<S, H>
where
    S: ScheduleStore,
    H: ChainHeadProvider,
{
    /// Create a service with an already-known active schedule.
    pub fn new(
        config: ForkCheckConfig,
        active: ForkSchedule,
        store: Arc<S>,
        chain_head: Arc<H>,
    ) -> Self {
        Self {
            config,
            active: RwLock::new(active),
            store,
            chain_head,
            apply_lock: Mutex::new(()),
        }
    }

    /// Create a service, loading the active schedule from the store.
    pub async fn load(
        config: ForkCheckConfig,
        store: Arc<S>,
        chain_head: Arc<H>,
    ) -> ScheduleResult<Self> {
        let active = store.load().await?;
        tracing::debug!(mode = %config.mode, "Loaded active fork schedule");
        Ok(Self::new(config, active, store, chain_head))
    }

    /// Service configuration.
    pub fn config(&self) -> &ForkCheckConfig {
        &self.config
    }

    fn check_at(&self, candidate: &ForkSchedule, head: BlockHeight, lowest: bool) -> Result<(), CompatError> {
        metrics::record_check();
        let active = self.active.read();
        if lowest {
            resolve_lowest_conflict(&active, candidate, head, self.config.mode)
        } else {
            check_compatible(&active, candidate, head, self.config.mode)
        }
    }

    async fn checked(&self, candidate: &ForkSchedule, lowest: bool) -> ScheduleResult<BlockHeight> {
        let head = self.chain_head.head_height().await?;

        if let Err(err) = self.check_at(candidate, head, lowest) {
            tracing::warn!(
                rule = %err.what,
                stored = ?err.stored,
                new = ?err.new,
                head,
                rewind_to = err.rewind_to,
                "Candidate fork schedule conflicts with processed blocks"
            );
            metrics::record_incompatible(&err.what, err.rewind_to);
            return Err(err.into());
        }

        tracing::debug!(head, mode = %self.config.mode, "Candidate fork schedule compatible");
        Ok(head)
    }
}

#[async_trait]
impl<S, H> ForkScheduleApi for ForkScheduleService<S, H>
where
    S: ScheduleStore,
    H: ChainHeadProvider,
{
    fn active_schedule(&self) -> ForkSchedule {
        self.active.read().clone()
    }

    async fn check_candidate(&self, candidate: &ForkSchedule) -> ScheduleResult<()> {
        self.checked(candidate, self.config.resolve_lowest_conflict)
            .await
            .map(|_| ())
    }

    async fn plan_rewind(&self, candidate: &ForkSchedule) -> ScheduleResult<Option<BlockHeight>> {
        match self.checked(candidate, true).await {
            Ok(_) => Ok(None),
            Err(ScheduleError::Incompatible(err)) => Ok(Some(err.rewind_to)),
            Err(err) => Err(err),
        }
    }

    async fn apply_schedule(&self, candidate: ForkSchedule) -> ScheduleResult<()> {
        let _guard = self.apply_lock.lock().await;

        let head = self
            .checked(&candidate, self.config.resolve_lowest_conflict)
            .await?;
        self.store.save(&candidate).await?;
        *self.active.write() = candidate;

        metrics::record_applied();
        tracing::info!(head, "Applied new fork schedule");
        Ok(())
    }
}
