//! # Outbound Ports
//!
//! Traits for external dependencies (schedule persistence, chain head).

use crate::domain::{BlockHeight, ForkSchedule};
use crate::error::ScheduleResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Schedule persistence - outbound port.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Load the persisted (active) schedule.
    async fn load(&self) -> ScheduleResult<ForkSchedule>;

    /// Persist a schedule as the new active schedule.
    async fn save(&self, schedule: &ForkSchedule) -> ScheduleResult<()>;
}

/// Chain state - outbound port.
#[async_trait]
pub trait ChainHeadProvider: Send + Sync {
    /// Highest processed block height.
    async fn head_height(&self) -> ScheduleResult<BlockHeight>;
}

// =============================================================================
// In-Memory Implementations
// =============================================================================

/// In-memory schedule store.
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    schedule: RwLock<ForkSchedule>,
    saves: AtomicUsize,
}

impl InMemoryScheduleStore {
    /// Create a store holding `schedule`.
    pub fn new(schedule: ForkSchedule) -> Self {
        Self {
            schedule: RwLock::new(schedule),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current persisted schedule.
    pub fn snapshot(&self) -> ForkSchedule {
        self.schedule.read().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn load(&self) -> ScheduleResult<ForkSchedule> {
        Ok(self.snapshot())
    }

    async fn save(&self, schedule: &ForkSchedule) -> ScheduleResult<()> {
        *self.schedule.write() = schedule.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Chain head at a settable height.
#[derive(Debug, Default)]
pub struct FixedChainHead {
    height: AtomicU64,
}

impl FixedChainHead {
    /// Create a head at `height`.
    pub fn new(height: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Move the head (e.g. after a rewind).
    pub fn set(&self, height: BlockHeight) {
        self.height.store(height, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainHeadProvider for FixedChainHead {
    async fn head_height(&self) -> ScheduleResult<BlockHeight> {
        Ok(self.height.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_roundtrip() {
        let store = InMemoryScheduleStore::default();
        let schedule = ForkSchedule::all_protocol_changes();

        store.save(&schedule).await.unwrap();
        assert_eq!(store.load().await.unwrap(), schedule);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_fixed_chain_head_set() {
        let head = FixedChainHead::new(100);
        assert_eq!(head.head_height().await.unwrap(), 100);
        head.set(42);
        assert_eq!(head.head_height().await.unwrap(), 42);
    }
}
