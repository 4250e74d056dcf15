//! # Fork Schedule Service Flow
//!
//! End-to-end use of the service through its ports: reject, rewind,
//! retry, and failure of the collaborators.

use async_trait::async_trait;
use qc_18_fork_schedule::{
    BlockHeight, ChainHeadProvider, CheckMode, CompatError, FixedChainHead, ForkCheckConfig,
    ForkSchedule, ForkScheduleApi, ForkScheduleService, InMemoryScheduleStore, ParameterStep,
    ScheduleError, ScheduleResult, ScheduleStore,
};
use std::sync::Arc;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("qc_18_fork_schedule=debug"))
        .with_test_writer()
        .try_init();
}

/// Store whose writes always fail.
struct ReadOnlyStore(ForkSchedule);

#[async_trait]
impl ScheduleStore for ReadOnlyStore {
    async fn load(&self) -> ScheduleResult<ForkSchedule> {
        Ok(self.0.clone())
    }

    async fn save(&self, _schedule: &ForkSchedule) -> ScheduleResult<()> {
        Err(ScheduleError::Store {
            reason: "read-only".to_string(),
        })
    }
}

/// Chain head that cannot be read.
struct OfflineChainHead;

#[async_trait]
impl ChainHeadProvider for OfflineChainHead {
    async fn head_height(&self) -> ScheduleResult<BlockHeight> {
        Err(ScheduleError::HeadUnavailable {
            reason: "state manager offline".to_string(),
        })
    }
}

fn permissioned(qip714: BlockHeight) -> ForkSchedule {
    ForkSchedule {
        qip714_block: Some(qip714),
        ..ForkSchedule::all_protocol_changes()
    }
}

async fn loaded(
    config: ForkCheckConfig,
    active: ForkSchedule,
    head: BlockHeight,
) -> (
    ForkScheduleService<InMemoryScheduleStore, FixedChainHead>,
    Arc<InMemoryScheduleStore>,
    Arc<FixedChainHead>,
) {
    let store = Arc::new(InMemoryScheduleStore::new(active));
    let chain_head = Arc::new(FixedChainHead::new(head));
    let service = ForkScheduleService::load(config, store.clone(), chain_head.clone())
        .await
        .unwrap();
    (service, store, chain_head)
}

// =============================================================================
// FLOWS
// =============================================================================

#[tokio::test]
async fn test_load_uses_persisted_schedule() {
    let (service, _, _) = loaded(ForkCheckConfig::default(), permissioned(10), 0).await;
    assert_eq!(service.active_schedule(), permissioned(10));
}

#[tokio::test]
async fn test_reject_then_rewind_then_apply() {
    init_tracing();
    let (service, store, chain_head) =
        loaded(ForkCheckConfig::default(), permissioned(10), 30).await;
    let candidate = permissioned(20);

    let err = service.apply_schedule(candidate.clone()).await.unwrap_err();
    assert_eq!(
        err.compat(),
        Some(&CompatError::new("permissions fork block", Some(10), Some(20)))
    );
    assert_eq!(store.save_count(), 0);
    assert_eq!(service.active_schedule(), permissioned(10));

    let rewind_to = service.plan_rewind(&candidate).await.unwrap();
    assert_eq!(rewind_to, Some(9));

    chain_head.set(9);
    service.apply_schedule(candidate.clone()).await.unwrap();
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot(), candidate);
    assert_eq!(service.active_schedule(), candidate);
}

#[tokio::test]
async fn test_plan_rewind_reports_deepest_conflict() {
    let stored = ForkSchedule {
        byzantium_block: Some(40),
        max_code_size: vec![ParameterStep::new(0, 24), ParameterStep::new(10, 32)],
        ..Default::default()
    };
    let candidate = ForkSchedule {
        byzantium_block: Some(45),
        max_code_size: vec![ParameterStep::new(0, 24), ParameterStep::new(20, 48)],
        ..Default::default()
    };
    let (service, _, _) = loaded(ForkCheckConfig::default(), stored, 60).await;

    // First conflict in rule order is Byzantium
    let err = service.check_candidate(&candidate).await.unwrap_err();
    assert_eq!(err.compat().map(|e| e.rewind_to), Some(39));

    // A rewind to 39 would still conflict on the code size step at 10
    assert_eq!(service.plan_rewind(&candidate).await.unwrap(), Some(9));
}

#[tokio::test]
async fn test_resolve_lowest_conflict_config() {
    let stored = ForkSchedule {
        homestead_block: Some(20),
        eip150_block: Some(5),
        ..Default::default()
    };
    let candidate = ForkSchedule {
        homestead_block: Some(30),
        eip150_block: Some(8),
        ..Default::default()
    };
    let config = ForkCheckConfig {
        resolve_lowest_conflict: true,
        ..Default::default()
    };
    let (service, _, _) = loaded(config, stored, 50).await;

    let err = service.check_candidate(&candidate).await.unwrap_err();
    assert_eq!(
        err.compat(),
        Some(&CompatError::new("EIP150 fork block", Some(5), Some(8)))
    );
}

#[tokio::test]
async fn test_extended_mode_checks_eip155_chain_id() {
    let stored = ForkSchedule::all_protocol_changes();
    let candidate = ForkSchedule {
        chain_id: Some(2018),
        eip158_block: None,
        ..ForkSchedule::all_protocol_changes()
    };

    let (baseline, _, _) = loaded(ForkCheckConfig::default(), stored.clone(), 10).await;
    let err = baseline.check_candidate(&candidate).await.unwrap_err();
    assert_eq!(err.compat().map(|e| e.what.as_str()), Some("EIP158 fork block"));

    let config = ForkCheckConfig {
        mode: CheckMode::Extended,
        ..Default::default()
    };
    let (extended, _, _) = loaded(config, stored, 10).await;
    let err = extended.check_candidate(&candidate).await.unwrap_err();
    assert_eq!(err.compat().map(|e| e.what.as_str()), Some("EIP155 chain ID"));
}

#[tokio::test]
async fn test_failed_save_keeps_active_schedule() {
    init_tracing();
    let active = permissioned(10);
    let service = ForkScheduleService::new(
        ForkCheckConfig::default(),
        active.clone(),
        Arc::new(ReadOnlyStore(active.clone())),
        Arc::new(FixedChainHead::new(5)),
    );

    let err = service.apply_schedule(permissioned(20)).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Store { .. }));
    assert_eq!(service.active_schedule(), active);
}

#[tokio::test]
async fn test_unavailable_head_is_an_error() {
    let active = permissioned(10);
    let service = ForkScheduleService::new(
        ForkCheckConfig::default(),
        active.clone(),
        Arc::new(InMemoryScheduleStore::new(active.clone())),
        Arc::new(OfflineChainHead),
    );

    let err = service.check_candidate(&active).await.unwrap_err();
    assert!(matches!(err, ScheduleError::HeadUnavailable { .. }));
    assert!(err.compat().is_none());

    let err = service.plan_rewind(&active).await.unwrap_err();
    assert!(matches!(err, ScheduleError::HeadUnavailable { .. }));
}

#[tokio::test]
async fn test_concurrent_applies_serialize() {
    let (service, store, _) = loaded(ForkCheckConfig::default(), permissioned(100), 50).await;
    let service = Arc::new(service);

    let handles: Vec<_> = (60..70)
        .map(|qip714| {
            let service = service.clone();
            tokio::spawn(async move { service.apply_schedule(permissioned(qip714)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Every candidate moved an unreached fork, so all were applied in turn
    assert_eq!(store.save_count(), 10);
    assert_eq!(service.active_schedule(), store.snapshot());
}
