//! # Fork Schedule Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-fork-schedule = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `fork_schedule_checks_total` - Counter of compatibility checks run
//! - `fork_schedule_incompatible_total` - Counter of rejected candidates (by rule)
//! - `fork_schedule_applied_total` - Counter of schedules persisted
//! - `fork_schedule_rewind_target` - Gauge of the last computed rewind height

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_int_counter, register_int_counter_vec, Gauge, IntCounter,
    IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total compatibility checks run
    pub static ref CHECKS_TOTAL: IntCounter = register_int_counter!(
        "fork_schedule_checks_total",
        "Total number of fork schedule compatibility checks"
    )
    .expect("Failed to create CHECKS_TOTAL metric");

    /// Total rejected candidates, labeled by conflicting rule
    pub static ref INCOMPATIBLE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "fork_schedule_incompatible_total",
        "Total number of candidate schedules rejected",
        &["rule"]
    )
    .expect("Failed to create INCOMPATIBLE_TOTAL metric");

    /// Total schedules applied
    pub static ref APPLIED_TOTAL: IntCounter = register_int_counter!(
        "fork_schedule_applied_total",
        "Total number of fork schedules persisted"
    )
    .expect("Failed to create APPLIED_TOTAL metric");

    /// Last computed rewind target
    pub static ref REWIND_TARGET: Gauge = register_gauge!(
        "fork_schedule_rewind_target",
        "Block height the last rejected schedule requires rewinding to"
    )
    .expect("Failed to create REWIND_TARGET metric");
}

/// Record a compatibility check
#[cfg(feature = "metrics")]
pub fn record_check() {
    CHECKS_TOTAL.inc();
}

/// Record a rejected candidate with its conflicting rule and rewind target
#[cfg(feature = "metrics")]
pub fn record_incompatible(rule: &str, rewind_to: u64) {
    INCOMPATIBLE_TOTAL.with_label_values(&[rule]).inc();
    REWIND_TARGET.set(rewind_to as f64);
}

/// Record an applied schedule
#[cfg(feature = "metrics")]
pub fn record_applied() {
    APPLIED_TOTAL.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_check() {}

#[cfg(not(feature = "metrics"))]
pub fn record_incompatible(_rule: &str, _rewind_to: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_applied() {}
