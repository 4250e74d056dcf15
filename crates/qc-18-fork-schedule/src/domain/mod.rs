//! # Domain Module
//!
//! Schedules, rule tables and the compatibility error value.

pub mod errors;
pub mod invariants;
pub mod rules;
pub mod schedule;

pub use errors::*;
pub use invariants::*;
pub use rules::*;
pub use schedule::*;
