//! # Algorithms Module
//!
//! Compatibility checking over fork rule tables.

pub mod compatibility;
pub mod lowest_conflict;
pub mod rule_table;

pub use compatibility::{
    activation_conflict, check_compatible, check_rules, stepped_conflict, stepped_value_conflict,
};
pub use lowest_conflict::resolve_lowest_conflict;
pub use rule_table::{ISTANBUL_RULES, ISTANBUL_SCOPE, SCHEDULE_RULES};
