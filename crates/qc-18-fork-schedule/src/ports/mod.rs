//! # Ports
//!
//! Inbound API and outbound dependencies of the Fork Schedule subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::ForkScheduleApi;
pub use outbound::{ChainHeadProvider, FixedChainHead, InMemoryScheduleStore, ScheduleStore};
