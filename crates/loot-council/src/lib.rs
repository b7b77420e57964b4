//! Loot council core: priority scoring, eligibility policy, and the raid roster state machine.

pub mod attendance;
pub mod config;
pub mod domain;
pub mod error;
pub mod import;
pub mod loot;
pub mod raid;
pub mod telemetry;
