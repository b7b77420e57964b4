//! Raid scheduling, signups, and lifecycle.

pub mod composition;
pub mod domain;
pub mod event;
pub mod repository;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use composition::{RoleShortfall, RosterComposition, MINIMUM_VIABLE, STANDARD_TARGET};
pub use domain::{
    Encounter, EncounterDraft, RaidError, RaidPlan, RaidStatus, Signup, SignupStatus,
};
pub use event::RaidEvent;
pub use repository::RaidRepository;
pub use schedule::SchedulingPolicy;
pub use service::{RaidService, RaidServiceError};
