//! Loot priority scoring, eligibility policy, and the service that ranks raiders per item.

pub mod config;
pub mod eligibility;
pub mod report;
pub mod repository;
pub mod scores;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{
    EligibilityThresholds, GuildConfigLoadError, GuildScoringConfig, MeritWeights,
    PriorityWeights, RecencyParams, WeightConfigError,
};
pub use eligibility::{
    can_revoke_award, is_eligible, should_apply_recency_decay, Eligibility, EligibilityError,
    EligibilityPolicy, IneligibilityReason, LootAward, LootBan,
};
pub use report::{Candidate, PriorityReport, ReportRow};
pub use repository::{
    AttendanceSource, AwardLedger, BanSource, GuildConfigProvider, RepositoryError,
};
pub use scores::{ScoreRangeError, ScoreValue};
pub use scoring::{
    MechanicalInputs, PreparationInputs, ScoreBreakdown, ScoringEngine, ScoringInputs,
    UpgradeInputs,
};
pub use service::{LootPriorityService, LootServiceError};
