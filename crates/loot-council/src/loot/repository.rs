use super::config::GuildScoringConfig;
use super::eligibility::{LootAward, LootBan};
use crate::attendance::{AttendanceRecord, DateRange};
use crate::domain::{AwardId, GuildId, RaiderId};

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read-only, externally persisted guild configuration.
pub trait GuildConfigProvider: Send + Sync {
    fn load_config(&self, guild: &GuildId) -> Result<Option<GuildScoringConfig>, RepositoryError>;
}

pub trait AttendanceSource: Send + Sync {
    fn find_attendance_records(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
        range: DateRange,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError>;
}

/// Administrative ban registry.
pub trait BanSource: Send + Sync {
    fn find_active_bans(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
    ) -> Result<Vec<LootBan>, RepositoryError>;
}

/// Award history used for recency decay and revocation.
pub trait AwardLedger: Send + Sync {
    fn find_awards(&self, raider: &RaiderId, guild: &GuildId)
        -> Result<Vec<LootAward>, RepositoryError>;
    fn fetch_award(&self, id: &AwardId) -> Result<Option<LootAward>, RepositoryError>;
    fn save_award(&self, award: LootAward) -> Result<LootAward, RepositoryError>;
}
