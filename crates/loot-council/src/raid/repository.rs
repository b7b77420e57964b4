use chrono::NaiveDate;

use super::event::RaidEvent;
use crate::domain::{GuildId, RaidId};
use crate::loot::repository::RepositoryError;

/// Event persistence with replace-on-save semantics.
pub trait RaidRepository: Send + Sync {
    fn find_by_id(&self, id: &RaidId) -> Result<Option<RaidEvent>, RepositoryError>;
    fn save(&self, event: RaidEvent) -> Result<RaidEvent, RepositoryError>;
    fn find_by_guild_and_date(
        &self,
        guild: &GuildId,
        date: NaiveDate,
    ) -> Result<Vec<RaidEvent>, RepositoryError>;
}
