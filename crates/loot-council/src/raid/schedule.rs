use chrono::NaiveDate;

use super::domain::RaidError;
use super::event::RaidEvent;
use crate::domain::GuildId;

/// Consulted before a raid is constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingPolicy;

impl SchedulingPolicy {
    /// Past dates never schedule; a live raid for the same guild on the date blocks, finished or
    /// cancelled ones do not.
    pub fn validate(
        &self,
        guild: &GuildId,
        date: NaiveDate,
        today: NaiveDate,
        existing: &[RaidEvent],
    ) -> Result<(), RaidError> {
        if date < today {
            return Err(RaidError::DateInPast { date });
        }

        if let Some(conflict) = existing.iter().find(|event| {
            event.guild() == guild && event.date() == date && !event.status().is_terminal()
        }) {
            return Err(RaidError::DateConflict {
                date,
                existing: conflict.id(),
            });
        }

        Ok(())
    }
}
