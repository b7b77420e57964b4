use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::composition::RosterComposition;
use super::domain::{EncounterDraft, RaidError, RaidPlan, SignupStatus};
use super::event::RaidEvent;
use super::repository::RaidRepository;
use super::schedule::SchedulingPolicy;
use crate::attendance::AttendanceRecord;
use crate::domain::{EncounterId, GuildId, IdGenerator, RaidId, RaiderId, Role};
use crate::loot::repository::RepositoryError;

/// Loads a raid, applies one command, and saves the resulting snapshot.
pub struct RaidService<R, I> {
    repository: Arc<R>,
    ids: Arc<I>,
    policy: SchedulingPolicy,
}

impl<R, I> RaidService<R, I>
where
    R: RaidRepository + 'static,
    I: IdGenerator + 'static,
{
    pub fn new(repository: Arc<R>, ids: Arc<I>) -> Self {
        Self {
            repository,
            ids,
            policy: SchedulingPolicy,
        }
    }

    pub fn schedule(
        &self,
        guild: GuildId,
        plan: RaidPlan,
        today: NaiveDate,
    ) -> Result<RaidEvent, RaidServiceError> {
        let existing = self.repository.find_by_guild_and_date(&guild, plan.date)?;
        if let Err(err) = self.policy.validate(&guild, plan.date, today, &existing) {
            warn!(%guild, date = %plan.date, error = %err, "raid scheduling rejected");
            return Err(err.into());
        }

        let event = RaidEvent::schedule(self.ids.as_ref(), guild, plan);
        let saved = self.repository.save(event)?;
        info!(raid = %saved.id(), guild = %saved.guild(), date = %saved.date(), "raid scheduled");
        Ok(saved)
    }

    pub fn get(&self, id: &RaidId) -> Result<RaidEvent, RaidServiceError> {
        self.repository
            .find_by_id(id)?
            .ok_or(RaidServiceError::NotFound(*id))
    }

    /// Like [`RaidService::get`], but another guild's raid reads as not found.
    pub fn get_for_guild(
        &self,
        guild: &GuildId,
        id: &RaidId,
    ) -> Result<RaidEvent, RaidServiceError> {
        let event = self.get(id)?;
        if event.guild() != guild {
            warn!(%guild, raid = %id, owner = %event.guild(), "cross-guild raid lookup refused");
            return Err(RaidServiceError::NotFound(*id));
        }
        Ok(event)
    }

    fn apply<F>(
        &self,
        id: &RaidId,
        action: &'static str,
        command: F,
    ) -> Result<RaidEvent, RaidServiceError>
    where
        F: FnOnce(&RaidEvent) -> Result<RaidEvent, RaidError>,
    {
        let current = self.get(id)?;
        let next = match command(&current) {
            Ok(next) => next,
            Err(err) => {
                warn!(raid = %id, action, error = %err, "raid command rejected");
                return Err(err.into());
            }
        };
        let saved = self.repository.save(next)?;
        if saved.status() != current.status() {
            info!(raid = %id, status = saved.status().label(), "raid status changed");
        }
        Ok(saved)
    }

    pub fn add_encounter(
        &self,
        id: &RaidId,
        draft: EncounterDraft,
    ) -> Result<RaidEvent, RaidServiceError> {
        let ids = self.ids.clone();
        self.apply(id, "add_encounter", move |event| {
            event.add_encounter(ids.as_ref(), draft)
        })
    }

    pub fn remove_encounter(
        &self,
        id: &RaidId,
        encounter: EncounterId,
    ) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "remove_encounter", |event| event.remove_encounter(encounter))
    }

    pub fn add_signup(
        &self,
        id: &RaidId,
        raider: RaiderId,
        role: Role,
        comment: Option<String>,
    ) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "add_signup", |event| event.add_signup(raider, role, comment))
    }

    pub fn remove_signup(
        &self,
        id: &RaidId,
        raider: &RaiderId,
    ) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "remove_signup", |event| event.remove_signup(raider))
    }

    pub fn update_signup_status(
        &self,
        id: &RaidId,
        raider: &RaiderId,
        status: SignupStatus,
    ) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "update_signup_status", |event| {
            event.update_signup_status(raider, status)
        })
    }

    pub fn select_signup(
        &self,
        id: &RaidId,
        raider: &RaiderId,
        selected: bool,
    ) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "select_signup", |event| event.select_signup(raider, selected))
    }

    pub fn start(&self, id: &RaidId) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "start", RaidEvent::start)
    }

    pub fn complete(&self, id: &RaidId) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "complete", RaidEvent::complete)
    }

    pub fn cancel(&self, id: &RaidId) -> Result<RaidEvent, RaidServiceError> {
        self.apply(id, "cancel", RaidEvent::cancel)
    }

    pub fn composition(&self, id: &RaidId) -> Result<RosterComposition, RaidServiceError> {
        let event = self.get(id)?;
        Ok(RosterComposition::analyze(event.signups()))
    }

    pub fn attendance_records(
        &self,
        id: &RaidId,
    ) -> Result<Vec<AttendanceRecord>, RaidServiceError> {
        Ok(self.get(id)?.attendance_records())
    }
}

/// Error raised by the raid service.
#[derive(Debug, thiserror::Error)]
pub enum RaidServiceError {
    #[error("raid {0} not found")]
    NotFound(RaidId),
    #[error(transparent)]
    Raid(#[from] RaidError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
