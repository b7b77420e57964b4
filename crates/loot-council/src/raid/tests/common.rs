use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::domain::{GuildId, RaidId, RaiderId, SequentialIds};
use crate::loot::repository::RepositoryError;
use crate::raid::{EncounterDraft, RaidEvent, RaidPlan, RaidRepository, RaidService};

pub(super) fn guild() -> GuildId {
    GuildId("liquid".to_string())
}

pub(super) fn raid_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 18).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).expect("valid date")
}

pub(super) fn raider(name: &str) -> RaiderId {
    RaiderId(name.to_string())
}

pub(super) fn plan() -> RaidPlan {
    RaidPlan {
        instance: Some("Nerub-ar Palace".to_string()),
        difficulty: Some("Mythic".to_string()),
        loot_council: Some(true),
        ..RaidPlan::on(raid_date())
    }
}

pub(super) fn encounter(name: &str, enabled: bool) -> EncounterDraft {
    EncounterDraft {
        external_ref: name.to_ascii_lowercase().replace(' ', "-"),
        name: name.to_string(),
        enabled,
        extra: false,
        notes: None,
    }
}

pub(super) fn scheduled() -> (SequentialIds, RaidEvent) {
    let ids = SequentialIds::starting_at(1);
    let event = RaidEvent::schedule(&ids, guild(), plan());
    (ids, event)
}

#[derive(Default)]
pub(super) struct MemoryRaidRepository {
    events: Mutex<HashMap<RaidId, RaidEvent>>,
}

impl RaidRepository for MemoryRaidRepository {
    fn find_by_id(&self, id: &RaidId) -> Result<Option<RaidEvent>, RepositoryError> {
        Ok(self.events.lock().expect("raid mutex poisoned").get(id).cloned())
    }

    fn save(&self, event: RaidEvent) -> Result<RaidEvent, RepositoryError> {
        self.events
            .lock()
            .expect("raid mutex poisoned")
            .insert(event.id(), event.clone());
        Ok(event)
    }

    fn find_by_guild_and_date(
        &self,
        guild: &GuildId,
        date: NaiveDate,
    ) -> Result<Vec<RaidEvent>, RepositoryError> {
        Ok(self
            .events
            .lock()
            .expect("raid mutex poisoned")
            .values()
            .filter(|event| event.guild() == guild && event.date() == date)
            .cloned()
            .collect())
    }
}

pub(super) fn service() -> (
    Arc<MemoryRaidRepository>,
    RaidService<MemoryRaidRepository, SequentialIds>,
) {
    let repository = Arc::new(MemoryRaidRepository::default());
    let service = RaidService::new(repository.clone(), Arc::new(SequentialIds::starting_at(1)));
    (repository, service)
}
