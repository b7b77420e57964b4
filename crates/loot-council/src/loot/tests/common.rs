use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::attendance::{AttendanceRecord, DateRange};
use crate::domain::{AwardId, GuildId, ItemId, RaidId, RaiderId, Role};
use crate::loot::eligibility::{LootAward, LootBan};
use crate::loot::repository::{
    AttendanceSource, AwardLedger, BanSource, GuildConfigProvider, RepositoryError,
};
use crate::loot::scoring::{MechanicalInputs, PreparationInputs, UpgradeInputs};
use crate::loot::{Candidate, GuildScoringConfig, LootPriorityService};

pub(super) fn guild() -> GuildId {
    GuildId("blackrock-raiders".to_string())
}

pub(super) fn item() -> ItemId {
    ItemId("Thunderfury".to_string())
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 16, 21, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn candidate(name: &str, role: Role, gain: f64) -> Candidate {
    Candidate {
        raider: RaiderId(name.to_string()),
        role,
        mechanical: MechanicalInputs {
            deaths_per_attempt: 0.4,
            spec_avg_deaths_per_attempt: 0.5,
            avoidable_damage_pct: 3.0,
            spec_avg_avoidable_damage_pct: 4.0,
        },
        preparation: PreparationInputs {
            vault_slots_filled: 3,
            crest_usage_ratio: 0.8,
            heroic_kills: 6,
        },
        upgrade: UpgradeInputs {
            simulated_gain: gain,
            spec_baseline: 1000.0,
        },
        tier_pieces_owned: 2,
    }
}

/// Weekly raids over the lookback window, attending all but `missed`.
pub(super) fn weekly_records(raider: &str, raids: u32, missed: u32) -> Vec<AttendanceRecord> {
    (0..raids)
        .map(|week| AttendanceRecord {
            raider: RaiderId(raider.to_string()),
            guild: guild(),
            raid: RaidId(Uuid::from_u128(week as u128 + 1)),
            date: now().date_naive() - Duration::weeks(week as i64),
            attended: week >= missed,
            encounters_total: 8,
            encounters_selected: if week >= missed { 8 } else { 0 },
        })
        .collect()
}

#[derive(Default)]
pub(super) struct MemoryConfigs {
    configs: Mutex<HashMap<GuildId, GuildScoringConfig>>,
}

impl MemoryConfigs {
    pub(super) fn with(guild: GuildId, config: GuildScoringConfig) -> Self {
        let store = Self::default();
        store
            .configs
            .lock()
            .expect("config mutex poisoned")
            .insert(guild, config);
        store
    }
}

impl GuildConfigProvider for MemoryConfigs {
    fn load_config(&self, guild: &GuildId) -> Result<Option<GuildScoringConfig>, RepositoryError> {
        Ok(self
            .configs
            .lock()
            .expect("config mutex poisoned")
            .get(guild)
            .copied())
    }
}

#[derive(Default)]
pub(super) struct MemoryAttendance {
    records: Mutex<Vec<AttendanceRecord>>,
}

impl MemoryAttendance {
    pub(super) fn add(&self, records: Vec<AttendanceRecord>) {
        self.records
            .lock()
            .expect("attendance mutex poisoned")
            .extend(records);
    }
}

impl AttendanceSource for MemoryAttendance {
    fn find_attendance_records(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
        range: DateRange,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("attendance mutex poisoned")
            .iter()
            .filter(|record| {
                &record.raider == raider && &record.guild == guild && range.contains(record.date)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryBans {
    bans: Mutex<Vec<LootBan>>,
}

impl MemoryBans {
    pub(super) fn add(&self, ban: LootBan) {
        self.bans.lock().expect("ban mutex poisoned").push(ban);
    }
}

impl BanSource for MemoryBans {
    fn find_active_bans(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
    ) -> Result<Vec<LootBan>, RepositoryError> {
        Ok(self
            .bans
            .lock()
            .expect("ban mutex poisoned")
            .iter()
            .filter(|ban| &ban.raider == raider && &ban.guild == guild && !ban.lifted)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryAwards {
    awards: Mutex<HashMap<AwardId, LootAward>>,
}

impl AwardLedger for MemoryAwards {
    fn find_awards(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
    ) -> Result<Vec<LootAward>, RepositoryError> {
        Ok(self
            .awards
            .lock()
            .expect("award mutex poisoned")
            .values()
            .filter(|award| &award.raider == raider && &award.guild == guild)
            .cloned()
            .collect())
    }

    fn fetch_award(&self, id: &AwardId) -> Result<Option<LootAward>, RepositoryError> {
        Ok(self.awards.lock().expect("award mutex poisoned").get(id).cloned())
    }

    fn save_award(&self, award: LootAward) -> Result<LootAward, RepositoryError> {
        self.awards
            .lock()
            .expect("award mutex poisoned")
            .insert(award.id, award.clone());
        Ok(award)
    }
}

pub(super) struct Fixture {
    pub(super) attendance: Arc<MemoryAttendance>,
    pub(super) bans: Arc<MemoryBans>,
    pub(super) awards: Arc<MemoryAwards>,
    pub(super) service:
        LootPriorityService<MemoryConfigs, MemoryAttendance, MemoryBans, MemoryAwards>,
}

pub(super) fn fixture(config: GuildScoringConfig) -> Fixture {
    let configs = Arc::new(MemoryConfigs::with(guild(), config));
    let attendance = Arc::new(MemoryAttendance::default());
    let bans = Arc::new(MemoryBans::default());
    let awards = Arc::new(MemoryAwards::default());
    let service =
        LootPriorityService::new(configs, attendance.clone(), bans.clone(), awards.clone());
    Fixture {
        attendance,
        bans,
        awards,
        service,
    }
}
