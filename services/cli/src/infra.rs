use chrono::{DateTime, NaiveDate, Utc};
use loot_council::attendance::{AttendanceRecord, DateRange};
use loot_council::domain::{AwardId, GuildId, IdGenerator, ItemId, RaidId, RaiderId};
use loot_council::import::{BanExpiry, ImportedCandidate};
use loot_council::loot::{
    AttendanceSource, AwardLedger, BanSource, GuildConfigProvider, GuildScoringConfig, LootAward,
    LootBan, RepositoryError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const IMPORTED_BAN_REASON: &str = "recorded in roster export";

/// Guild config source backed by a single loaded document.
#[derive(Clone)]
pub(crate) struct StaticGuildConfig {
    guild: GuildId,
    config: GuildScoringConfig,
}

impl StaticGuildConfig {
    pub(crate) fn new(guild: GuildId, config: GuildScoringConfig) -> Self {
        Self { guild, config }
    }
}

impl GuildConfigProvider for StaticGuildConfig {
    fn load_config(&self, guild: &GuildId) -> Result<Option<GuildScoringConfig>, RepositoryError> {
        Ok((guild == &self.guild).then_some(self.config))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAttendance {
    records: Arc<Mutex<Vec<AttendanceRecord>>>,
}

impl AttendanceSource for InMemoryAttendance {
    fn find_attendance_records(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
        range: DateRange,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("attendance mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| {
                &record.raider == raider && &record.guild == guild && range.contains(record.date)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBans {
    bans: Arc<Mutex<Vec<LootBan>>>,
}

impl BanSource for InMemoryBans {
    fn find_active_bans(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
    ) -> Result<Vec<LootBan>, RepositoryError> {
        let guard = self.bans.lock().expect("ban mutex poisoned");
        Ok(guard
            .iter()
            .filter(|ban| &ban.raider == raider && &ban.guild == guild && !ban.lifted)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAwards {
    awards: Arc<Mutex<HashMap<AwardId, LootAward>>>,
}

impl AwardLedger for InMemoryAwards {
    fn find_awards(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
    ) -> Result<Vec<LootAward>, RepositoryError> {
        let guard = self.awards.lock().expect("award mutex poisoned");
        Ok(guard
            .values()
            .filter(|award| &award.raider == raider && &award.guild == guild)
            .cloned()
            .collect())
    }

    fn fetch_award(&self, id: &AwardId) -> Result<Option<LootAward>, RepositoryError> {
        let guard = self.awards.lock().expect("award mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_award(&self, award: LootAward) -> Result<LootAward, RepositoryError> {
        let mut guard = self.awards.lock().expect("award mutex poisoned");
        guard.insert(award.id, award.clone());
        Ok(award)
    }
}

/// In-memory collaborators hydrated from a roster export.
pub(crate) struct RosterStores {
    pub(crate) attendance: InMemoryAttendance,
    pub(crate) bans: InMemoryBans,
    pub(crate) awards: InMemoryAwards,
}

impl RosterStores {
    /// Exported attendance counts are expanded into one record per event, all dated on
    /// `as_of` so they fall inside any lookback window.
    pub(crate) fn hydrate(
        ids: &dyn IdGenerator,
        guild: &GuildId,
        rows: &[ImportedCandidate],
        as_of: DateTime<Utc>,
    ) -> Self {
        let stores = Self {
            attendance: InMemoryAttendance::default(),
            bans: InMemoryBans::default(),
            awards: InMemoryAwards::default(),
        };
        let today = as_of.date_naive();

        for row in rows {
            let raider = row.raider().clone();
            let attended = row.attendance.attended_events();
            {
                let mut records = stores
                    .attendance
                    .records
                    .lock()
                    .expect("attendance mutex poisoned");
                records.extend((0..row.attendance.total_events()).map(|index| AttendanceRecord {
                    raider: raider.clone(),
                    guild: guild.clone(),
                    raid: RaidId(ids.next_uuid()),
                    date: today,
                    attended: index < attended,
                    encounters_total: 0,
                    encounters_selected: 0,
                }));
            }

            if let Some(ban) = row.ban {
                let expires_at = match ban {
                    BanExpiry::Permanent => None,
                    BanExpiry::Until(date) => Some(start_of_day(date)),
                };
                let ban = LootBan::issue(
                    ids,
                    raider.clone(),
                    guild.clone(),
                    IMPORTED_BAN_REASON,
                    as_of,
                    expires_at,
                );
                stores.bans.bans.lock().expect("ban mutex poisoned").push(ban);
            }

            if let Some(date) = row.last_award {
                let award = LootAward::grant(
                    ids,
                    raider.clone(),
                    guild.clone(),
                    ItemId("unrecorded".to_string()),
                    start_of_day(date),
                );
                stores
                    .awards
                    .awards
                    .lock()
                    .expect("award mutex poisoned")
                    .insert(award.id, award);
            }
        }

        stores
    }
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
