use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use loot_council::attendance::{AttendanceRecord, AttendanceStats, DateRange};
use loot_council::domain::{AwardId, GuildId, ItemId, RaidId, RaiderId, Role, SequentialIds};
use loot_council::loot::{
    AttendanceSource, AwardLedger, BanSource, Candidate, Eligibility, GuildConfigProvider,
    GuildScoringConfig, IneligibilityReason, LootAward, LootBan, LootPriorityService,
    MechanicalInputs, PreparationInputs, RepositoryError, UpgradeInputs,
};
use loot_council::raid::{
    EncounterDraft, RaidEvent, RaidPlan, RaidRepository, RaidService, RaidStatus,
};

#[derive(Default)]
struct Raids {
    events: Mutex<HashMap<RaidId, RaidEvent>>,
}

impl RaidRepository for Raids {
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

struct Configs(GuildScoringConfig);

impl GuildConfigProvider for Configs {
    fn load_config(&self, _guild: &GuildId) -> Result<Option<GuildScoringConfig>, RepositoryError> {
        Ok(Some(self.0))
    }
}

#[derive(Default)]
struct Attendance {
    records: Mutex<Vec<AttendanceRecord>>,
}

impl AttendanceSource for Attendance {
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

struct NoBans;

impl BanSource for NoBans {
    fn find_active_bans(
        &self,
        _raider: &RaiderId,
        _guild: &GuildId,
    ) -> Result<Vec<LootBan>, RepositoryError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct Awards {
    awards: Mutex<HashMap<AwardId, LootAward>>,
}

impl AwardLedger for Awards {
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

fn guild() -> GuildId {
    GuildId("echo".to_string())
}

fn raider(name: &str) -> RaiderId {
    RaiderId(name.to_string())
}

fn first_raid() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn report_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 24, 21, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn candidate(name: &str, role: Role) -> Candidate {
    Candidate {
        raider: raider(name),
        role,
        mechanical: MechanicalInputs {
            deaths_per_attempt: 0.5,
            spec_avg_deaths_per_attempt: 0.5,
            avoidable_damage_pct: 4.0,
            spec_avg_avoidable_damage_pct: 4.0,
        },
        preparation: PreparationInputs {
            vault_slots_filled: 3,
            crest_usage_ratio: 1.0,
            heroic_kills: 6,
        },
        upgrade: UpgradeInputs {
            simulated_gain: 800.0,
            spec_baseline: 1000.0,
        },
        tier_pieces_owned: 4,
    }
}

/// Runs four weekly raids; `Dorki` sits out the last one.
fn run_season(service: &RaidService<Raids, SequentialIds>) -> Vec<AttendanceRecord> {
    let today = first_raid() - Duration::days(1);
    let mut records = Vec::new();

    for week in 0..4 {
        let plan = RaidPlan {
            loot_council: Some(true),
            ..RaidPlan::on(first_raid() + Duration::weeks(week))
        };
        let id = service
            .schedule(guild(), plan, today)
            .expect("raid scheduled")
            .id();
        service
            .add_encounter(
                &id,
                EncounterDraft {
                    external_ref: "ulgrax".to_string(),
                    name: "Ulgrax the Devourer".to_string(),
                    enabled: true,
                    extra: false,
                    notes: None,
                },
            )
            .expect("encounter added");
        for (name, role) in [("Dorki", Role::Tank), ("Ellesmere", Role::Healer)] {
            service
                .add_signup(&id, raider(name), role, None)
                .expect("signup added");
        }
        service
            .select_signup(&id, &raider("Ellesmere"), true)
            .expect("selection succeeds");
        if week < 3 {
            service
                .select_signup(&id, &raider("Dorki"), true)
                .expect("selection succeeds");
        }
        service.start(&id).expect("raid starts");
        let completed = service.complete(&id).expect("raid completes");
        assert_eq!(completed.status(), RaidStatus::Completed);

        records.extend(service.attendance_records(&id).expect("attendance facts"));
    }

    records
}

#[test]
fn completed_raids_drive_attendance_eligibility() {
    let raids = RaidService::new(
        Arc::new(Raids::default()),
        Arc::new(SequentialIds::starting_at(100)),
    );
    let records = run_season(&raids);
    assert_eq!(records.len(), 8);

    let dorki: Vec<_> = records
        .iter()
        .filter(|record| record.raider == raider("Dorki"))
        .cloned()
        .collect();
    let stats = AttendanceStats::from_records(&dorki);
    assert_eq!(stats.total_events(), 4);
    assert_eq!(stats.attended_events(), 3);
    assert_eq!(stats.percentage(), 0.75);

    let attendance = Arc::new(Attendance::default());
    attendance
        .records
        .lock()
        .expect("attendance mutex poisoned")
        .extend(records);
    let loot = LootPriorityService::new(
        Arc::new(Configs(GuildScoringConfig::default())),
        attendance,
        Arc::new(NoBans),
        Arc::new(Awards::default()),
    );

    let report = loot
        .priority_report(
            &guild(),
            &ItemId("Ovinax's Mercurial Egg".to_string()),
            vec![candidate("Dorki", Role::Tank), candidate("Ellesmere", Role::Healer)],
            report_time(),
        )
        .expect("report builds");

    let winner = report.winner().expect("one eligible raider");
    assert_eq!(winner.raider, raider("Ellesmere"));
    assert_eq!(winner.rank, 1);

    let dorki_row = report.row_for(&raider("Dorki")).expect("dorki row kept");
    assert!(dorki_row.breakdown.attendance.is_zero());
    assert!(dorki_row.breakdown.merit.value() < winner.breakdown.merit.value());
    match &dorki_row.eligibility {
        Eligibility::Ineligible { reasons } => {
            assert!(reasons.iter().any(|reason| matches!(
                reason,
                IneligibilityReason::AttendanceBelowThreshold { .. }
            )));
        }
        other => panic!("expected ineligible row, got {other:?}"),
    }
}
