use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

use super::{attendance_from_counts, ImportedCandidate};
use crate::domain::{RaiderId, Role};
use crate::loot::{Candidate, MechanicalInputs, PreparationInputs, UpgradeInputs};

/// Ban column value: either a permanent ban or one lapsing at the start of the given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BanExpiry {
    Permanent,
    Until(NaiveDate),
}

/// Upper bound on exported events per row; exports cover a season, not a lifetime.
pub const MAX_EXPORTED_EVENTS: i64 = 1_000;

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    raider: String,
    role: String,
    attended_events: i64,
    total_events: i64,
    deaths_per_attempt: f64,
    spec_avg_deaths_per_attempt: f64,
    avoidable_damage_pct: f64,
    spec_avg_avoidable_damage_pct: f64,
    vault_slots: u32,
    crest_usage_ratio: f64,
    heroic_kills: u32,
    simulated_gain: f64,
    spec_baseline: f64,
    tier_pieces: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_award: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    banned_until: Option<String>,
}

impl RosterRow {
    pub(crate) fn into_candidate(self) -> Result<ImportedCandidate, String> {
        if self.raider.is_empty() {
            return Err("raider name is empty".to_string());
        }
        let role =
            Role::parse(&self.role).ok_or_else(|| format!("unknown role `{}`", self.role))?;
        if self.total_events > MAX_EXPORTED_EVENTS {
            return Err(format!(
                "total_events {} exceeds the limit of {MAX_EXPORTED_EVENTS}",
                self.total_events
            ));
        }
        let attendance = attendance_from_counts(self.attended_events, self.total_events)?;
        let last_award = self
            .last_award
            .as_deref()
            .map(|value| parse_date(value).ok_or_else(|| format!("invalid last_award `{value}`")))
            .transpose()?;
        let ban = self
            .banned_until
            .as_deref()
            .map(|value| parse_ban(value).ok_or_else(|| format!("invalid banned_until `{value}`")))
            .transpose()?;

        Ok(ImportedCandidate {
            candidate: Candidate {
                raider: RaiderId(self.raider),
                role,
                mechanical: MechanicalInputs {
                    deaths_per_attempt: self.deaths_per_attempt,
                    spec_avg_deaths_per_attempt: self.spec_avg_deaths_per_attempt,
                    avoidable_damage_pct: self.avoidable_damage_pct,
                    spec_avg_avoidable_damage_pct: self.spec_avg_avoidable_damage_pct,
                },
                preparation: PreparationInputs {
                    vault_slots_filled: self.vault_slots,
                    crest_usage_ratio: self.crest_usage_ratio,
                    heroic_kills: self.heroic_kills,
                },
                upgrade: UpgradeInputs {
                    simulated_gain: self.simulated_gain,
                    spec_baseline: self.spec_baseline,
                },
                tier_pieces_owned: self.tier_pieces,
            },
            attendance,
            last_award,
            ban,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_ban(value: &str) -> Option<BanExpiry> {
    if value.trim().eq_ignore_ascii_case("permanent") {
        return Some(BanExpiry::Permanent);
    }
    parse_date(value).map(BanExpiry::Until)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
