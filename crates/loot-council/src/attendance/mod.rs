//! Attendance facts and their aggregation into the statistics consumed by scoring.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{GuildId, RaidId, RaiderId};

/// One raider's participation in one completed raid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub raider: RaiderId,
    pub guild: GuildId,
    pub raid: RaidId,
    pub date: NaiveDate,
    pub attended: bool,
    pub encounters_total: u32,
    pub encounters_selected: u32,
}

/// Inclusive calendar window for attendance lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The `weeks` weeks ending on `end`, saturating at the earliest representable date.
    pub fn trailing_weeks(end: NaiveDate, weeks: u32) -> Self {
        let start = end
            .checked_sub_signed(Duration::weeks(i64::from(weeks)))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceError {
    #[error("{field} must be non-negative (found {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} exceeds {max} (found {value})")]
    TooLarge {
        field: &'static str,
        value: i64,
        max: u32,
    },
    #[error("attended {attended} exceeds total {total}")]
    AttendedExceedsTotal { attended: i64, total: i64 },
    #[error("selected encounters {selected} exceed total encounters {total}")]
    SelectedExceedsTotal { selected: i64, total: i64 },
}

/// Aggregated participation counts. Immutable; combine to roll up periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawAttendanceStats")]
pub struct AttendanceStats {
    total_events: u32,
    attended_events: u32,
    total_encounters: u32,
    selected_encounters: u32,
}

#[derive(Deserialize)]
struct RawAttendanceStats {
    total_events: i64,
    attended_events: i64,
    #[serde(default)]
    total_encounters: i64,
    #[serde(default)]
    selected_encounters: i64,
}

impl TryFrom<RawAttendanceStats> for AttendanceStats {
    type Error = AttendanceError;

    fn try_from(raw: RawAttendanceStats) -> Result<Self, Self::Error> {
        Self::new(
            raw.total_events,
            raw.attended_events,
            raw.total_encounters,
            raw.selected_encounters,
        )
    }
}

fn count(field: &'static str, value: i64) -> Result<u32, AttendanceError> {
    if value < 0 {
        return Err(AttendanceError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| AttendanceError::TooLarge {
        field,
        value,
        max: u32::MAX,
    })
}

impl AttendanceStats {
    /// Event-only statistics with no encounter detail.
    pub fn calculate(attended: i64, total: i64) -> Result<Self, AttendanceError> {
        Self::new(total, attended, 0, 0)
    }

    pub fn new(
        total_events: i64,
        attended_events: i64,
        total_encounters: i64,
        selected_encounters: i64,
    ) -> Result<Self, AttendanceError> {
        let total = count("total_events", total_events)?;
        let attended = count("attended_events", attended_events)?;
        let encounters = count("total_encounters", total_encounters)?;
        let selected = count("selected_encounters", selected_encounters)?;

        if attended_events > total_events {
            return Err(AttendanceError::AttendedExceedsTotal {
                attended: attended_events,
                total: total_events,
            });
        }
        if selected_encounters > total_encounters {
            return Err(AttendanceError::SelectedExceedsTotal {
                selected: selected_encounters,
                total: total_encounters,
            });
        }

        Ok(Self {
            total_events: total,
            attended_events: attended,
            total_encounters: encounters,
            selected_encounters: selected,
        })
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        records.into_iter().fold(Self::default(), |stats, record| {
            let selected = record.encounters_selected.min(record.encounters_total);
            stats.combine(&Self {
                total_events: 1,
                attended_events: u32::from(record.attended),
                total_encounters: record.encounters_total,
                selected_encounters: selected,
            })
        })
    }

    pub fn total_events(&self) -> u32 {
        self.total_events
    }

    pub fn attended_events(&self) -> u32 {
        self.attended_events
    }

    pub fn total_encounters(&self) -> u32 {
        self.total_encounters
    }

    pub fn selected_encounters(&self) -> u32 {
        self.selected_encounters
    }

    /// Attended fraction; an empty history is `0.0`.
    pub fn percentage(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            self.attended_events as f64 / self.total_events as f64
        }
    }

    pub fn encounter_percentage(&self) -> f64 {
        if self.total_encounters == 0 {
            0.0
        } else {
            self.selected_encounters as f64 / self.total_encounters as f64
        }
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self {
            total_events: self.total_events.saturating_add(other.total_events),
            attended_events: self.attended_events.saturating_add(other.attended_events),
            total_encounters: self.total_encounters.saturating_add(other.total_encounters),
            selected_encounters: self
                .selected_encounters
                .saturating_add(other.selected_encounters),
        }
    }
}
