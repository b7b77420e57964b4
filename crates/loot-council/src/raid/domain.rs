use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EncounterId, RaidId, RaiderId, Role};

/// Lifecycle of a raid event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaidStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl RaidStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStatus {
    Confirmed,
    Tentative,
    Declined,
    Late,
}

impl SignupStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Tentative => "Tentative",
            Self::Declined => "Declined",
            Self::Late => "Late",
        }
    }
}

/// Boss encounter planned for a raid night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    /// Identifier in the external encounter catalogue.
    pub external_ref: String,
    pub name: String,
    pub enabled: bool,
    pub extra: bool,
    pub notes: Option<String>,
}

/// Caller-supplied encounter fields; identity is minted by the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDraft {
    pub external_ref: String,
    pub name: String,
    pub enabled: bool,
    pub extra: bool,
    pub notes: Option<String>,
}

/// A raider's intent to attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    pub raider: RaiderId,
    pub role: Role,
    pub status: SignupStatus,
    pub comment: Option<String>,
    pub selected: bool,
}

/// Scheduling details captured when a raid is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidPlan {
    pub date: NaiveDate,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub instance: Option<String>,
    pub difficulty: Option<String>,
    /// Loot-council run flag; `None` when the organiser left it unset.
    pub loot_council: Option<bool>,
    pub notes: Option<String>,
}

impl RaidPlan {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: None,
            end_time: None,
            instance: None,
            difficulty: None,
            loot_council: None,
            notes: None,
        }
    }
}

/// Invalid operations against the raid aggregate and its scheduling policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaidError {
    #[error("cannot {action} a raid that is {}", .status.label())]
    InvalidState {
        action: &'static str,
        status: RaidStatus,
    },
    #[error("raid needs at least one signup to start")]
    NoSignups,
    #[error("{0} is already signed up")]
    DuplicateSignup(RaiderId),
    #[error("no signup for {0}")]
    SignupNotFound(RaiderId),
    #[error("encounter {0} not found")]
    EncounterNotFound(EncounterId),
    #[error("only confirmed signups can be selected ({raider} is {})", .status.label())]
    SignupNotConfirmed {
        raider: RaiderId,
        status: SignupStatus,
    },
    #[error("cannot schedule a raid in the past ({date})")]
    DateInPast { date: NaiveDate },
    #[error("raid {existing} is already scheduled on {date}")]
    DateConflict { date: NaiveDate, existing: RaidId },
}
