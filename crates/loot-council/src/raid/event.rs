//! The raid aggregate. Every command returns a new value and leaves the receiver untouched, so a
//! snapshot taken before a command can be compared with the one produced after it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    Encounter, EncounterDraft, RaidError, RaidPlan, RaidStatus, Signup, SignupStatus,
};
use crate::attendance::AttendanceRecord;
use crate::domain::{EncounterId, GuildId, IdGenerator, RaidId, RaiderId, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRaidEvent")]
pub struct RaidEvent {
    id: RaidId,
    guild: GuildId,
    plan: RaidPlan,
    status: RaidStatus,
    encounters: Vec<Encounter>,
    signups: Vec<Signup>,
}

#[derive(Deserialize)]
struct RawRaidEvent {
    id: RaidId,
    guild: GuildId,
    plan: RaidPlan,
    status: RaidStatus,
    #[serde(default)]
    encounters: Vec<Encounter>,
    #[serde(default)]
    signups: Vec<Signup>,
}

/// Stored snapshots go through the same roster rules the commands enforce.
impl TryFrom<RawRaidEvent> for RaidEvent {
    type Error = RaidError;

    fn try_from(raw: RawRaidEvent) -> Result<Self, Self::Error> {
        for (index, signup) in raw.signups.iter().enumerate() {
            if raw.signups[..index]
                .iter()
                .any(|earlier| earlier.raider == signup.raider)
            {
                return Err(RaidError::DuplicateSignup(signup.raider.clone()));
            }
        }
        if matches!(raw.status, RaidStatus::InProgress | RaidStatus::Completed)
            && raw.signups.is_empty()
        {
            return Err(RaidError::NoSignups);
        }

        Ok(Self {
            id: raw.id,
            guild: raw.guild,
            plan: raw.plan,
            status: raw.status,
            encounters: raw.encounters,
            signups: raw.signups,
        })
    }
}

impl RaidEvent {
    /// Create a new raid in `Scheduled` with an empty roster.
    pub fn schedule(ids: &dyn IdGenerator, guild: GuildId, plan: RaidPlan) -> Self {
        Self {
            id: RaidId(ids.next_uuid()),
            guild,
            plan,
            status: RaidStatus::Scheduled,
            encounters: Vec::new(),
            signups: Vec::new(),
        }
    }

    pub fn id(&self) -> RaidId {
        self.id
    }

    pub fn guild(&self) -> &GuildId {
        &self.guild
    }

    pub fn plan(&self) -> &RaidPlan {
        &self.plan
    }

    pub fn date(&self) -> NaiveDate {
        self.plan.date
    }

    pub fn status(&self) -> RaidStatus {
        self.status
    }

    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    pub fn signups(&self) -> &[Signup] {
        &self.signups
    }

    pub fn signup_for(&self, raider: &RaiderId) -> Option<&Signup> {
        self.signups.iter().find(|signup| &signup.raider == raider)
    }

    fn require(&self, action: &'static str, allowed: &[RaidStatus]) -> Result<(), RaidError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(RaidError::InvalidState {
                action,
                status: self.status,
            })
        }
    }

    fn signup_index(&self, raider: &RaiderId) -> Result<usize, RaidError> {
        self.signups
            .iter()
            .position(|signup| &signup.raider == raider)
            .ok_or_else(|| RaidError::SignupNotFound(raider.clone()))
    }

    pub fn add_encounter(
        &self,
        ids: &dyn IdGenerator,
        draft: EncounterDraft,
    ) -> Result<Self, RaidError> {
        self.require("add an encounter to", &[RaidStatus::Scheduled])?;
        let mut next = self.clone();
        next.encounters.push(Encounter {
            id: EncounterId(ids.next_uuid()),
            external_ref: draft.external_ref,
            name: draft.name,
            enabled: draft.enabled,
            extra: draft.extra,
            notes: draft.notes,
        });
        Ok(next)
    }

    pub fn remove_encounter(&self, encounter: EncounterId) -> Result<Self, RaidError> {
        self.require("remove an encounter from", &[RaidStatus::Scheduled])?;
        if !self.encounters.iter().any(|existing| existing.id == encounter) {
            return Err(RaidError::EncounterNotFound(encounter));
        }
        let mut next = self.clone();
        next.encounters.retain(|existing| existing.id != encounter);
        Ok(next)
    }

    /// New signups start `Confirmed` and unselected.
    pub fn add_signup(
        &self,
        raider: RaiderId,
        role: Role,
        comment: Option<String>,
    ) -> Result<Self, RaidError> {
        self.require("sign up for", &[RaidStatus::Scheduled])?;
        if self.signup_for(&raider).is_some() {
            return Err(RaidError::DuplicateSignup(raider));
        }
        let mut next = self.clone();
        next.signups.push(Signup {
            raider,
            role,
            status: SignupStatus::Confirmed,
            comment,
            selected: false,
        });
        Ok(next)
    }

    pub fn remove_signup(&self, raider: &RaiderId) -> Result<Self, RaidError> {
        self.require("withdraw a signup from", &[RaidStatus::Scheduled])?;
        let index = self.signup_index(raider)?;
        let mut next = self.clone();
        next.signups.remove(index);
        Ok(next)
    }

    /// Status changes keep the `selected` flag as-is.
    pub fn update_signup_status(
        &self,
        raider: &RaiderId,
        status: SignupStatus,
    ) -> Result<Self, RaidError> {
        self.require(
            "update a signup on",
            &[RaidStatus::Scheduled, RaidStatus::InProgress],
        )?;
        let index = self.signup_index(raider)?;
        let mut next = self.clone();
        next.signups[index].status = status;
        Ok(next)
    }

    pub fn select_signup(&self, raider: &RaiderId, selected: bool) -> Result<Self, RaidError> {
        self.require(
            "select a signup on",
            &[RaidStatus::Scheduled, RaidStatus::InProgress],
        )?;
        let index = self.signup_index(raider)?;
        let signup = &self.signups[index];
        if selected && signup.status != SignupStatus::Confirmed {
            return Err(RaidError::SignupNotConfirmed {
                raider: signup.raider.clone(),
                status: signup.status,
            });
        }
        let mut next = self.clone();
        next.signups[index].selected = selected;
        Ok(next)
    }

    pub fn start(&self) -> Result<Self, RaidError> {
        self.require("start", &[RaidStatus::Scheduled])?;
        if self.signups.is_empty() {
            return Err(RaidError::NoSignups);
        }
        Ok(self.with_status(RaidStatus::InProgress))
    }

    pub fn complete(&self) -> Result<Self, RaidError> {
        self.require("complete", &[RaidStatus::InProgress])?;
        Ok(self.with_status(RaidStatus::Completed))
    }

    pub fn cancel(&self) -> Result<Self, RaidError> {
        self.require("cancel", &[RaidStatus::Scheduled])?;
        Ok(self.with_status(RaidStatus::Cancelled))
    }

    fn with_status(&self, status: RaidStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Attendance facts for a completed raid; empty for any other status.
    pub fn attendance_records(&self) -> Vec<AttendanceRecord> {
        if self.status != RaidStatus::Completed {
            return Vec::new();
        }

        let enabled = self
            .encounters
            .iter()
            .filter(|encounter| encounter.enabled)
            .count() as u32;

        self.signups
            .iter()
            .map(|signup| {
                let attended = signup.selected
                    && matches!(signup.status, SignupStatus::Confirmed | SignupStatus::Late);
                AttendanceRecord {
                    raider: signup.raider.clone(),
                    guild: self.guild.clone(),
                    raid: self.id,
                    date: self.plan.date,
                    attended,
                    encounters_total: enabled,
                    encounters_selected: if attended { enabled } else { 0 },
                }
            })
            .collect()
    }
}
