use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::config::EligibilityThresholds;
use super::scores::{AttendanceScore, MechanicalScore};
use crate::domain::{AwardId, BanId, GuildId, IdGenerator, ItemId, RaiderId};

/// Administrative loot ban. Activity is evaluated at query time, never by expiry in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootBan {
    pub id: BanId,
    pub raider: RaiderId,
    pub guild: GuildId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// `None` marks a permanent ban.
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lifted: bool,
}

impl LootBan {
    pub fn issue(
        ids: &dyn IdGenerator,
        raider: RaiderId,
        guild: GuildId,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: BanId(ids.next_uuid()),
            raider,
            guild,
            reason: reason.into(),
            created_at,
            expires_at,
            lifted: false,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }

    pub fn is_active_at(&self, as_of: DateTime<Utc>) -> bool {
        !self.lifted && self.expires_at.map_or(true, |expires| expires > as_of)
    }

    pub fn lift(&self) -> Self {
        Self {
            lifted: true,
            ..self.clone()
        }
    }
}

/// Item handed to a raider; revocation is recorded rather than deleting the award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootAward {
    pub id: AwardId,
    pub raider: RaiderId,
    pub guild: GuildId,
    pub item: ItemId,
    pub awarded_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl LootAward {
    pub fn grant(
        ids: &dyn IdGenerator,
        raider: RaiderId,
        guild: GuildId,
        item: ItemId,
        awarded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AwardId(ids.next_uuid()),
            raider,
            guild,
            item,
            awarded_at,
            revoked_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    pub fn revoke(&self, now: DateTime<Utc>) -> Result<Self, EligibilityError> {
        if !self.is_active() {
            return Err(EligibilityError::AwardAlreadyRevoked(self.id));
        }
        Ok(Self {
            revoked_at: Some(now),
            ..self.clone()
        })
    }

    /// Fractional weeks elapsed between the award and `as_of`, floored at zero.
    pub fn weeks_since(&self, as_of: DateTime<Utc>) -> f64 {
        let seconds = (as_of - self.awarded_at).num_seconds().max(0);
        seconds as f64 / Duration::weeks(1).num_seconds() as f64
    }
}

/// Invalid operations against bans and awards.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EligibilityError {
    #[error("award {0} has already been revoked")]
    AwardAlreadyRevoked(AwardId),
    #[error("award {award} is older than the {max_days} day revocation window")]
    RevocationWindowElapsed { award: AwardId, max_days: u32 },
    #[error("award {0} is dated in the future and cannot be revoked yet")]
    AwardNotYetGranted(AwardId),
}

/// True when no ban matching the raider is active at `as_of`.
pub fn is_eligible(raider: &RaiderId, bans: &[LootBan], as_of: DateTime<Utc>) -> bool {
    !bans
        .iter()
        .any(|ban| &ban.raider == raider && ban.is_active_at(as_of))
}

/// True when any active award falls within `threshold_days` before `now`.
pub fn should_apply_recency_decay(
    recent_awards: &[LootAward],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> bool {
    let window = Duration::days(threshold_days as i64);
    recent_awards
        .iter()
        .filter(|award| award.is_active())
        .any(|award| award.awarded_at <= now && now - award.awarded_at <= window)
}

pub fn can_revoke_award(award: &LootAward, max_revocation_days: u32, now: DateTime<Utc>) -> bool {
    award.is_active()
        && award.awarded_at <= now
        && now - award.awarded_at <= Duration::days(i64::from(max_revocation_days))
}

/// Why a raider was marked ineligible on a report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityReason {
    ActiveBan {
        reason: String,
        expires_at: Option<DateTime<Utc>>,
    },
    AttendanceBelowThreshold {
        score: f64,
        threshold: f64,
    },
    InactiveMechanics {
        score: f64,
        threshold: f64,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::ActiveBan { reason, expires_at } => match expires_at {
                Some(expires) => format!(
                    "loot banned until {}: {reason}",
                    expires.format("%Y-%m-%d")
                ),
                None => format!("permanently loot banned: {reason}"),
            },
            IneligibilityReason::AttendanceBelowThreshold { score, threshold } => format!(
                "attendance score {score:.2} below required {threshold:.2}"
            ),
            IneligibilityReason::InactiveMechanics { score, threshold } => format!(
                "mechanical score {score:.2} at or below activity threshold {threshold:.2}"
            ),
        }
    }
}

/// Advisory eligibility annotation. Never alters the underlying score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Ineligible { reasons: Vec<IneligibilityReason> },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            Eligibility::Eligible => "eligible".to_string(),
            Eligibility::Ineligible { reasons } => {
                let details: Vec<String> =
                    reasons.iter().map(IneligibilityReason::summary).collect();
                format!("ineligible: {}", details.join("; "))
            }
        }
    }
}

/// Guild policy combining bans with the attendance and activity gates.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    thresholds: EligibilityThresholds,
}

impl EligibilityPolicy {
    pub fn new(thresholds: EligibilityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EligibilityThresholds {
        &self.thresholds
    }

    pub fn evaluate(
        &self,
        raider: &RaiderId,
        attendance: AttendanceScore,
        mechanical: MechanicalScore,
        bans: &[LootBan],
        as_of: DateTime<Utc>,
    ) -> Eligibility {
        let mut reasons: Vec<IneligibilityReason> = bans
            .iter()
            .filter(|ban| &ban.raider == raider && ban.is_active_at(as_of))
            .map(|ban| IneligibilityReason::ActiveBan {
                reason: ban.reason.clone(),
                expires_at: ban.expires_at,
            })
            .collect();

        if attendance.value() < self.thresholds.attendance_threshold() {
            reasons.push(IneligibilityReason::AttendanceBelowThreshold {
                score: attendance.value(),
                threshold: self.thresholds.attendance_threshold(),
            });
        }

        if mechanical.value() <= self.thresholds.activity_threshold() {
            reasons.push(IneligibilityReason::InactiveMechanics {
                score: mechanical.value(),
                threshold: self.thresholds.activity_threshold(),
            });
        }

        if reasons.is_empty() {
            Eligibility::Eligible
        } else {
            Eligibility::Ineligible { reasons }
        }
    }
}
