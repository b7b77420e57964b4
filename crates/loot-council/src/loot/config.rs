use std::io::Read;

use serde::{Deserialize, Serialize};

/// Rejected guild scoring configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightConfigError {
    #[error("weight `{name}` must be non-negative (found {value})")]
    NegativeWeight { name: &'static str, value: f64 },
    #[error("weight `{name}` must be finite")]
    NonFiniteWeight { name: &'static str },
    #[error("{set} weights must sum to a positive value")]
    ZeroWeightSum { set: &'static str },
    #[error("invalid recency parameters: {0}")]
    InvalidRecency(String),
    #[error("invalid eligibility threshold: {0}")]
    InvalidThreshold(String),
}

fn check_weight(name: &'static str, value: f64) -> Result<f64, WeightConfigError> {
    if !value.is_finite() {
        return Err(WeightConfigError::NonFiniteWeight { name });
    }
    if value < 0.0 {
        return Err(WeightConfigError::NegativeWeight { name, value });
    }
    Ok(value)
}

/// Weights combining attendance, mechanical, and preparation into the merit score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeritWeights")]
pub struct MeritWeights {
    attendance: f64,
    mechanical: f64,
    preparation: f64,
}

#[derive(Deserialize)]
struct RawMeritWeights {
    attendance: f64,
    mechanical: f64,
    preparation: f64,
}

impl MeritWeights {
    pub fn new(
        attendance: f64,
        mechanical: f64,
        preparation: f64,
    ) -> Result<Self, WeightConfigError> {
        let weights = Self {
            attendance: check_weight("attendance", attendance)?,
            mechanical: check_weight("mechanical", mechanical)?,
            preparation: check_weight("preparation", preparation)?,
        };
        if weights.sum() <= 0.0 {
            return Err(WeightConfigError::ZeroWeightSum { set: "merit" });
        }
        Ok(weights)
    }

    pub fn attendance(&self) -> f64 {
        self.attendance
    }

    pub fn mechanical(&self) -> f64 {
        self.mechanical
    }

    pub fn preparation(&self) -> f64 {
        self.preparation
    }

    pub fn sum(&self) -> f64 {
        self.attendance + self.mechanical + self.preparation
    }
}

impl Default for MeritWeights {
    fn default() -> Self {
        Self {
            attendance: 0.4,
            mechanical: 0.4,
            preparation: 0.2,
        }
    }
}

impl TryFrom<RawMeritWeights> for MeritWeights {
    type Error = WeightConfigError;

    fn try_from(raw: RawMeritWeights) -> Result<Self, Self::Error> {
        Self::new(raw.attendance, raw.mechanical, raw.preparation)
    }
}

/// Weights combining upgrade value, tier bonus, and role multiplier into the item-priority index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriorityWeights")]
pub struct PriorityWeights {
    upgrade_value: f64,
    tier_bonus: f64,
    role_multiplier: f64,
}

#[derive(Deserialize)]
struct RawPriorityWeights {
    upgrade_value: f64,
    tier_bonus: f64,
    role_multiplier: f64,
}

impl PriorityWeights {
    pub fn new(
        upgrade_value: f64,
        tier_bonus: f64,
        role_multiplier: f64,
    ) -> Result<Self, WeightConfigError> {
        let weights = Self {
            upgrade_value: check_weight("upgrade_value", upgrade_value)?,
            tier_bonus: check_weight("tier_bonus", tier_bonus)?,
            role_multiplier: check_weight("role_multiplier", role_multiplier)?,
        };
        if weights.sum() <= 0.0 {
            return Err(WeightConfigError::ZeroWeightSum { set: "priority" });
        }
        Ok(weights)
    }

    pub fn upgrade_value(&self) -> f64 {
        self.upgrade_value
    }

    pub fn tier_bonus(&self) -> f64 {
        self.tier_bonus
    }

    pub fn role_multiplier(&self) -> f64 {
        self.role_multiplier
    }

    pub fn sum(&self) -> f64 {
        self.upgrade_value + self.tier_bonus + self.role_multiplier
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            upgrade_value: 0.5,
            tier_bonus: 0.3,
            role_multiplier: 0.2,
        }
    }
}

impl TryFrom<RawPriorityWeights> for PriorityWeights {
    type Error = WeightConfigError;

    fn try_from(raw: RawPriorityWeights) -> Result<Self, Self::Error> {
        Self::new(raw.upgrade_value, raw.tier_bonus, raw.role_multiplier)
    }
}

/// Suppression applied right after an award and its weekly linear recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecencyParams")]
pub struct RecencyParams {
    base_penalty: f64,
    recovery_rate_per_week: f64,
}

#[derive(Deserialize)]
struct RawRecencyParams {
    base_penalty: f64,
    recovery_rate_per_week: f64,
}

impl RecencyParams {
    pub fn new(base_penalty: f64, recovery_rate_per_week: f64) -> Result<Self, WeightConfigError> {
        if !base_penalty.is_finite() || !(0.0..=1.0).contains(&base_penalty) {
            return Err(WeightConfigError::InvalidRecency(format!(
                "base_penalty {base_penalty} must be within [0, 1]"
            )));
        }
        if !recovery_rate_per_week.is_finite() || recovery_rate_per_week < 0.0 {
            return Err(WeightConfigError::InvalidRecency(format!(
                "recovery_rate_per_week {recovery_rate_per_week} must be non-negative"
            )));
        }
        Ok(Self {
            base_penalty,
            recovery_rate_per_week,
        })
    }

    pub fn base_penalty(&self) -> f64 {
        self.base_penalty
    }

    pub fn recovery_rate_per_week(&self) -> f64 {
        self.recovery_rate_per_week
    }
}

impl Default for RecencyParams {
    fn default() -> Self {
        Self {
            base_penalty: 0.5,
            recovery_rate_per_week: 0.1,
        }
    }
}

impl TryFrom<RawRecencyParams> for RecencyParams {
    type Error = WeightConfigError;

    fn try_from(raw: RawRecencyParams) -> Result<Self, Self::Error> {
        Self::new(raw.base_penalty, raw.recovery_rate_per_week)
    }
}

/// Guild-level gates and windows consulted by the eligibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEligibilityThresholds")]
pub struct EligibilityThresholds {
    attendance_threshold: f64,
    activity_threshold: f64,
    lookback_weeks: u32,
    recency_threshold_days: u32,
    max_revocation_days: u32,
}

#[derive(Deserialize)]
struct RawEligibilityThresholds {
    attendance_threshold: f64,
    activity_threshold: f64,
    #[serde(default = "default_lookback_weeks")]
    lookback_weeks: u32,
    #[serde(default = "default_recency_threshold_days")]
    recency_threshold_days: u32,
    #[serde(default = "default_max_revocation_days")]
    max_revocation_days: u32,
}

const MAX_LOOKBACK_WEEKS: u32 = 520;
const MAX_WINDOW_DAYS: u32 = 3650;

fn default_lookback_weeks() -> u32 {
    8
}

fn default_recency_threshold_days() -> u32 {
    14
}

fn default_max_revocation_days() -> u32 {
    7
}

impl EligibilityThresholds {
    pub fn new(
        attendance_threshold: f64,
        activity_threshold: f64,
    ) -> Result<Self, WeightConfigError> {
        for (name, value) in [
            ("attendance_threshold", attendance_threshold),
            ("activity_threshold", activity_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(WeightConfigError::InvalidThreshold(format!(
                    "{name} {value} must be within [0, 1]"
                )));
            }
        }
        Ok(Self {
            attendance_threshold,
            activity_threshold,
            lookback_weeks: default_lookback_weeks(),
            recency_threshold_days: default_recency_threshold_days(),
            max_revocation_days: default_max_revocation_days(),
        })
    }

    pub fn with_windows(
        self,
        lookback_weeks: u32,
        recency_threshold_days: u32,
        max_revocation_days: u32,
    ) -> Result<Self, WeightConfigError> {
        if lookback_weeks == 0 || lookback_weeks > MAX_LOOKBACK_WEEKS {
            return Err(WeightConfigError::InvalidThreshold(format!(
                "lookback_weeks {lookback_weeks} must be within [1, {MAX_LOOKBACK_WEEKS}]"
            )));
        }
        for (name, days) in [
            ("recency_threshold_days", recency_threshold_days),
            ("max_revocation_days", max_revocation_days),
        ] {
            if days > MAX_WINDOW_DAYS {
                return Err(WeightConfigError::InvalidThreshold(format!(
                    "{name} {days} must not exceed {MAX_WINDOW_DAYS}"
                )));
            }
        }
        Ok(Self {
            lookback_weeks,
            recency_threshold_days,
            max_revocation_days,
            ..self
        })
    }

    pub fn attendance_threshold(&self) -> f64 {
        self.attendance_threshold
    }

    pub fn activity_threshold(&self) -> f64 {
        self.activity_threshold
    }

    pub fn lookback_weeks(&self) -> u32 {
        self.lookback_weeks
    }

    pub fn recency_threshold_days(&self) -> u32 {
        self.recency_threshold_days
    }

    pub fn max_revocation_days(&self) -> u32 {
        self.max_revocation_days
    }
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self {
            attendance_threshold: 0.9,
            activity_threshold: 0.0,
            lookback_weeks: default_lookback_weeks(),
            recency_threshold_days: default_recency_threshold_days(),
            max_revocation_days: default_max_revocation_days(),
        }
    }
}

impl TryFrom<RawEligibilityThresholds> for EligibilityThresholds {
    type Error = WeightConfigError;

    fn try_from(raw: RawEligibilityThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.attendance_threshold, raw.activity_threshold)?.with_windows(
            raw.lookback_weeks,
            raw.recency_threshold_days,
            raw.max_revocation_days,
        )
    }
}

/// Complete per-guild scoring configuration. Replaced wholesale on update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuildScoringConfig {
    #[serde(default)]
    pub merit_weights: MeritWeights,
    #[serde(default)]
    pub priority_weights: PriorityWeights,
    #[serde(default)]
    pub recency: RecencyParams,
    #[serde(default)]
    pub thresholds: EligibilityThresholds,
}

/// Failure reading a guild configuration document.
#[derive(Debug, thiserror::Error)]
pub enum GuildConfigLoadError {
    #[error("failed to read guild config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid guild config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GuildScoringConfig {
    /// Parse and validate a JSON document; malformed weights are rejected here.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, GuildConfigLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, GuildConfigLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }
}
