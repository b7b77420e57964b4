use serde::{Deserialize, Serialize};

use crate::domain::Role;
use crate::loot::config::{MeritWeights, PriorityWeights, RecencyParams};
use crate::loot::scores::{
    AttendanceScore, FinalPriorityScore, ItemPriorityIndex, MechanicalScore, MeritScore,
    PreparationScore, RecencyDecayFactor, RoleMultiplierScore, TierBonusScore, UpgradeValueScore,
};

const FULL_ATTENDANCE: f64 = 1.0;
const COMMITTED_ATTENDANCE: f64 = 0.8;
const COMMITTED_SCORE: f64 = 0.9;

const MECHANICAL_FAILURE_RATIO: f64 = 1.5;
const MECHANICAL_PENALTY_SLOPE: f64 = 0.25;

const VAULT_SLOT_CAP: u32 = 3;
const HEROIC_KILL_CAP: u32 = 6;
const VAULT_WEIGHT: f64 = 0.5;
const CREST_WEIGHT: f64 = 0.3;
const HEROIC_WEIGHT: f64 = 0.2;

/// Deaths and avoidable damage measured against the raider's spec averages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanicalInputs {
    pub deaths_per_attempt: f64,
    pub spec_avg_deaths_per_attempt: f64,
    pub avoidable_damage_pct: f64,
    pub spec_avg_avoidable_damage_pct: f64,
}

/// Out-of-raid preparation signals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreparationInputs {
    pub vault_slots_filled: u32,
    pub crest_usage_ratio: f64,
    pub heroic_kills: u32,
}

/// Simulated gain for the item compared to the spec baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UpgradeInputs {
    pub simulated_gain: f64,
    pub spec_baseline: f64,
}

/// Step function over the attendance fraction in `[0, 1]`.
pub fn attendance_commitment(attendance: f64) -> AttendanceScore {
    if attendance >= FULL_ATTENDANCE {
        AttendanceScore::MAX
    } else if attendance >= COMMITTED_ATTENDANCE {
        AttendanceScore::clamped(COMMITTED_SCORE)
    } else {
        AttendanceScore::MIN
    }
}

fn ratio(value: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        value / baseline
    }
}

/// Mechanics far worse than peers fail outright; milder overshoot is penalised linearly.
pub fn mechanical_adherence(inputs: &MechanicalInputs) -> MechanicalScore {
    let dpa_ratio = ratio(inputs.deaths_per_attempt, inputs.spec_avg_deaths_per_attempt);
    let adt_ratio = ratio(
        inputs.avoidable_damage_pct,
        inputs.spec_avg_avoidable_damage_pct,
    );

    if dpa_ratio > MECHANICAL_FAILURE_RATIO || adt_ratio > MECHANICAL_FAILURE_RATIO {
        return MechanicalScore::MIN;
    }

    let score = 1.0
        - MECHANICAL_PENALTY_SLOPE * (dpa_ratio - 1.0).max(0.0)
        - MECHANICAL_PENALTY_SLOPE * (adt_ratio - 1.0).max(0.0);
    MechanicalScore::clamped(score)
}

pub fn external_preparation(inputs: &PreparationInputs) -> PreparationScore {
    let vault = inputs.vault_slots_filled.min(VAULT_SLOT_CAP) as f64 / VAULT_SLOT_CAP as f64;
    let crest = inputs.crest_usage_ratio.clamp(0.0, 1.0);
    let heroic = inputs.heroic_kills.min(HEROIC_KILL_CAP) as f64 / HEROIC_KILL_CAP as f64;

    PreparationScore::clamped(VAULT_WEIGHT * vault + CREST_WEIGHT * crest + HEROIC_WEIGHT * heroic)
}

pub fn merit(
    attendance: AttendanceScore,
    mechanical: MechanicalScore,
    preparation: PreparationScore,
    weights: &MeritWeights,
) -> MeritScore {
    let weighted = attendance.value() * weights.attendance()
        + mechanical.value() * weights.mechanical()
        + preparation.value() * weights.preparation();
    MeritScore::clamped(weighted / weights.sum())
}

pub fn upgrade_value(inputs: &UpgradeInputs) -> UpgradeValueScore {
    if inputs.spec_baseline <= 0.0 {
        return UpgradeValueScore::MIN;
    }
    UpgradeValueScore::clamped(inputs.simulated_gain / inputs.spec_baseline)
}

/// Incentive shrinks as the raider's tier set nears completion.
pub fn tier_bonus(pieces_owned: u32) -> TierBonusScore {
    let bonus = match pieces_owned {
        0 | 1 => 1.2,
        2 | 3 => 1.1,
        _ => 1.0,
    };
    TierBonusScore::clamped(bonus)
}

pub fn role_multiplier(role: Role) -> RoleMultiplierScore {
    let multiplier = match role {
        Role::Dps => 1.0,
        Role::Tank => 0.8,
        Role::Healer => 0.7,
    };
    RoleMultiplierScore::clamped(multiplier)
}

pub fn item_priority(
    upgrade: UpgradeValueScore,
    tier: TierBonusScore,
    role: RoleMultiplierScore,
    weights: &PriorityWeights,
) -> ItemPriorityIndex {
    let weighted = upgrade.value() * weights.upgrade_value()
        + tier.value() * weights.tier_bonus()
        + role.value() * weights.role_multiplier();
    ItemPriorityIndex::clamped(weighted / weights.sum())
}

/// `None` means no award history, which carries no suppression.
pub fn recency_decay(weeks_since_award: Option<f64>, params: &RecencyParams) -> RecencyDecayFactor {
    let Some(weeks) = weeks_since_award else {
        return RecencyDecayFactor::MAX;
    };
    let weeks = if weeks.is_nan() {
        0.0
    } else {
        weeks.clamp(0.0, f64::MAX)
    };
    let factor = params.base_penalty() + params.recovery_rate_per_week() * weeks;
    RecencyDecayFactor::clamped(factor.min(1.0))
}

pub fn final_priority(
    merit: MeritScore,
    item_priority: ItemPriorityIndex,
    decay: RecencyDecayFactor,
) -> FinalPriorityScore {
    FinalPriorityScore::clamped(merit.value() * item_priority.value() * decay.value())
}
