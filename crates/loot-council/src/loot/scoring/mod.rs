pub mod rules;

pub use rules::{MechanicalInputs, PreparationInputs, UpgradeInputs};

use serde::{Deserialize, Serialize};

use super::config::GuildScoringConfig;
use super::scores::{
    AttendanceScore, FinalPriorityScore, ItemPriorityIndex, MechanicalScore, MeritScore,
    PreparationScore, RecencyDecayFactor, RoleMultiplierScore, TierBonusScore, UpgradeValueScore,
};
use crate::domain::Role;

/// Raw, already-aggregated inputs for one (raider, item) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringInputs {
    /// Attended fraction of events in the lookback window, `0.0..=1.0`.
    pub attendance: f64,
    pub role: Role,
    pub mechanical: MechanicalInputs,
    pub preparation: PreparationInputs,
    pub upgrade: UpgradeInputs,
    pub tier_pieces_owned: u32,
    pub weeks_since_award: Option<f64>,
}

/// Named factor of a breakdown, used for audit trails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Attendance,
    Mechanical,
    Preparation,
    Merit,
    UpgradeValue,
    TierBonus,
    RoleMultiplier,
    ItemPriority,
    RecencyDecay,
    FinalPriority,
}

/// Discrete contribution to a priority score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub value: f64,
    pub notes: String,
}

/// Every intermediate score behind one final priority value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub attendance: AttendanceScore,
    pub mechanical: MechanicalScore,
    pub preparation: PreparationScore,
    pub merit: MeritScore,
    pub upgrade_value: UpgradeValueScore,
    pub tier_bonus: TierBonusScore,
    pub role_multiplier: RoleMultiplierScore,
    pub item_priority: ItemPriorityIndex,
    pub recency_decay: RecencyDecayFactor,
    pub final_priority: FinalPriorityScore,
    pub components: Vec<ScoreComponent>,
}

/// Stateless evaluator that applies a guild's weights to scoring inputs.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: GuildScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: GuildScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuildScoringConfig {
        &self.config
    }

    pub fn score(&self, inputs: &ScoringInputs) -> ScoreBreakdown {
        let attendance = rules::attendance_commitment(inputs.attendance);
        let mechanical = rules::mechanical_adherence(&inputs.mechanical);
        let preparation = rules::external_preparation(&inputs.preparation);
        let merit = rules::merit(
            attendance,
            mechanical,
            preparation,
            &self.config.merit_weights,
        );

        let upgrade_value = rules::upgrade_value(&inputs.upgrade);
        let tier_bonus = rules::tier_bonus(inputs.tier_pieces_owned);
        let role_multiplier = rules::role_multiplier(inputs.role);
        let item_priority = rules::item_priority(
            upgrade_value,
            tier_bonus,
            role_multiplier,
            &self.config.priority_weights,
        );

        let recency_decay = rules::recency_decay(inputs.weeks_since_award, &self.config.recency);
        let final_priority = rules::final_priority(merit, item_priority, recency_decay);

        let components = vec![
            ScoreComponent {
                factor: ScoreFactor::Attendance,
                value: attendance.value(),
                notes: format!("attended {:.0}% of raids", inputs.attendance * 100.0),
            },
            ScoreComponent {
                factor: ScoreFactor::Mechanical,
                value: mechanical.value(),
                notes: if mechanical.is_zero() {
                    "mechanics exceed 1.5x spec average".to_string()
                } else {
                    format!(
                        "{:.2} deaths/attempt vs spec {:.2}",
                        inputs.mechanical.deaths_per_attempt,
                        inputs.mechanical.spec_avg_deaths_per_attempt
                    )
                },
            },
            ScoreComponent {
                factor: ScoreFactor::Preparation,
                value: preparation.value(),
                notes: format!(
                    "{} vault slot(s), {} heroic kill(s)",
                    inputs.preparation.vault_slots_filled, inputs.preparation.heroic_kills
                ),
            },
            ScoreComponent {
                factor: ScoreFactor::Merit,
                value: merit.value(),
                notes: "weighted attendance, mechanics, preparation".to_string(),
            },
            ScoreComponent {
                factor: ScoreFactor::UpgradeValue,
                value: upgrade_value.value(),
                notes: format!(
                    "sim gain {:.1} over baseline {:.1}",
                    inputs.upgrade.simulated_gain, inputs.upgrade.spec_baseline
                ),
            },
            ScoreComponent {
                factor: ScoreFactor::TierBonus,
                value: tier_bonus.value(),
                notes: format!("{} tier piece(s) owned", inputs.tier_pieces_owned),
            },
            ScoreComponent {
                factor: ScoreFactor::RoleMultiplier,
                value: role_multiplier.value(),
                notes: inputs.role.label().to_string(),
            },
            ScoreComponent {
                factor: ScoreFactor::ItemPriority,
                value: item_priority.value(),
                notes: "weighted upgrade, tier, role".to_string(),
            },
            ScoreComponent {
                factor: ScoreFactor::RecencyDecay,
                value: recency_decay.value(),
                notes: match inputs.weeks_since_award {
                    Some(weeks) => format!("last award {weeks:.1} week(s) ago"),
                    None => "no award history".to_string(),
                },
            },
            ScoreComponent {
                factor: ScoreFactor::FinalPriority,
                value: final_priority.value(),
                notes: "merit x item priority x recency".to_string(),
            },
        ];

        ScoreBreakdown {
            attendance,
            mechanical,
            preparation,
            merit,
            upgrade_value,
            tier_bonus,
            role_multiplier,
            item_priority,
            recency_decay,
            final_priority,
            components,
        }
    }
}
