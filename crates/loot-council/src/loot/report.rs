use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::eligibility::Eligibility;
use super::scoring::{MechanicalInputs, PreparationInputs, ScoreBreakdown, UpgradeInputs};
use crate::domain::{GuildId, ItemId, RaiderId, Role};

/// Item-specific inputs for one raider contending for a drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub raider: RaiderId,
    pub role: Role,
    pub mechanical: MechanicalInputs,
    pub preparation: PreparationInputs,
    pub upgrade: UpgradeInputs,
    pub tier_pieces_owned: u32,
}

/// One ranked line of a priority report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub rank: usize,
    pub raider: RaiderId,
    pub role: Role,
    pub breakdown: ScoreBreakdown,
    pub eligibility: Eligibility,
}

impl ReportRow {
    pub fn final_priority(&self) -> f64 {
        self.breakdown.final_priority.value()
    }
}

/// Ranked, eligibility-annotated priority list for a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityReport {
    pub guild: GuildId,
    pub item: ItemId,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

impl PriorityReport {
    /// Sort scored rows by descending final priority; ties keep input order.
    pub fn rank(
        guild: GuildId,
        item: ItemId,
        generated_at: DateTime<Utc>,
        scored: Vec<(Candidate, ScoreBreakdown, Eligibility)>,
    ) -> Self {
        let mut scored = scored;
        scored.sort_by(|(_, a, _), (_, b, _)| {
            b.final_priority
                .value()
                .partial_cmp(&a.final_priority.value())
                .unwrap_or(Ordering::Equal)
        });

        let rows = scored
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, breakdown, eligibility))| ReportRow {
                rank: index + 1,
                raider: candidate.raider,
                role: candidate.role,
                breakdown,
                eligibility,
            })
            .collect();

        Self {
            guild,
            item,
            generated_at,
            rows,
        }
    }

    pub fn eligible_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.eligibility.is_eligible())
    }

    /// Highest-ranked eligible raider, if any.
    pub fn winner(&self) -> Option<&ReportRow> {
        self.eligible_rows().next()
    }

    pub fn row_for(&self, raider: &RaiderId) -> Option<&ReportRow> {
        self.rows.iter().find(|row| &row.raider == raider)
    }
}
