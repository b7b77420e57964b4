use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::eligibility::{self, EligibilityError, EligibilityPolicy, LootAward};
use super::report::{Candidate, PriorityReport};
use super::repository::{
    AttendanceSource, AwardLedger, BanSource, GuildConfigProvider, RepositoryError,
};
use super::scoring::{ScoringEngine, ScoringInputs};
use crate::attendance::{AttendanceStats, DateRange};
use crate::domain::{AwardId, GuildId, ItemId, RaiderId};

/// Service composing guild configuration, attendance, bans, and award history into reports.
pub struct LootPriorityService<C, A, B, L> {
    configs: Arc<C>,
    attendance: Arc<A>,
    bans: Arc<B>,
    awards: Arc<L>,
}

impl<C, A, B, L> LootPriorityService<C, A, B, L>
where
    C: GuildConfigProvider + 'static,
    A: AttendanceSource + 'static,
    B: BanSource + 'static,
    L: AwardLedger + 'static,
{
    pub fn new(configs: Arc<C>, attendance: Arc<A>, bans: Arc<B>, awards: Arc<L>) -> Self {
        Self {
            configs,
            attendance,
            bans,
            awards,
        }
    }

    /// Score every candidate for `item` and return the ranked, eligibility-annotated report.
    pub fn priority_report(
        &self,
        guild: &GuildId,
        item: &ItemId,
        candidates: Vec<Candidate>,
        as_of: DateTime<Utc>,
    ) -> Result<PriorityReport, LootServiceError> {
        let config = self
            .configs
            .load_config(guild)?
            .ok_or_else(|| LootServiceError::ConfigNotFound(guild.clone()))?;
        let engine = ScoringEngine::new(config);
        let policy = EligibilityPolicy::new(config.thresholds);
        let window =
            DateRange::trailing_weeks(as_of.date_naive(), config.thresholds.lookback_weeks());

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let records = self
                .attendance
                .find_attendance_records(&candidate.raider, guild, window)?;
            let stats = AttendanceStats::from_records(&records);

            let awards = self.awards.find_awards(&candidate.raider, guild)?;
            let weeks_since_award =
                last_active_award(&awards).map(|award| award.weeks_since(as_of));

            let inputs = ScoringInputs {
                attendance: stats.percentage(),
                role: candidate.role,
                mechanical: candidate.mechanical,
                preparation: candidate.preparation,
                upgrade: candidate.upgrade,
                tier_pieces_owned: candidate.tier_pieces_owned,
                weeks_since_award,
            };
            let breakdown = engine.score(&inputs);

            let bans = self.bans.find_active_bans(&candidate.raider, guild)?;
            let eligibility = policy.evaluate(
                &candidate.raider,
                breakdown.attendance,
                breakdown.mechanical,
                &bans,
                as_of,
            );

            debug!(
                raider = %candidate.raider,
                attendance = stats.percentage(),
                final_priority = breakdown.final_priority.value(),
                eligible = eligibility.is_eligible(),
                "scored loot candidate"
            );
            scored.push((candidate, breakdown, eligibility));
        }

        let report = PriorityReport::rank(guild.clone(), item.clone(), as_of, scored);
        info!(
            %guild,
            %item,
            candidates = report.rows.len(),
            winner = report.winner().map(|row| row.raider.0.as_str()).unwrap_or("none"),
            "loot priority report generated"
        );
        Ok(report)
    }

    /// Whether a raider's recent awards warrant recomputing decay before ranking.
    pub fn recency_decay_due(
        &self,
        raider: &RaiderId,
        guild: &GuildId,
        now: DateTime<Utc>,
    ) -> Result<bool, LootServiceError> {
        let config = self
            .configs
            .load_config(guild)?
            .ok_or_else(|| LootServiceError::ConfigNotFound(guild.clone()))?;
        let awards = self.awards.find_awards(raider, guild)?;
        Ok(eligibility::should_apply_recency_decay(
            &awards,
            config.thresholds.recency_threshold_days(),
            now,
        ))
    }

    /// Revoke an award inside the guild's revocation window.
    pub fn revoke_award(
        &self,
        award_id: &AwardId,
        now: DateTime<Utc>,
    ) -> Result<LootAward, LootServiceError> {
        let award = self
            .awards
            .fetch_award(award_id)?
            .ok_or(LootServiceError::AwardNotFound(*award_id))?;
        let config = self
            .configs
            .load_config(&award.guild)?
            .ok_or_else(|| LootServiceError::ConfigNotFound(award.guild.clone()))?;
        let max_days = config.thresholds.max_revocation_days();

        if award.is_active() && award.awarded_at > now {
            warn!(award = %award.id, "award is dated after the revocation time");
            return Err(EligibilityError::AwardNotYetGranted(award.id).into());
        }
        if award.is_active() && !eligibility::can_revoke_award(&award, max_days, now) {
            warn!(award = %award.id, max_days, "award outside revocation window");
            return Err(EligibilityError::RevocationWindowElapsed {
                award: award.id,
                max_days,
            }
            .into());
        }

        let revoked = award.revoke(now)?;
        let stored = self.awards.save_award(revoked)?;
        info!(award = %stored.id, raider = %stored.raider, "loot award revoked");
        Ok(stored)
    }
}

fn last_active_award(awards: &[LootAward]) -> Option<&LootAward> {
    awards
        .iter()
        .filter(|award| award.is_active())
        .max_by_key(|award| award.awarded_at)
}

/// Error raised by the loot priority service.
#[derive(Debug, thiserror::Error)]
pub enum LootServiceError {
    #[error("no scoring configuration for guild {0}")]
    ConfigNotFound(GuildId),
    #[error("award {0} not found")]
    AwardNotFound(AwardId),
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
