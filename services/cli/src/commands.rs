use crate::infra::{parse_date, start_of_day, RosterStores, StaticGuildConfig};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use loot_council::config::AppConfig;
use loot_council::domain::{GuildId, ItemId, RandomIds};
use loot_council::error::AppError;
use loot_council::import::CandidateImporter;
use loot_council::loot::{GuildScoringConfig, LootPriorityService, PriorityReport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Guild the roster belongs to
    #[arg(long)]
    pub(crate) guild: String,
    /// Item being distributed
    #[arg(long)]
    pub(crate) item: String,
    /// Roster CSV export with one row per candidate
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Guild scoring config (JSON). Falls back to LOOT_GUILD_CONFIG, then built-in defaults.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print a plain-text table instead of JSON
    #[arg(long)]
    pub(crate) table: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CheckConfigArgs {
    /// Guild scoring config (JSON). Falls back to LOOT_GUILD_CONFIG.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

pub(crate) fn run_report(args: ReportArgs, app: &AppConfig) -> Result<(), AppError> {
    let ReportArgs {
        guild,
        item,
        candidates,
        config,
        as_of,
        table,
    } = args;

    let guild = GuildId(guild);
    let item = ItemId(item);
    let as_of: DateTime<Utc> = as_of.map(start_of_day).unwrap_or_else(Utc::now);
    let scoring = match config.or_else(|| app.guild_config.clone()) {
        Some(path) => GuildScoringConfig::from_path(path)?,
        None => GuildScoringConfig::default(),
    };

    let rows = CandidateImporter::from_path(&candidates)?;
    info!(path = %candidates.display(), rows = rows.len(), "roster export imported");

    let stores = RosterStores::hydrate(&RandomIds, &guild, &rows, as_of);
    let service = LootPriorityService::new(
        Arc::new(StaticGuildConfig::new(guild.clone(), scoring)),
        Arc::new(stores.attendance),
        Arc::new(stores.bans),
        Arc::new(stores.awards),
    );
    let report = service.priority_report(
        &guild,
        &item,
        rows.into_iter().map(|row| row.candidate).collect(),
        as_of,
    )?;

    if table {
        render_table(&report);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

pub(crate) fn run_check_config(args: CheckConfigArgs, app: &AppConfig) -> Result<(), AppError> {
    let config = match args.config.or_else(|| app.guild_config.clone()) {
        Some(path) => {
            let config = GuildScoringConfig::from_path(&path)?;
            info!(path = %path.display(), "guild config is valid");
            config
        }
        None => {
            info!("no guild config given; showing built-in defaults");
            GuildScoringConfig::default()
        }
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn render_table(report: &PriorityReport) {
    println!(
        "Loot priority for {} ({}) as of {}",
        report.item,
        report.guild,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "{:>4}  {:<20} {:<7} {:>6} {:>6} {:>6} {:>6}  status",
        "rank", "raider", "role", "merit", "item", "decay", "final"
    );
    for row in &report.rows {
        let breakdown = &row.breakdown;
        println!(
            "{:>4}  {:<20} {:<7} {:>6.3} {:>6.3} {:>6.3} {:>6.3}  {}",
            row.rank,
            row.raider.0,
            row.role.label(),
            breakdown.merit.value(),
            breakdown.item_priority.value(),
            breakdown.recency_decay.value(),
            breakdown.final_priority.value(),
            row.eligibility.summary()
        );
    }
    match report.winner() {
        Some(winner) => println!("Recommended: {}", winner.raider),
        None => println!("Recommended: nobody is eligible"),
    }
}
