// gridcast entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout stays machine-readable)
// 3. Load config (copying defaults on first run)
// 4. Resolve the contest period and load its candidate pool
// 5. Run the requested command

mod cli;
mod output;

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::{info, warn};

use gridcast_core::candidate::{Candidate, CandidateRow};
use gridcast_core::config::{self, Config};
use gridcast_core::period::Period;
use gridcast_core::pool::{CandidatePool, ProjectionDir};
use gridcast_core::position::Position;
use gridcast_optimizer::session::optimize_blends_parallel;
use gridcast_optimizer::{Optimizer, SelectionRequest};

use cli::{Cli, Commands, OptimizeArgs, PeriodArgs, ProjectionsArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: contest={}, {} slots, {} salary cap",
        config.contest.name,
        config.contest.total_slots,
        output::format_salary(config.contest.salary_cap)
    );

    // 4-5. Resolve period, load pool, run command
    match cli.command {
        Commands::Optimize(args) => run_optimize(&config, args).await,
        Commands::Projections(args) => run_projections(&config, args),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run_optimize(config: &Config, args: OptimizeArgs) -> anyhow::Result<()> {
    let (period, rows) = load_rows(config, &args.period)?;

    let request = SelectionRequest {
        locked_defense: args.dst,
        locked_players: args.lock,
        excluded_players: args.exclude,
        scoring_blend: None,
        one_te: args.one_te,
    };

    let optimizer = Arc::new(Optimizer::from_config(config));
    let template = *optimizer.template();
    let blends = &config.scoring.blends;
    info!("Optimizing {} for {} blend(s)", period, blends.len());

    let outcomes =
        optimize_blends_parallel(Arc::clone(&optimizer), Arc::from(rows), &request, blends).await;

    // Warnings are usually identical across blends; report each once.
    let mut reported: Vec<String> = Vec::new();
    for roster in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
        for w in &roster.warnings {
            let text = w.to_string();
            if !reported.contains(&text) {
                warn!("{}", text);
                reported.push(text);
            }
        }
    }

    if args.json {
        println!(
            "{}",
            output::outcomes_json(period, &outcomes, &template)
                .context("failed to serialize rosters")?
        );
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(roster) => output::print_roster(period, &outcome.blend, roster, &template),
                Err(e) => output::error(&format!("{}: {e}", outcome.blend)),
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} blend(s) produced no lineup", outcomes.len());
    }
    Ok(())
}

fn run_projections(config: &Config, args: ProjectionsArgs) -> anyhow::Result<()> {
    let position = match args.position.as_deref() {
        Some(p) => Some(
            Position::from_str_pos(p).ok_or_else(|| anyhow!("unknown position '{p}'"))?,
        ),
        None => None,
    };

    let (period, rows) = load_rows(config, &args.period)?;
    let pool = Optimizer::from_config(config).normalize(&rows, &SelectionRequest::new());
    for w in &pool.warnings {
        warn!("{}", w);
    }
    info!(
        "{} candidates, {} removed by grade filter",
        pool.candidates.len(),
        pool.filtered_by_grade
    );

    let mut shown: Vec<&Candidate> = pool
        .candidates
        .iter()
        .filter(|c| position.map_or(true, |p| c.position == p))
        .collect();
    shown.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then(b.projected_points.total_cmp(&a.projected_points))
    });

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&shown).context("failed to serialize pool")?
        );
    } else {
        output::print_pool(period, &shown);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the requested period and load its stored candidate table.
fn load_rows(config: &Config, args: &PeriodArgs) -> anyhow::Result<(Period, Vec<CandidateRow>)> {
    let dir = ProjectionDir::new(&config.data.projections_dir);
    let year = args.year.unwrap_or_else(Period::current_year);

    let week = match args.week {
        Some(week) => week,
        None => {
            dir.latest_period(year)
                .with_context(|| format!("failed to scan {}", dir.path().display()))?
                .ok_or_else(|| {
                    anyhow!(
                        "no projection files for {year} in {}",
                        dir.path().display()
                    )
                })?
                .week
        }
    };
    let period = Period::new(year, week);

    let rows = dir
        .candidates(period)
        .with_context(|| format!("failed to load candidate pool for {period}"))?;
    info!("Loaded {} candidate rows for {}", rows.len(), period);
    Ok((period, rows))
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridcast=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
