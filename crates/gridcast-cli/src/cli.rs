//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};

use gridcast_core::period::MAX_WEEK;

/// gridcast - salary-cap football lineup optimizer.
#[derive(Parser, Debug)]
#[command(name = "gridcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the best lineup for each configured scoring blend
    Optimize(OptimizeArgs),

    /// Show the normalized candidate pool for a week
    Projections(ProjectionsArgs),
}

/// Contest period selection. Defaults to the latest stored week of the
/// current season.
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Season year
    #[arg(long)]
    pub year: Option<i32>,

    /// Regular-season week (1-18)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WEEK)))]
    pub week: Option<u32>,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Force this defense into the lineup (team name or part of it)
    #[arg(long, value_name = "TEAM")]
    pub dst: Option<String>,

    /// Roster exactly one tight end (no TE in the flex)
    #[arg(long)]
    pub one_te: bool,

    /// Remove a player from consideration (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Force a player into the lineup (repeatable, applied in order)
    #[arg(long, value_name = "NAME")]
    pub lock: Vec<String>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProjectionsArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Only show one position (QB, RB, WR, TE, DST)
    #[arg(long, value_name = "POS")]
    pub position: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
