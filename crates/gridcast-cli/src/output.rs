//! Terminal and JSON rendering of rosters and pools.

use serde::Serialize;
use std::fmt::Display;

use gridcast_core::blend::ScoringBlend;
use gridcast_core::candidate::Candidate;
use gridcast_core::period::Period;
use gridcast_core::roster::RosterTemplate;
use gridcast_optimizer::session::BlendOutcome;
use gridcast_optimizer::{SolvedRoster, Warning};

const RULE_WIDTH: usize = 72;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<16} {value}");
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// `$50,000`
pub fn format_salary(salary: u32) -> String {
    let digits = salary.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

fn blend_title(blend: &ScoringBlend) -> String {
    if blend.is_primary_only() {
        "projection only".to_string()
    } else {
        blend.to_string()
    }
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

/// Print one lineup table with totals. Locked players are marked with `*`.
pub fn print_roster(
    period: Period,
    blend: &ScoringBlend,
    roster: &SolvedRoster,
    template: &RosterTemplate,
) {
    section(&format!("{period} lineup ({})", blend_title(blend)));
    println!(
        "{:<5} {:<26} {:<4} {:<4} {:>9} {:>7}",
        "SLOT", "PLAYER", "TEAM", "OPP", "SALARY", "PROJ"
    );
    for (slot, player) in roster.lineup(template) {
        let marker = if roster.is_locked(&player.name) { "*" } else { "" };
        println!(
            "{:<5} {:<26} {:<4} {:<4} {:>9} {:>7.1}",
            slot.to_string(),
            format!("{}{marker}", player.name),
            player.team,
            player.opponent,
            format_salary(player.salary),
            player.projected_points
        );
    }
    println!();
    key_value(
        "Salary",
        format!(
            "{} of {}",
            format_salary(roster.total_salary()),
            format_salary(template.budget_cap)
        ),
    );
    key_value("Projected", format!("{:.1}", roster.projected_points()));
}

#[derive(Serialize)]
struct LineupEntry<'a> {
    slot: String,
    locked: bool,
    #[serde(flatten)]
    player: &'a Candidate,
}

#[derive(Serialize)]
struct RosterReport<'a> {
    lineup: Vec<LineupEntry<'a>>,
    total_salary: u32,
    projected_points: f64,
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct BlendReport<'a> {
    period: Period,
    blend: ScoringBlend,
    #[serde(skip_serializing_if = "Option::is_none")]
    roster: Option<RosterReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn blend_report<'a>(
    period: Period,
    outcome: &'a BlendOutcome,
    template: &RosterTemplate,
) -> BlendReport<'a> {
    match &outcome.result {
        Ok(roster) => BlendReport {
            period,
            blend: outcome.blend,
            roster: Some(RosterReport {
                lineup: roster
                    .lineup(template)
                    .into_iter()
                    .map(|(slot, player)| LineupEntry {
                        slot: slot.to_string(),
                        locked: roster.is_locked(&player.name),
                        player,
                    })
                    .collect(),
                total_salary: roster.total_salary(),
                projected_points: roster.projected_points(),
                warnings: &roster.warnings,
            }),
            error: None,
        },
        Err(e) => BlendReport {
            period,
            blend: outcome.blend,
            roster: None,
            error: Some(e.to_string()),
        },
    }
}

/// All blend outcomes as a JSON array, one object per blend.
pub fn outcomes_json(
    period: Period,
    outcomes: &[BlendOutcome],
    template: &RosterTemplate,
) -> serde_json::Result<String> {
    let reports: Vec<BlendReport> = outcomes
        .iter()
        .map(|o| blend_report(period, o, template))
        .collect();
    serde_json::to_string_pretty(&reports)
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Print the candidate pool, best projection first within each position.
pub fn print_pool(period: Period, candidates: &[&Candidate]) {
    section(&format!("{period} candidate pool ({} players)", candidates.len()));
    println!(
        "{:<4} {:<26} {:<4} {:<4} {:<3} {:>9} {:>7} {:>7}",
        "POS", "PLAYER", "TEAM", "OPP", "GRD", "SALARY", "PROJ", "AVG"
    );
    for c in candidates {
        println!(
            "{:<4} {:<26} {:<4} {:<4} {:<3} {:>9} {:>7.1} {:>7.1}",
            c.position.display_str(),
            c.name,
            c.team,
            c.opponent,
            c.grade.map(|g| g.as_str()).unwrap_or("-"),
            format_salary(c.salary),
            c.projected_points,
            c.average_points
        );
    }
}
