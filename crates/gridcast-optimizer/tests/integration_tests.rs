// Integration tests for the roster optimizer.
//
// These tests run the full pipeline against a stored projection file: the
// file-backed pool provider, normalization, pre-processing, the model and the
// microlp solver, and multi-blend sessions.

use std::path::Path;
use std::sync::Arc;

use gridcast_core::blend::ScoringBlend;
use gridcast_core::candidate::{Candidate, CandidateRow};
use gridcast_core::grade::Grade;
use gridcast_core::period::Period;
use gridcast_core::pool::{latest_period, load_pool_for, CandidatePool, ProjectionDir};
use gridcast_core::position::Position;
use gridcast_core::roster::RosterTemplate;
use gridcast_optimizer::lineup::Slot;
use gridcast_optimizer::normalize::{normalize_pool, QualityFilter};
use gridcast_optimizer::preprocess::preprocess;
use gridcast_optimizer::session::{optimize_blends_parallel, DEFAULT_BLENDS};
use gridcast_optimizer::solver::MicrolpSolver;
use gridcast_optimizer::{OptimizeError, Optimizer, SelectionRequest, SolvedRoster, Warning};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const WEEK_5: Period = Period {
    year: 2024,
    week: 5,
};

/// The unconstrained optimum for the fixture week.
const OPTIMAL: [&str; 9] = [
    "Josh Allen",
    "Christian McCaffrey",
    "Kenneth Walker",
    "JaMarr Chase",
    "Amon-Ra St Brown",
    "DK Metcalf",
    "Travis Kelce",
    "Ravens",
    "Jaylen Warren",
];

fn fixture_rows() -> Vec<CandidateRow> {
    load_pool_for(Path::new(FIXTURES), WEEK_5).expect("fixture should load")
}

fn optimize(request: &SelectionRequest) -> Result<SolvedRoster, OptimizeError> {
    Optimizer::default().optimize(&fixture_rows(), request)
}

fn sorted_names(roster: &SolvedRoster) -> Vec<String> {
    let mut names: Vec<String> = roster.players.iter().map(|p| p.name.clone()).collect();
    names.sort();
    names
}

/// Deterministic linear congruential generator for synthetic slates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn between(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo + 1)
    }
}

/// Position, count and salary range (in hundreds) for a synthetic slate.
type SlateShape = [(&'static str, usize, u64, u64); 5];

/// Roughly the size of a real weekly main slate.
const FULL_WEEK: SlateShape = [
    ("QB", 40, 45, 84),
    ("RB", 80, 40, 90),
    ("WR", 120, 30, 92),
    ("TE", 50, 25, 75),
    ("DST", 32, 20, 45),
];

/// Small enough to enumerate every 9-player subset.
const TINY_WEEK: SlateShape = [
    ("QB", 3, 45, 84),
    ("RB", 5, 40, 90),
    ("WR", 6, 30, 92),
    ("TE", 3, 25, 75),
    ("DST", 2, 20, 45),
];

/// Salaries in $100 steps, projections loosely tracking salary with noise and
/// plenty of ties at one decimal.
fn synthetic_slate(seed: u64, shape: &SlateShape) -> Vec<CandidateRow> {
    let mut rng = Lcg(seed);
    let mut rows = Vec::new();
    for &(pos, count, lo, hi) in shape {
        for i in 0..count {
            let salary = rng.between(lo, hi) * 100;
            let noise = (rng.between(0, 100) as f64 - 50.0) / 10.0;
            let points = ((salary as f64 / 1000.0 * 2.2 + noise) * 10.0).round() / 10.0;
            let name = if pos == "DST" {
                format!("Defense{i}")
            } else {
                format!("{pos} Player {i}")
            };
            rows.push(CandidateRow::new(&name, pos, salary as u32, points.max(0.0)));
        }
    }
    rows
}

/// Best classic-roster total by exhaustive search, `None` when nothing fits.
fn exhaustive_best(pool: &[Candidate]) -> Option<f64> {
    assert!(pool.len() <= 24, "too many candidates to enumerate");
    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << pool.len()) {
        if mask.count_ones() != 9 {
            continue;
        }
        let picked: Vec<&Candidate> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| c)
            .collect();
        let count = |pos: Position| picked.iter().filter(|c| c.position == pos).count();
        let salary: u32 = picked.iter().map(|c| c.salary).sum();
        if salary > 50_000
            || count(Position::Quarterback) != 1
            || count(Position::Defense) != 1
            || count(Position::RunningBack) < 2
            || count(Position::WideReceiver) < 3
            || count(Position::TightEnd) < 1
        {
            continue;
        }
        let points: f64 = picked.iter().map(|c| c.projected_points).sum();
        best = Some(best.map_or(points, |b: f64| b.max(points)));
    }
    best.map(|b| (b * 10.0).round() / 10.0)
}

/// Every feasible roster must satisfy the classic template.
fn assert_classic_roster(roster: &SolvedRoster) {
    assert_eq!(roster.len(), 9, "roster size");
    assert!(roster.total_salary() <= 50_000, "salary {}", roster.total_salary());
    assert_eq!(roster.count(Position::Quarterback), 1);
    assert_eq!(roster.count(Position::Defense), 1);
    assert!(roster.count(Position::RunningBack) >= 2);
    assert!(roster.count(Position::WideReceiver) >= 3);
    assert!(roster.count(Position::TightEnd) >= 1);
}

// ===========================================================================
// Pool provider
// ===========================================================================

#[test]
fn fixture_pool_loads_every_named_row() {
    let rows = fixture_rows();
    assert_eq!(rows.len(), 18);

    let allen = rows.iter().find(|r| r.name == "Josh Allen").unwrap();
    assert_eq!(allen.salary, Some(7000));
    assert_eq!(allen.grade.as_deref(), Some("A+"));
    assert_eq!(allen.week, Some(5));

    let mystery = rows.iter().find(|r| r.name == "Mystery Man").unwrap();
    assert_eq!(mystery.position, None);
}

#[test]
fn latest_period_finds_fixture_week() {
    let latest = latest_period(Path::new(FIXTURES), 2024).unwrap();
    assert_eq!(latest, Some(WEEK_5));
    assert_eq!(latest_period(Path::new(FIXTURES), 2023).unwrap(), None);
}

#[test]
fn projection_dir_serves_candidates() {
    let dir = ProjectionDir::new(FIXTURES);
    let rows = dir.candidates(WEEK_5).unwrap();
    assert_eq!(rows, fixture_rows());
}

// ===========================================================================
// Normalization
// ===========================================================================

#[test]
fn fixture_normalization_rejects_filters_and_dedups() {
    let pool = normalize_pool(&fixture_rows(), None, &QualityFilter::default());

    assert_eq!(pool.candidates.len(), 13);
    assert_eq!(pool.filtered_by_grade, 2);
    assert!(pool.find("Ezekiel Elliott").is_none());
    assert!(pool.find("Michael Wilson").is_none());

    assert!(pool.warnings.contains(&Warning::MalformedCandidate {
        name: "Mystery Man".into(),
        reason: "missing position".into(),
    }));
    assert!(pool.warnings.contains(&Warning::MalformedCandidate {
        name: "Cash Free".into(),
        reason: "missing salary".into(),
    }));
    assert!(pool.warnings.contains(&Warning::DuplicateCandidate {
        name: "Kenneth Walker".into(),
    }));

    // First row wins the duplicate.
    let walker = pool.find("Kenneth Walker III").unwrap();
    assert_eq!(walker.salary, 5000);
    let defenses = pool
        .candidates
        .iter()
        .filter(|c| c.position == Position::Defense)
        .count();
    assert_eq!(defenses, 2);
    assert!(pool.find("Ravens").is_some());
}

// ===========================================================================
// Optimization scenarios
// ===========================================================================

#[test]
fn unconstrained_optimum() {
    let roster = optimize(&SelectionRequest::new()).unwrap();
    assert_classic_roster(&roster);

    let mut expected: Vec<String> = OPTIMAL.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(sorted_names(&roster), expected);
    assert_eq!(roster.total_salary(), 43_000);
    assert!((roster.projected_points() - 126.0).abs() < 1e-9);
}

#[test]
fn result_keeps_full_records() {
    let roster = optimize(&SelectionRequest::new()).unwrap();
    let chase = roster.players.iter().find(|p| p.name == "JaMarr Chase").unwrap();
    assert_eq!(chase.team, "CIN");
    assert_eq!(chase.opponent, "BAL");
    assert_eq!(chase.grade, Some(Grade::A));
    assert_eq!(chase.rank, Some(2));
    assert!((chase.average_points - 15.3).abs() < 1e-9);
}

#[test]
fn locked_defense_reduces_budget_slots_and_quota() {
    let pool = normalize_pool(&fixture_rows(), None, &QualityFilter::default());
    let request = SelectionRequest::new().lock_defense("Ravens");
    let pre = preprocess(&pool.candidates, &request, &RosterTemplate::CLASSIC).unwrap();

    assert_eq!(pre.reduction.budget, 47_000);
    assert_eq!(pre.reduction.slots, 8);
    assert_eq!(pre.reduction.minimums.get(Position::Defense), 0);
    assert!(pre.pool.iter().all(|c| c.name != "Ravens"));

    let roster = optimize(&request).unwrap();
    assert_classic_roster(&roster);
    assert!(roster.is_locked("Ravens"));
    assert_eq!(roster.locked, vec!["Ravens"]);
}

#[test]
fn locking_the_weaker_defense_keeps_one_defense() {
    let roster = optimize(&SelectionRequest::new().lock_defense("jets")).unwrap();
    assert_classic_roster(&roster);
    assert!(roster.contains("Jets"));
    assert!(!roster.contains("Ravens"));
}

#[test]
fn unknown_defense_fails_without_roster() {
    let err = optimize(&SelectionRequest::new().lock_defense("Raiders")).unwrap_err();
    assert!(matches!(err, OptimizeError::DefenseNotFound { ref team } if team == "Raiders"));
}

#[test]
fn excluding_best_quarterback_uses_the_other() {
    let roster = optimize(&SelectionRequest::new().exclude("Josh Allen")).unwrap();
    assert_classic_roster(&roster);
    assert!(!roster.contains("Josh Allen"));
    assert!(roster.contains("Jared Goff"));
}

#[test]
fn excluded_players_never_appear() {
    let request = SelectionRequest::new()
        .exclude("Christian McCaffrey")
        .exclude("Ja'Marr Chase");
    let roster = optimize(&request).unwrap();
    assert_classic_roster(&roster);
    assert!(!roster.contains("Christian McCaffrey"));
    assert!(!roster.contains("JaMarr Chase"));
}

#[test]
fn no_defense_available_is_infeasible() {
    let request = SelectionRequest::new()
        .exclude("Baltimore Ravens")
        .exclude("New York Jets");
    let err = optimize(&request).unwrap_err();
    assert!(err.is_infeasible(), "got {err}");
}

#[test]
fn grade_filter_emptying_a_position_is_infeasible() {
    let filter = QualityFilter::new([Grade::APlus, Grade::B]);
    let optimizer = Optimizer::default().with_filter(filter);
    let err = optimizer
        .optimize(&fixture_rows(), &SelectionRequest::new())
        .unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn locking_an_optimal_player_keeps_the_same_roster() {
    let free = optimize(&SelectionRequest::new()).unwrap();
    let locked = optimize(&SelectionRequest::new().lock("Christian McCaffrey")).unwrap();

    assert_eq!(sorted_names(&free), sorted_names(&locked));
    assert!(locked.is_locked("Christian McCaffrey"));
    assert!(locked.warnings.iter().all(|w| !matches!(w, Warning::UnknownLockedPlayer { .. })));
}

#[test]
fn repeated_calls_agree() {
    let request = SelectionRequest::new().lock("Tucker Kraft");
    let first = optimize(&request).unwrap();
    let second = optimize(&request).unwrap();
    assert_eq!(first.projected_points(), second.projected_points());
    assert_eq!(sorted_names(&first), sorted_names(&second));
}

#[test]
fn one_te_blocks_tight_end_in_flex() {
    // Locking the backup TE satisfies the TE minimum. Without single-TE mode
    // the starter still wins the flex over the best remaining RB.
    let base = SelectionRequest::new().lock("Tucker Kraft");

    let two_te = optimize(&base).unwrap();
    assert_classic_roster(&two_te);
    assert_eq!(two_te.count(Position::TightEnd), 2);
    assert!(two_te.contains("Travis Kelce"));

    let one_te = optimize(&base.clone().one_te(true)).unwrap();
    assert_classic_roster(&one_te);
    assert_eq!(one_te.count(Position::TightEnd), 1);
    assert!(one_te.contains("Tucker Kraft"));
    assert!(one_te.contains("Jaylen Warren"));
}

#[test]
fn unknown_and_excessive_locks_warn_but_solve() {
    let request = SelectionRequest::new()
        .lock("Patrick Mahomes")
        .lock("Josh Allen")
        .lock("Jared Goff");
    let roster = optimize(&request).unwrap();

    // Locks are never rejected for exceeding a quota.
    assert_eq!(roster.len(), 9);
    assert_eq!(roster.count(Position::Quarterback), 2);
    assert!(roster.total_salary() <= 50_000);
    assert_eq!(
        roster.warnings,
        vec![
            Warning::UnknownLockedPlayer {
                name: "Patrick Mahomes".into()
            },
            Warning::QuotaExhausted {
                name: "Jared Goff".into(),
                position: Position::Quarterback,
            },
        ]
    );
}

#[test]
fn lineup_places_extra_back_in_flex() {
    let roster = optimize(&SelectionRequest::new()).unwrap();
    let lineup = roster.lineup(&RosterTemplate::CLASSIC);
    let labels: Vec<String> = lineup.iter().map(|(slot, _)| slot.to_string()).collect();
    assert_eq!(
        labels,
        vec!["QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "DST"]
    );
    let flex = lineup.iter().find(|(slot, _)| *slot == Slot::Flex).unwrap();
    assert_eq!(flex.1.name, "Jaylen Warren");
}

// ===========================================================================
// Synthetic slates
// ===========================================================================

#[test]
fn full_week_slates_solve_within_the_default_limit() {
    for seed in [3, 7, 9, 11] {
        let rows = synthetic_slate(seed, &FULL_WEEK);
        assert_eq!(rows.len(), 322);
        let roster = Optimizer::default()
            .optimize(&rows, &SelectionRequest::new())
            .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        assert_classic_roster(&roster);
    }
}

#[test]
fn full_week_slate_with_locks_and_one_te() {
    let rows = synthetic_slate(9, &FULL_WEEK);
    let request = SelectionRequest::new()
        .lock("QB Player 0")
        .lock("RB Player 0")
        .lock_defense("Defense0")
        .one_te(true);
    let roster = Optimizer::default()
        .optimize(&rows, &request)
        .unwrap_or_else(|e| panic!("{e}"));

    assert_classic_roster(&roster);
    assert_eq!(roster.count(Position::TightEnd), 1);
    for name in ["QB Player 0", "RB Player 0", "Defense0"] {
        assert!(roster.contains(name), "missing {name}");
        assert!(roster.is_locked(name));
    }
}

#[test]
fn small_slates_match_exhaustive_search() {
    for seed in 1..=12 {
        let rows = synthetic_slate(seed, &TINY_WEEK);
        let pool = normalize_pool(&rows, None, &QualityFilter::none()).candidates;
        let result = Optimizer::default().optimize(&rows, &SelectionRequest::new());

        match exhaustive_best(&pool) {
            Some(best) => {
                let roster = result.unwrap_or_else(|e| panic!("seed {seed}: {e}"));
                assert_classic_roster(&roster);
                assert!(
                    (roster.projected_points() - best).abs() < 1e-6,
                    "seed {seed}: solver {} vs exhaustive {best}",
                    roster.projected_points()
                );
            }
            None => assert!(
                result.as_ref().is_err_and(OptimizeError::is_infeasible),
                "seed {seed}: expected infeasible"
            ),
        }
    }
}

// ===========================================================================
// Sessions
// ===========================================================================

#[tokio::test]
async fn parallel_blends_each_produce_a_roster() {
    let optimizer = Arc::new(Optimizer::with_solver(
        RosterTemplate::CLASSIC,
        QualityFilter::default(),
        MicrolpSolver::default(),
    ));
    let rows: Arc<[CandidateRow]> = fixture_rows().into();

    let outcomes =
        optimize_blends_parallel(optimizer, rows, &SelectionRequest::new(), &DEFAULT_BLENDS).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].blend, ScoringBlend::PRIMARY_ONLY);
    for outcome in &outcomes {
        let roster = outcome.result.as_ref().unwrap();
        assert_classic_roster(roster);
    }
    let primary = outcomes[0].result.as_ref().unwrap();
    assert!((primary.projected_points() - 126.0).abs() < 1e-9);
}
