// The roster optimizer: normalize, pre-process, build the model, solve, and
// assemble the final roster.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use gridcast_core::candidate::{Candidate, CandidateRow};
use gridcast_core::config::Config;
use gridcast_core::position::Position;
use gridcast_core::roster::RosterTemplate;

use crate::error::OptimizeError;
use crate::lineup::{assign_slots, Slot};
use crate::model::build_model;
use crate::normalize::{normalize_pool, NormalizedPool, QualityFilter};
use crate::preprocess::{preprocess, Reduction};
use crate::prune::prune_dominated;
use crate::request::SelectionRequest;
use crate::solver::{MicrolpSolver, Solver};
use crate::warning::Warning;

// ---------------------------------------------------------------------------
// Solved roster
// ---------------------------------------------------------------------------

/// The result of one optimization call.
#[derive(Debug, Clone, Serialize)]
pub struct SolvedRoster {
    /// Full candidate records, in pool order.
    pub players: Vec<Candidate>,
    /// Names forced in by locks rather than chosen by the solver.
    pub locked: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl SolvedRoster {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn total_salary(&self) -> u32 {
        self.players.iter().map(|p| p.salary).sum()
    }

    pub fn projected_points(&self) -> f64 {
        let total: f64 = self.players.iter().map(|p| p.projected_points).sum();
        (total * 10.0).round() / 10.0
    }

    pub fn count(&self, pos: Position) -> usize {
        self.players.iter().filter(|p| p.position == pos).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Players with their lineup slots, in contest display order.
    pub fn lineup(&self, template: &RosterTemplate) -> Vec<(Slot, &Candidate)> {
        assign_slots(&self.players, template)
    }
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

/// Stateless between calls: every `optimize` builds a fresh model, so one
/// optimizer can be shared across threads.
#[derive(Debug, Clone)]
pub struct Optimizer<S: Solver = MicrolpSolver> {
    template: RosterTemplate,
    filter: QualityFilter,
    solver: S,
}

impl Optimizer<MicrolpSolver> {
    pub fn new(template: RosterTemplate) -> Self {
        Optimizer::with_solver(template, QualityFilter::default(), MicrolpSolver::default())
    }

    /// Template, grade filter and solver time limit from configuration.
    pub fn from_config(config: &Config) -> Self {
        Optimizer::with_solver(
            config.roster_template(),
            QualityFilter::new(config.pool.excluded_grades()),
            MicrolpSolver::new(config.solver.time_limit()),
        )
    }
}

impl Default for Optimizer<MicrolpSolver> {
    fn default() -> Self {
        Optimizer::new(RosterTemplate::CLASSIC)
    }
}

impl<S: Solver> Optimizer<S> {
    pub fn with_solver(template: RosterTemplate, filter: QualityFilter, solver: S) -> Self {
        Optimizer {
            template,
            filter,
            solver,
        }
    }

    pub fn with_filter(mut self, filter: QualityFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn template(&self) -> &RosterTemplate {
        &self.template
    }

    /// Run only the normalization stage.
    pub fn normalize(&self, rows: &[CandidateRow], request: &SelectionRequest) -> NormalizedPool {
        normalize_pool(rows, request.scoring_blend, &self.filter)
    }

    /// Select the highest-projected roster for `rows` under `request`.
    ///
    /// # Errors
    ///
    /// `DefenseNotFound` when the defense lock matches nothing, `Infeasible`
    /// when no roster satisfies the (reduced) constraints, and solver errors
    /// when the backend fails or runs out of time.
    pub fn optimize(
        &self,
        rows: &[CandidateRow],
        request: &SelectionRequest,
    ) -> Result<SolvedRoster, OptimizeError> {
        let pool = self.normalize(rows, request);
        let mut warnings = pool.warnings.clone();

        let pre = preprocess(&pool.candidates, request, &self.template)?;
        warnings.extend(pre.warnings);
        let reduction = pre.reduction;

        check_reduction(&reduction)?;

        let chosen: Vec<String> = if reduction.slots == 0 {
            debug!("every slot filled by locks; skipping the solver");
            Vec::new()
        } else {
            let sub_pool = prune_dominated(&pre.pool, &reduction, request.one_te);
            let model = build_model(&sub_pool, &reduction, request.one_te);
            debug!(
                "solving with {}: {} variables, {} constraints",
                self.solver.name(),
                model.num_vars(),
                model.constraints.len()
            );
            let picks = self
                .solver
                .solve(&model)
                .map_err(|e| OptimizeError::from_solve(self.solver.name(), e))?;
            sub_pool
                .into_iter()
                .zip(picks)
                .filter_map(|(candidate, picked)| picked.then_some(candidate.name))
                .collect()
        };

        let locked: Vec<String> = reduction.forced.iter().map(|c| c.name.clone()).collect();
        let selected: HashSet<&str> = locked
            .iter()
            .map(String::as_str)
            .chain(chosen.iter().map(String::as_str))
            .collect();

        let players: Vec<Candidate> = pool
            .candidates
            .iter()
            .filter(|c| selected.contains(c.name.as_str()))
            .cloned()
            .collect();

        Ok(SolvedRoster {
            players,
            locked,
            warnings,
        })
    }
}

/// Structural infeasibility the locks alone can cause.
fn check_reduction(reduction: &Reduction) -> Result<(), OptimizeError> {
    if reduction.slots < 0 {
        return Err(OptimizeError::infeasible(format!(
            "{} players locked but the roster only has {} slots",
            reduction.forced.len(),
            reduction.forced.len() as i64 + reduction.slots
        )));
    }
    if reduction.budget < 0 {
        return Err(OptimizeError::infeasible(format!(
            "locked players exceed the salary cap by ${}",
            -reduction.budget
        )));
    }
    if reduction.slots == 0 && !reduction.minimums.is_zero() {
        return Err(OptimizeError::infeasible(format!(
            "every slot is locked but position minimums remain ({})",
            reduction.minimums
        )));
    }
    Ok(())
}
