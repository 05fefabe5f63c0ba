//! Integer-programming backends.
//!
//! The engine talks to a [`Solver`] so the backend can be swapped (or stubbed
//! in tests). [`MicrolpSolver`] is the default: a pure-Rust branch-and-bound
//! solver run on a worker thread under a wall-clock limit.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use thiserror::Error;
use tracing::debug;

use crate::model::{RosterModel, Sense};

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("model is infeasible")]
    Infeasible,

    #[error("model is unbounded")]
    Unbounded,

    #[error("no solution within {0:?}")]
    TimedOut(Duration),

    #[error("{0}")]
    Internal(String),
}

/// A binary-program solver.
///
/// Implementations must be thread-safe (`Send + Sync`) so one optimizer can
/// serve concurrent calls.
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Maximize the model's objective over binary variables.
    ///
    /// Returns one flag per variable, `true` when selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is infeasible, the time limit is hit, or
    /// the backend fails.
    fn solve(&self, model: &RosterModel) -> Result<Vec<bool>, SolveError>;
}

// ---------------------------------------------------------------------------
// microlp backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MicrolpSolver {
    time_limit: Duration,
}

impl MicrolpSolver {
    pub fn new(time_limit: Duration) -> Self {
        MicrolpSolver { time_limit }
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        MicrolpSolver::new(DEFAULT_TIME_LIMIT)
    }
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    /// Solves on a dedicated thread. On timeout the thread is abandoned and
    /// finishes in the background; its result is discarded.
    fn solve(&self, model: &RosterModel) -> Result<Vec<bool>, SolveError> {
        if let Some(bad) = model.unsatisfiable_constraint() {
            debug!(
                "constraint {} ({} {}) has no contributing candidates",
                bad.label, bad.sense, bad.rhs
            );
            return Err(SolveError::Infeasible);
        }

        let model = model.clone();
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("microlp-solve".into())
            .spawn(move || {
                // The receiver is gone if we already timed out.
                let _ = tx.send(solve_blocking(&model));
            })
            .map_err(|e| SolveError::Internal(format!("failed to spawn solver thread: {e}")))?;

        match rx.recv_timeout(self.time_limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SolveError::TimedOut(self.time_limit)),
            Err(RecvTimeoutError::Disconnected) => Err(SolveError::Internal(
                "solver thread exited without a result".into(),
            )),
        }
    }
}

fn solve_blocking(model: &RosterModel) -> Result<Vec<bool>, SolveError> {
    let mut problem = Problem::new(OptimizationDirection::Maximize);
    let vars: Vec<Variable> = model
        .objective
        .iter()
        .map(|&points| problem.add_binary_var(points))
        .collect();

    for constraint in &model.constraints {
        let terms: Vec<(Variable, f64)> = vars
            .iter()
            .zip(&constraint.coefficients)
            .filter(|(_, coeff)| **coeff != 0.0)
            .map(|(var, coeff)| (*var, *coeff))
            .collect();
        // Empty rows were vetted by unsatisfiable_constraint().
        if terms.is_empty() {
            continue;
        }
        problem.add_constraint(terms, comparison_op(constraint.sense), constraint.rhs);
    }

    let solution = problem.solve().map_err(|e| match e {
        microlp::Error::Infeasible => SolveError::Infeasible,
        microlp::Error::Unbounded => SolveError::Unbounded,
        microlp::Error::InternalError(msg) => SolveError::Internal(msg),
    })?;

    debug!("microlp objective {:.1}", solution.objective());

    Ok(vars
        .iter()
        .map(|var| *solution.var_value(*var) > 0.5)
        .collect())
}

fn comparison_op(sense: Sense) -> ComparisonOp {
    match sense {
        Sense::Equal => ComparisonOp::Eq,
        Sense::AtLeast => ComparisonOp::Ge,
        Sense::AtMost => ComparisonOp::Le,
    }
}
