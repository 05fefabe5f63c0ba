// Hard failures of an optimization call. No partial roster accompanies these.

use std::time::Duration;
use thiserror::Error;

use crate::solver::SolveError;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("no defense in the pool matches '{team}'")]
    DefenseNotFound { team: String },

    #[error("no roster satisfies the constraints: {reason}")]
    Infeasible { reason: String },

    #[error("{solver} solver failed: {message}")]
    SolverFailed {
        solver: &'static str,
        message: String,
    },

    #[error("solver exceeded its time limit of {limit:?}")]
    TimedOut { limit: Duration },

    #[error("optimization task failed: {0}")]
    TaskFailed(String),
}

impl OptimizeError {
    pub(crate) fn infeasible(reason: impl Into<String>) -> Self {
        OptimizeError::Infeasible {
            reason: reason.into(),
        }
    }

    /// Translate a solver error, tagging it with the backend's name.
    pub(crate) fn from_solve(solver: &'static str, err: SolveError) -> Self {
        match err {
            SolveError::Infeasible => {
                OptimizeError::infeasible(format!("{solver} reported the model infeasible"))
            }
            SolveError::TimedOut(limit) => OptimizeError::TimedOut { limit },
            SolveError::Unbounded => OptimizeError::SolverFailed {
                solver,
                message: "model is unbounded".into(),
            },
            SolveError::Internal(message) => OptimizeError::SolverFailed { solver, message },
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, OptimizeError::Infeasible { .. })
    }
}
