// Binary program for the reduced selection problem: one variable per
// sub-pool candidate, maximize projected points.

use std::fmt;

use gridcast_core::candidate::Candidate;
use gridcast_core::position::Position;

use crate::preprocess::Reduction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Equal,
    AtLeast,
    AtMost,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sense::Equal => "=",
            Sense::AtLeast => ">=",
            Sense::AtMost => "<=",
        };
        write!(f, "{s}")
    }
}

/// `sum(coefficients[i] * x[i]) <sense> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub label: String,
    pub coefficients: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Whether the left side is identically zero.
    fn is_empty(&self) -> bool {
        self.coefficients.iter().all(|c| *c == 0.0)
    }

    /// An empty left side that cannot meet its right-hand side.
    fn is_unsatisfiable_when_empty(&self) -> bool {
        self.is_empty()
            && match self.sense {
                Sense::Equal => self.rhs != 0.0,
                Sense::AtLeast => self.rhs > 0.0,
                Sense::AtMost => self.rhs < 0.0,
            }
    }
}

/// Maximize `objective . x` over binary `x`, subject to `constraints`.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterModel {
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl RosterModel {
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn constraint(&self, label: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.label == label)
    }

    /// A constraint no assignment can satisfy because no candidate
    /// contributes to it (e.g. a position quota with no candidates left).
    pub fn unsatisfiable_constraint(&self) -> Option<&LinearConstraint> {
        self.constraints
            .iter()
            .find(|c| c.is_unsatisfiable_when_empty())
    }
}

/// Whether the program pins `pos` to exactly its minimum.
pub fn is_exact(pos: Position, one_te: bool) -> bool {
    pos.has_exact_quota() || (one_te && pos == Position::TightEnd)
}

/// Build the program for `pool` under `reduction`.
///
/// QB and DST counts are exact. RB and WR are floors, leaving room for flex.
/// TE is a floor unless `one_te`, in which case it is exact.
pub fn build_model(pool: &[Candidate], reduction: &Reduction, one_te: bool) -> RosterModel {
    let objective = pool.iter().map(|c| c.projected_points).collect();

    let mut constraints = vec![
        LinearConstraint {
            label: "roster_size".to_string(),
            coefficients: vec![1.0; pool.len()],
            sense: Sense::Equal,
            rhs: reduction.slots as f64,
        },
        LinearConstraint {
            label: "salary_cap".to_string(),
            coefficients: pool.iter().map(|c| f64::from(c.salary)).collect(),
            sense: Sense::AtMost,
            rhs: reduction.budget as f64,
        },
    ];

    for pos in Position::ALL {
        let sense = if is_exact(pos, one_te) {
            Sense::Equal
        } else {
            Sense::AtLeast
        };
        constraints.push(LinearConstraint {
            label: pos.display_str().to_string(),
            coefficients: pool
                .iter()
                .map(|c| if c.position == pos { 1.0 } else { 0.0 })
                .collect(),
            sense,
            rhs: f64::from(reduction.minimums.get(pos)),
        });
    }

    RosterModel {
        objective,
        constraints,
    }
}
