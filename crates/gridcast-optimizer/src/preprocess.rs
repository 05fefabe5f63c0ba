// Selection pre-processing: exclusions, then the defense lock, then player
// locks, folded into an immutable reduction of the roster template.

use tracing::debug;

use gridcast_core::candidate::Candidate;
use gridcast_core::position::Position;
use gridcast_core::roster::{Quotas, RosterTemplate};

use crate::error::OptimizeError;
use crate::normalize::{identity_for, names_match};
use crate::request::SelectionRequest;
use crate::warning::Warning;

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// What remains for the solver once forced candidates are accounted for.
///
/// Budget and slots are signed: locks may overspend either, which the engine
/// reports as infeasible rather than wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub forced: Vec<Candidate>,
    pub budget: i64,
    pub slots: i64,
    pub minimums: Quotas,
}

impl Reduction {
    pub fn from_template(template: &RosterTemplate) -> Self {
        Reduction {
            forced: Vec::new(),
            budget: i64::from(template.budget_cap),
            slots: i64::from(template.total_slots),
            minimums: template.minimums,
        }
    }

    pub fn is_forced(&self, name: &str) -> bool {
        self.forced.iter().any(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn force(mut self, candidate: &Candidate) -> Self {
        self.budget -= i64::from(candidate.salary);
        self.slots -= 1;
        self.forced.push(candidate.clone());
        self
    }

    /// Force a defense in. The defense quota is satisfied outright.
    pub fn lock_defense(self, defense: &Candidate) -> Self {
        let mut next = self.force(defense);
        next.minimums = next.minimums.with(Position::Defense, 0);
        next
    }

    /// Force a player in, consuming one unit of its position's minimum.
    ///
    /// A player already forced is not counted twice. A player whose position
    /// minimum is already zero is still included; the minimum stays at zero
    /// and a warning is returned.
    pub fn lock_player(self, candidate: &Candidate) -> (Self, Option<Warning>) {
        if self.is_forced(&candidate.name) {
            let warning = Warning::DuplicateLock {
                name: candidate.name.clone(),
            };
            return (self, Some(warning));
        }

        let pos = candidate.position;
        let mut next = self.force(candidate);
        match next.minimums.get(pos) {
            0 => {
                let warning = Warning::QuotaExhausted {
                    name: candidate.name.clone(),
                    position: pos,
                };
                (next, Some(warning))
            }
            n => {
                next.minimums = next.minimums.with(pos, n - 1);
                (next, None)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pre-processing
// ---------------------------------------------------------------------------

/// Output of the pre-processor: the reduction plus the sub-pool the solver
/// still chooses from (no excluded or forced candidates).
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub reduction: Reduction,
    pub pool: Vec<Candidate>,
    pub warnings: Vec<Warning>,
}

/// Apply exclusions and locks to the normalized pool.
///
/// Fails only when a defense lock matches no defense in the pool.
pub fn preprocess(
    pool: &[Candidate],
    request: &SelectionRequest,
    template: &RosterTemplate,
) -> Result<Preprocessed, OptimizeError> {
    let available: Vec<&Candidate> = pool
        .iter()
        .filter(|c| !request.excluded_players.iter().any(|x| names_match(c, x)))
        .collect();

    let mut reduction = Reduction::from_template(template);

    if let Some(token) = request.defense_token() {
        let defense = find_defense(&available, token).ok_or_else(|| {
            OptimizeError::DefenseNotFound {
                team: token.to_string(),
            }
        })?;

        if request.locked_players.iter().any(|n| names_match(defense, n)) {
            debug!("defense {} is also a player lock; deferring", defense.name);
        } else {
            reduction = reduction.lock_defense(defense);
        }
    }

    let (reduction, warnings) = request.locked_players.iter().fold(
        (reduction, Vec::new()),
        |(reduction, mut warnings), name| match available.iter().find(|c| names_match(c, name)) {
            Some(candidate) => {
                let (reduction, warning) = reduction.lock_player(candidate);
                warnings.extend(warning);
                (reduction, warnings)
            }
            None => {
                warnings.push(Warning::UnknownLockedPlayer { name: name.clone() });
                (reduction, warnings)
            }
        },
    );

    let sub_pool: Vec<Candidate> = available
        .into_iter()
        .filter(|c| !reduction.is_forced(&c.name))
        .cloned()
        .collect();

    debug!(
        "pre-processed: {} forced, budget {}, {} slots, minimums {}, {} candidates left",
        reduction.forced.len(),
        reduction.budget,
        reduction.slots,
        reduction.minimums,
        sub_pool.len()
    );

    Ok(Preprocessed {
        reduction,
        pool: sub_pool,
        warnings,
    })
}

/// First defense, in pool order, whose name contains the team token.
fn find_defense<'a>(available: &[&'a Candidate], token: &str) -> Option<&'a Candidate> {
    let needle = identity_for(Position::Defense, token).to_lowercase();
    if needle.is_empty() {
        return None;
    }
    available
        .iter()
        .copied()
        .filter(|c| c.position == Position::Defense)
        .find(|c| c.name.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
