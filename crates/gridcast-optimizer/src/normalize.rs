// Candidate pool normalization: name cleanup, row validation, de-duplication,
// quality filtering and projection blending.

use std::collections::HashSet;
use tracing::debug;

use gridcast_core::blend::ScoringBlend;
use gridcast_core::candidate::{Candidate, CandidateRow};
use gridcast_core::grade::{Grade, BOTTOM_TIER};
use gridcast_core::position::Position;

use crate::warning::Warning;

/// Generational suffixes dropped from the end of a name, compared after
/// periods are removed.
const NAME_SUFFIXES: [&str; 7] = ["JR", "SR", "I", "II", "III", "IV", "V"];

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Canonical form of a player name.
///
/// Drops any parenthesized team tag ("Josh Allen (BUF)"), periods and
/// apostrophes, trailing generational suffixes, and collapses whitespace.
/// A name made only of suffix tokens is left as is.
pub fn normalize_name(raw: &str) -> String {
    let base = raw.split('(').next().unwrap_or(raw);

    let mut tokens: Vec<String> = base
        .split_whitespace()
        .map(|t| t.chars().filter(|c| *c != '.' && *c != '\'').collect::<String>())
        .filter(|t| !t.is_empty())
        .collect();

    while tokens.len() > 1 {
        let last = tokens[tokens.len() - 1].to_uppercase();
        if NAME_SUFFIXES.contains(&last.as_str()) {
            tokens.pop();
        } else {
            break;
        }
    }

    tokens.join(" ")
}

/// The name a candidate is keyed by. Defenses are identified by the final
/// word of their name, the franchise ("Baltimore Ravens" -> "Ravens").
pub fn identity_for(position: Position, raw: &str) -> String {
    let name = normalize_name(raw);
    match position {
        Position::Defense => name
            .split_whitespace()
            .last()
            .map(str::to_string)
            .unwrap_or(name),
        _ => name,
    }
}

/// Whether a caller-supplied name refers to this candidate. Case-insensitive,
/// after normalizing the requested name the same way the pool was.
pub fn names_match(candidate: &Candidate, requested: &str) -> bool {
    let wanted = identity_for(candidate.position, requested);
    !wanted.is_empty() && candidate.name.eq_ignore_ascii_case(&wanted)
}

// ---------------------------------------------------------------------------
// Quality filter
// ---------------------------------------------------------------------------

/// Removes candidates carrying one of a set of letter grades.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityFilter {
    excluded: Vec<Grade>,
}

impl QualityFilter {
    pub fn new(excluded: impl IntoIterator<Item = Grade>) -> Self {
        QualityFilter {
            excluded: excluded.into_iter().collect(),
        }
    }

    /// A filter that admits every grade.
    pub fn none() -> Self {
        QualityFilter {
            excluded: Vec::new(),
        }
    }

    /// Ungraded candidates are always admitted.
    pub fn admits(&self, grade: Option<Grade>) -> bool {
        match grade {
            Some(g) => !self.excluded.contains(&g),
            None => true,
        }
    }
}

impl Default for QualityFilter {
    fn default() -> Self {
        QualityFilter::new(BOTTOM_TIER)
    }
}

// ---------------------------------------------------------------------------
// Pool normalization
// ---------------------------------------------------------------------------

/// The cleaned pool, plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPool {
    pub candidates: Vec<Candidate>,
    pub warnings: Vec<Warning>,
    /// Rows removed by the quality filter. Not a warning: filtering is routine.
    pub filtered_by_grade: usize,
}

impl NormalizedPool {
    pub fn find(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| names_match(c, name))
    }
}

/// Validate raw rows and build the pool the optimizer selects from.
///
/// Rows without a salary or a recognizable position are rejected with a
/// warning. Missing or negative point values count as zero. Duplicate names
/// keep the first row. The quality filter runs after de-duplication, so a
/// filtered first row still shadows later rows with the same name.
pub fn normalize_pool(
    rows: &[CandidateRow],
    blend: Option<ScoringBlend>,
    filter: &QualityFilter,
) -> NormalizedPool {
    let blend = blend.filter(|b| !b.is_primary_only());
    let mut pool = NormalizedPool::default();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        let raw_name = row.name.trim();

        let Some(position) = row.position.as_deref().and_then(Position::from_str_pos) else {
            let reason = match row.position.as_deref().map(str::trim) {
                None | Some("") => "missing position".to_string(),
                Some(other) => format!("unknown position '{other}'"),
            };
            pool.warnings.push(Warning::MalformedCandidate {
                name: raw_name.to_string(),
                reason,
            });
            continue;
        };

        let name = identity_for(position, raw_name);
        if name.is_empty() {
            pool.warnings.push(Warning::MalformedCandidate {
                name: raw_name.to_string(),
                reason: "blank name".to_string(),
            });
            continue;
        }

        let salary = match row.salary {
            Some(s) if s > 0 => s,
            _ => {
                pool.warnings.push(Warning::MalformedCandidate {
                    name,
                    reason: "missing salary".to_string(),
                });
                continue;
            }
        };

        if !seen.insert(name.to_lowercase()) {
            pool.warnings.push(Warning::DuplicateCandidate { name });
            continue;
        }

        let grade = row.grade.as_deref().and_then(Grade::parse);
        if !filter.admits(grade) {
            debug!("filtered {} ({}) with grade {:?}", name, position, grade);
            pool.filtered_by_grade += 1;
            continue;
        }

        let projected = points(row.projected_points);
        let average = points(row.average_points);
        let effective = match blend {
            Some(b) => b.apply(projected, average),
            None => projected,
        };

        pool.candidates.push(Candidate {
            name,
            position,
            team: row.team.clone().unwrap_or_default(),
            opponent: row.opponent.clone().unwrap_or_default(),
            grade,
            rank: row.rank,
            salary,
            projected_points: effective,
            average_points: average,
            year: row.year,
            week: row.week,
        });
    }

    debug!(
        "normalized pool: {} candidates, {} rejected, {} filtered by grade",
        pool.candidates.len(),
        pool.warnings.len(),
        pool.filtered_by_grade
    );

    pool
}

/// Missing or non-finite values count as zero, and negatives are floored at
/// zero.
fn points(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
