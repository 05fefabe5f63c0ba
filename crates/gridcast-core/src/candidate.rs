// Candidate records: the raw rows a pool provider yields, and the normalized
// form the optimizer selects from.

use serde::{Deserialize, Serialize};

use crate::grade::Grade;
use crate::position::Position;

/// One row of a candidate table before normalization.
///
/// Every field except `name` may be missing. The optimizer decides what a
/// missing value means (zero for point sources, row rejection for salary and
/// position).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub grade: Option<String>,
    pub rank: Option<u32>,
    pub salary: Option<u32>,
    /// Primary point projection for the period.
    pub projected_points: Option<f64>,
    /// Secondary point source: recent per-game fantasy average.
    pub average_points: Option<f64>,
    pub year: Option<i32>,
    pub week: Option<u32>,
}

impl CandidateRow {
    pub fn new(name: &str, position: &str, salary: u32, projected_points: f64) -> Self {
        CandidateRow {
            name: name.to_string(),
            position: Some(position.to_string()),
            salary: Some(salary),
            projected_points: Some(projected_points),
            ..Default::default()
        }
    }

    pub fn with_average(mut self, average_points: f64) -> Self {
        self.average_points = Some(average_points);
        self
    }

    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }
}

/// A validated candidate eligible for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Normalized name; unique within a pool.
    pub name: String,
    pub position: Position,
    pub team: String,
    pub opponent: String,
    pub grade: Option<Grade>,
    pub rank: Option<u32>,
    pub salary: u32,
    /// Effective projection the optimizer maximizes (blended when requested).
    pub projected_points: f64,
    pub average_points: f64,
    pub year: Option<i32>,
    pub week: Option<u32>,
}
