// Candidate-pool provider backed by stored projection files.
//
// One CSV per period, named `fp_projection_{year}_w{week}.csv`, with columns
// year,week,player,position,team,opponent,grade,rank,avg_fpts,proj_fpts,salary.
// Only `player` is required; blank cells load as missing values.

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::candidate::CandidateRow;
use crate::period::Period;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// Anything that can hand the optimizer a candidate table for a period.
pub trait CandidatePool {
    fn candidates(&self, period: Period) -> Result<Vec<CandidateRow>, PoolError>;
}

/// A directory of stored projection files.
#[derive(Debug, Clone)]
pub struct ProjectionDir {
    dir: PathBuf,
}

impl ProjectionDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ProjectionDir { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Latest stored period for `year`, if any.
    pub fn latest_period(&self, year: i32) -> Result<Option<Period>, PoolError> {
        latest_period(&self.dir, year)
    }
}

impl CandidatePool for ProjectionDir {
    fn candidates(&self, period: Period) -> Result<Vec<CandidateRow>, PoolError> {
        load_pool_for(&self.dir, period)
    }
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Numeric columns are read as f64: exporters write integer columns that
/// contain blanks as floats (e.g. `rank` = "12.0").
#[derive(Debug, Deserialize)]
struct RawProjectionRow {
    player: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    opponent: Option<String>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    rank: Option<f64>,
    #[serde(default)]
    avg_fpts: Option<f64>,
    #[serde(default)]
    proj_fpts: Option<f64>,
    #[serde(default)]
    salary: Option<f64>,
    #[serde(default)]
    year: Option<f64>,
    #[serde(default)]
    week: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn whole(value: Option<f64>) -> Option<u32> {
    finite(value)
        .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32)
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawProjectionRow {
    fn into_row(self) -> CandidateRow {
        CandidateRow {
            name: self.player.trim().to_string(),
            position: text(self.position),
            team: text(self.team),
            opponent: text(self.opponent),
            grade: text(self.grade),
            rank: whole(self.rank),
            salary: whole(self.salary),
            projected_points: finite(self.proj_fpts),
            average_points: finite(self.avg_fpts),
            year: finite(self.year).map(|y| y.round() as i32),
            week: whole(self.week),
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_pool_from_reader<R: Read>(rdr: R) -> Result<Vec<CandidateRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawProjectionRow>() {
        match result {
            Ok(raw) => {
                if raw.player.trim().is_empty() {
                    warn!("skipping projection row with blank player name");
                    continue;
                }
                rows.push(raw.into_row());
            }
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
            }
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// File name of the stored projection table for a period.
pub fn projection_file_name(period: Period) -> String {
    format!("fp_projection_{}_w{}.csv", period.year, period.week)
}

/// Parse a stored projection file name back into its period.
pub fn parse_projection_file_name(file_name: &str) -> Option<Period> {
    let rest = file_name
        .strip_prefix("fp_projection_")?
        .strip_suffix(".csv")?;
    let (year, week) = rest.split_once("_w")?;
    Some(Period::new(year.parse().ok()?, week.parse().ok()?))
}

/// Load a candidate table from a CSV file.
pub fn load_pool(path: &Path) -> Result<Vec<CandidateRow>, PoolError> {
    let file = std::fs::File::open(path).map_err(|e| PoolError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rows = load_pool_from_reader(file).map_err(|e| PoolError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if rows.is_empty() {
        return Err(PoolError::Validation(format!(
            "{} produced zero valid rows",
            path.display()
        )));
    }
    debug!("loaded {} candidate rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load the stored candidate table for `period` from `dir`.
pub fn load_pool_for(dir: &Path, period: Period) -> Result<Vec<CandidateRow>, PoolError> {
    load_pool(&dir.join(projection_file_name(period)))
}

/// Highest week with a stored projection file for `year` in `dir`.
pub fn latest_period(dir: &Path, year: i32) -> Result<Option<Period>, PoolError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PoolError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut latest: Option<Period> = None;
    for entry in entries {
        let entry = entry.map_err(|e| PoolError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let Some(period) = entry
            .file_name()
            .to_str()
            .and_then(parse_projection_file_name)
        else {
            continue;
        };
        if period.year == year && latest.map_or(true, |l| period.week > l.week) {
            latest = Some(period);
        }
    }
    Ok(latest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
