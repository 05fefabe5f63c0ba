// Configuration loading and parsing (contest.toml).

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::blend::ScoringBlend;
use crate::grade::{Grade, BOTTOM_TIER};
use crate::roster::{Quotas, RosterTemplate};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub contest: ContestConfig,
    pub pool: PoolConfig,
    pub scoring: ScoringConfig,
    pub solver: SolverConfig,
    pub data: DataConfig,
}

impl Config {
    pub fn roster_template(&self) -> RosterTemplate {
        self.contest.roster_template()
    }
}

// ---------------------------------------------------------------------------
// contest.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire contest.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ContestFile {
    contest: ContestConfig,
    #[serde(default)]
    pool: PoolConfig,
    #[serde(default)]
    scoring: ScoringConfig,
    #[serde(default)]
    solver: SolverConfig,
    data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestConfig {
    pub name: String,
    pub salary_cap: u32,
    pub total_slots: u32,
    pub minimums: PositionMinimums,
}

impl ContestConfig {
    pub fn roster_template(&self) -> RosterTemplate {
        let m = &self.minimums;
        RosterTemplate {
            total_slots: self.total_slots,
            budget_cap: self.salary_cap,
            minimums: Quotas::new(m.QB, m.RB, m.WR, m.TE, m.DST),
        }
    }
}

/// Per-position minimums. The field names use UPPERCASE to match the TOML
/// keys (QB, RB, ...).
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct PositionMinimums {
    pub QB: u32,
    pub RB: u32,
    pub WR: u32,
    pub TE: u32,
    pub DST: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Letter grades removed from the pool before optimization.
    #[serde(default = "default_excluded_grades")]
    pub excluded_grades: Vec<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            excluded_grades: default_excluded_grades(),
        }
    }
}

impl PoolConfig {
    /// Parsed excluded grades. Unrecognized entries are rejected by
    /// validation, so they never reach this point in a loaded config.
    pub fn excluded_grades(&self) -> Vec<Grade> {
        self.excluded_grades
            .iter()
            .filter_map(|g| Grade::parse(g))
            .collect()
    }
}

fn default_excluded_grades() -> Vec<String> {
    BOTTOM_TIER.iter().map(|g| g.as_str().to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// One roster is solved per blend, in order.
    #[serde(default = "default_blends")]
    pub blends: Vec<ScoringBlend>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            blends: default_blends(),
        }
    }
}

fn default_blends() -> Vec<ScoringBlend> {
    vec![
        ScoringBlend::new(1.0, 0.0),
        ScoringBlend::new(0.9, 0.1),
        ScoringBlend::new(0.8, 0.2),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit_secs: default_time_limit_secs(),
        }
    }
}

/// Longest solver time limit accepted from configuration.
pub const MAX_TIME_LIMIT_SECS: f64 = 3600.0;

impl SolverConfig {
    /// Out-of-range values (only reachable by skipping validation) fall back
    /// to the default limit.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(default_time_limit_secs()))
    }
}

fn default_time_limit_secs() -> f64 {
    5.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub projections_dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/contest.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let contest_path = base_dir.join("config").join(CONTEST_FILE);
    let contest_text = read_file(&contest_path)?;
    let file: ContestFile =
        toml::from_str(&contest_text).map_err(|e| ConfigError::ParseError {
            path: contest_path.clone(),
            source: e,
        })?;

    let config = Config {
        contest: file.contest,
        pool: file.pool,
        scoring: file.scoring,
        solver: file.solver,
        data: file.data,
    };

    validate(&config)?;

    Ok(config)
}

/// File holding the contest settings, under both `config/` and `defaults/`.
pub const CONTEST_FILE: &str = "contest.toml";

/// First-run setup: install each shipped default into `config/` unless a file
/// of that name is already there. `.example` files are never installed.
///
/// Returns the files installed by this call. Fails when no `contest.toml`
/// ends up in `config/`.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let contest_path = config_dir.join(CONTEST_FILE);

    if !defaults_dir.is_dir() {
        if contest_path.is_file() {
            return Ok(Vec::new());
        }
        return Err(setup_error(format!(
            "no {} and no defaults/ to install it from; run gridcast from its project root",
            contest_path.display()
        )));
    }

    fs::create_dir_all(&config_dir)
        .map_err(|e| setup_error(format!("failed to create {}: {e}", config_dir.display())))?;
    let entries = fs::read_dir(&defaults_dir)
        .map_err(|e| setup_error(format!("failed to read {}: {e}", defaults_dir.display())))?;

    let mut installed = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| setup_error(format!("failed to read defaults entry: {e}")))?
            .path();
        if !source.is_file() || source.extension().is_some_and(|ext| ext == "example") {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };

        let target = config_dir.join(file_name);
        if install_default(&source, &target)? {
            info!("installed default {}", target.display());
            installed.push(target);
        }
    }

    if !contest_path.is_file() {
        return Err(setup_error(format!(
            "defaults/ does not ship {CONTEST_FILE}"
        )));
    }
    Ok(installed)
}

/// Copy `source` to `target` unless `target` exists. Returns whether it copied.
fn install_default(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(setup_error(format!(
                "failed to create {}: {e}",
                target.display()
            )))
        }
    };
    let content = fs::read(source)
        .map_err(|e| setup_error(format!("failed to read {}: {e}", source.display())))?;
    dest.write_all(&content)
        .map_err(|e| setup_error(format!("failed to write {}: {e}", target.display())))?;
    Ok(true)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn setup_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // Contest validations
    let contest = &config.contest;
    if contest.salary_cap == 0 {
        return Err(invalid("contest.salary_cap", "must be greater than 0"));
    }
    if contest.total_slots == 0 {
        return Err(invalid("contest.total_slots", "must be greater than 0"));
    }

    let template = contest.roster_template();
    let required = template.minimums.total();
    if required > template.total_slots {
        return Err(invalid(
            "contest.minimums",
            format!(
                "position minimums sum to {required}, more than the {} roster slots",
                template.total_slots
            ),
        ));
    }
    if contest.minimums.QB > 1 {
        return Err(invalid("contest.minimums.QB", "must be 0 or 1"));
    }
    if contest.minimums.DST > 1 {
        return Err(invalid("contest.minimums.DST", "must be 0 or 1"));
    }

    // Pool validations
    for grade in &config.pool.excluded_grades {
        if Grade::parse(grade).is_none() {
            return Err(invalid(
                "pool.excluded_grades",
                format!("unrecognized letter grade '{grade}'"),
            ));
        }
    }

    // Scoring validations
    if config.scoring.blends.is_empty() {
        return Err(invalid("scoring.blends", "at least one blend is required"));
    }
    for (i, blend) in config.scoring.blends.iter().enumerate() {
        let weights = [blend.projection_weight, blend.average_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(
                &format!("scoring.blends[{i}]"),
                format!("weights must be finite and >= 0, got {blend}"),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(invalid(
                &format!("scoring.blends[{i}]"),
                "weights must not both be zero",
            ));
        }
    }

    // Solver validations
    let limit = config.solver.time_limit_secs;
    if !limit.is_finite() || limit <= 0.0 || limit > MAX_TIME_LIMIT_SECS {
        return Err(invalid(
            "solver.time_limit_secs",
            format!("must be > 0 and at most {MAX_TIME_LIMIT_SECS}, got {limit}"),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
