// Contest period: a season year and a regular-season week.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last week of the regular season.
pub const MAX_WEEK: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub week: u32,
}

impl Period {
    pub fn new(year: i32, week: u32) -> Self {
        Period { year, week }
    }

    /// The season year according to the local clock.
    pub fn current_year() -> i32 {
        chrono::Local::now().year()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} week {}", self.year, self.week)
    }
}
