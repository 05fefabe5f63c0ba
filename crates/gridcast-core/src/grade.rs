// Start/sit letter grades attached to expert rankings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 13-level letter grade, best (A+) to worst (F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

/// Grades that are never eligible for a lineup by default.
pub const BOTTOM_TIER: [Grade; 4] = [Grade::DPlus, Grade::D, Grade::DMinus, Grade::F];

impl Grade {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "A-" => Some(Grade::AMinus),
            "B+" => Some(Grade::BPlus),
            "B" => Some(Grade::B),
            "B-" => Some(Grade::BMinus),
            "C+" => Some(Grade::CPlus),
            "C" => Some(Grade::C),
            "C-" => Some(Grade::CMinus),
            "D+" => Some(Grade::DPlus),
            "D" => Some(Grade::D),
            "D-" => Some(Grade::DMinus),
            "F" => Some(Grade::F),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_letter_grade() {
        let all = [
            "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
        ];
        for s in all {
            let grade = Grade::parse(s).unwrap_or_else(|| panic!("failed to parse {s}"));
            assert_eq!(grade.as_str(), s);
        }
    }

    #[test]
    fn parse_is_case_and_whitespace_tolerant() {
        assert_eq!(Grade::parse(" b+ "), Some(Grade::BPlus));
        assert_eq!(Grade::parse("f"), Some(Grade::F));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Grade::parse(""), None);
        assert_eq!(Grade::parse("E"), None);
        assert_eq!(Grade::parse("A++"), None);
    }

    #[test]
    fn ordering_runs_best_to_worst() {
        assert!(Grade::APlus < Grade::A);
        assert!(Grade::CMinus < Grade::DPlus);
        assert!(Grade::DMinus < Grade::F);
    }
}
