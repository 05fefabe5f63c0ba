// Roster template: slot count, salary cap and per-position quotas.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::Position;

/// A count per position (QB, RB, WR, TE, DST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quotas {
    counts: [u32; 5],
}

impl Quotas {
    pub const fn new(qb: u32, rb: u32, wr: u32, te: u32, dst: u32) -> Self {
        Quotas {
            counts: [qb, rb, wr, te, dst],
        }
    }

    pub fn get(&self, pos: Position) -> u32 {
        self.counts[pos.index()]
    }

    /// Copy with one position's count replaced.
    pub fn with(mut self, pos: Position, count: u32) -> Self {
        self.counts[pos.index()] = count;
        self
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        Position::ALL.iter().map(move |&pos| (pos, self.get(pos)))
    }
}

impl fmt::Display for Quotas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(pos, n)| format!("{pos}={n}")).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// The fixed contest template a lineup must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterTemplate {
    pub total_slots: u32,
    pub budget_cap: u32,
    pub minimums: Quotas,
}

impl RosterTemplate {
    /// Nine slots, $50,000 cap: 1 QB, 2+ RB, 3+ WR, 1+ TE, 1 DST and one flex.
    pub const CLASSIC: RosterTemplate = RosterTemplate {
        total_slots: 9,
        budget_cap: 50_000,
        minimums: Quotas::new(1, 2, 3, 1, 1),
    };

    /// Slots not tied to a position minimum.
    pub fn flex_slots(&self) -> u32 {
        self.total_slots.saturating_sub(self.minimums.total())
    }
}

impl Default for RosterTemplate {
    fn default() -> Self {
        RosterTemplate::CLASSIC
    }
}
