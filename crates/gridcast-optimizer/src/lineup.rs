// Slot labelling for a solved roster, in contest display order.

use serde::Serialize;
use std::fmt;

use gridcast_core::candidate::Candidate;
use gridcast_core::position::Position;
use gridcast_core::roster::RosterTemplate;

/// The slot a rostered candidate occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    Dedicated(Position),
    Flex,
}

impl Slot {
    /// QB, RB, WR, TE, FLEX, DST.
    fn display_order(&self) -> usize {
        match self {
            Slot::Dedicated(Position::Defense) => 6,
            Slot::Flex => 5,
            Slot::Dedicated(pos) => pos.index(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Dedicated(pos) => write!(f, "{pos}"),
            Slot::Flex => write!(f, "FLEX"),
        }
    }
}

/// Assign each player a slot.
///
/// Slot assignment priority, best projection first within a position:
/// 1. Dedicated position slot, up to the template minimum
/// 2. Flex slot (RB/WR/TE only)
/// 3. Dedicated slot beyond the minimum (only reachable through locks)
pub fn assign_slots<'a>(
    players: &'a [Candidate],
    template: &RosterTemplate,
) -> Vec<(Slot, &'a Candidate)> {
    let mut ordered: Vec<&Candidate> = players.iter().collect();
    ordered.sort_by(|a, b| {
        a.position
            .index()
            .cmp(&b.position.index())
            .then(b.projected_points.total_cmp(&a.projected_points))
    });

    let mut dedicated = [0u32; 5];
    let mut flex_used = 0;
    let flex_slots = template.flex_slots();

    let mut slots: Vec<(Slot, &Candidate)> = ordered
        .into_iter()
        .map(|player| {
            let pos = player.position;
            if dedicated[pos.index()] < template.minimums.get(pos) {
                dedicated[pos.index()] += 1;
                (Slot::Dedicated(pos), player)
            } else if pos.is_flex_eligible() && flex_used < flex_slots {
                flex_used += 1;
                (Slot::Flex, player)
            } else {
                (Slot::Dedicated(pos), player)
            }
        })
        .collect();

    slots.sort_by_key(|(slot, _)| slot.display_order());
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcast_core::candidate::CandidateRow;

    use crate::normalize::{normalize_pool, QualityFilter};

    fn players(rows: Vec<CandidateRow>) -> Vec<Candidate> {
        normalize_pool(&rows, None, &QualityFilter::none()).candidates
    }

    #[test]
    fn classic_lineup_order() {
        let roster = players(vec![
            CandidateRow::new("Def", "DST", 3000, 8.0),
            CandidateRow::new("Wr1", "WR", 5500, 16.0),
            CandidateRow::new("Rb3", "RB", 3000, 9.0),
            CandidateRow::new("Qb", "QB", 7000, 25.0),
            CandidateRow::new("Rb1", "RB", 6000, 18.0),
            CandidateRow::new("Wr2", "WR", 5000, 14.0),
            CandidateRow::new("Te", "TE", 4000, 10.0),
            CandidateRow::new("Rb2", "RB", 5000, 15.0),
            CandidateRow::new("Wr3", "WR", 4500, 13.0),
        ]);
        let lineup = assign_slots(&roster, &RosterTemplate::CLASSIC);
        let labels: Vec<String> = lineup
            .iter()
            .map(|(slot, p)| format!("{slot}:{}", p.name))
            .collect();
        assert_eq!(
            labels,
            vec![
                "QB:Qb", "RB:Rb1", "RB:Rb2", "WR:Wr1", "WR:Wr2", "WR:Wr3", "TE:Te", "FLEX:Rb3",
                "DST:Def"
            ]
        );
    }

    #[test]
    fn extra_quarterback_keeps_position_label() {
        let roster = players(vec![
            CandidateRow::new("Qb1", "QB", 7000, 25.0),
            CandidateRow::new("Qb2", "QB", 6000, 20.0),
        ]);
        let lineup = assign_slots(&roster, &RosterTemplate::CLASSIC);
        assert!(lineup.iter().all(|(slot, _)| *slot == Slot::Dedicated(Position::Quarterback)));
    }
}
