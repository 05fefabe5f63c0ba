// Per-call selection options.

use serde::{Deserialize, Serialize};

use gridcast_core::blend::ScoringBlend;

/// Caller input for one optimization call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Team token forcing a specific defense into the roster.
    pub locked_defense: Option<String>,
    /// Names forced into the roster, applied in order.
    pub locked_players: Vec<String>,
    /// Names removed from the pool before any locking.
    pub excluded_players: Vec<String>,
    /// `None` means the primary projection is used unmodified.
    pub scoring_blend: Option<ScoringBlend>,
    /// Require exactly the minimum number of tight ends (no TE in the flex).
    pub one_te: bool,
}

impl SelectionRequest {
    pub fn new() -> Self {
        SelectionRequest::default()
    }

    /// Lock a defense by team token. A blank token clears the lock.
    pub fn lock_defense(mut self, team: &str) -> Self {
        let team = team.trim();
        self.locked_defense = if team.is_empty() {
            None
        } else {
            Some(team.to_string())
        };
        self
    }

    pub fn lock(mut self, name: &str) -> Self {
        self.locked_players.push(name.to_string());
        self
    }

    pub fn exclude(mut self, name: &str) -> Self {
        self.excluded_players.push(name.to_string());
        self
    }

    pub fn with_blend(mut self, blend: ScoringBlend) -> Self {
        self.scoring_blend = Some(blend);
        self
    }

    pub fn one_te(mut self, one_te: bool) -> Self {
        self.one_te = one_te;
        self
    }

    /// The defense token, if one is set and non-blank.
    pub fn defense_token(&self) -> Option<&str> {
        self.locked_defense
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
