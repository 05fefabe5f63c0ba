// Recoverable issues raised while building a roster. These are returned
// alongside the result instead of failing the call.

use serde::{Deserialize, Serialize};
use std::fmt;

use gridcast_core::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A row was dropped during normalization (no salary, unknown position).
    MalformedCandidate { name: String, reason: String },
    /// A later row normalized to a name already in the pool; the first row wins.
    DuplicateCandidate { name: String },
    /// A locked name matched nothing in the filtered pool.
    UnknownLockedPlayer { name: String },
    /// A locked name was already forced into the roster.
    DuplicateLock { name: String },
    /// A lock landed on a position whose minimum was already zero.
    QuotaExhausted { name: String, position: Position },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedCandidate { name, reason } => {
                write!(f, "skipped candidate '{name}': {reason}")
            }
            Warning::DuplicateCandidate { name } => {
                write!(f, "duplicate candidate '{name}' ignored; keeping the first row")
            }
            Warning::UnknownLockedPlayer { name } => {
                write!(f, "locked player '{name}' not found in the pool; lock skipped")
            }
            Warning::DuplicateLock { name } => {
                write!(f, "'{name}' is already locked into the roster")
            }
            Warning::QuotaExhausted { name, position } => write!(
                f,
                "locked {position} '{name}' exceeds the {position} quota; included anyway"
            ),
        }
    }
}
