//! Frame-cycle phases

use crate::error::CadenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point in the repeating frame cycle at which registered targets are called.
///
/// Each phase owns an independent registry; phases never share state.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Once per frame, variable delta
    Update,
    /// Once per frame after `Update`, variable delta
    LateUpdate,
    /// Zero or more times per frame at a fixed interval
    FixedUpdate,
    /// Once per frame after `LateUpdate`, before the next `Update`
    PostLateUpdate,
}

impl Phase {
    /// All phases, in the order a frame runs them
    pub const ALL: [Phase; 4] = [
        Phase::Update,
        Phase::LateUpdate,
        Phase::FixedUpdate,
        Phase::PostLateUpdate,
    ];

    /// Number of phases
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index, stable for the lifetime of the process
    pub fn index(self) -> usize {
        match self {
            Phase::Update => 0,
            Phase::LateUpdate => 1,
            Phase::FixedUpdate => 2,
            Phase::PostLateUpdate => 3,
        }
    }

    /// Whether this phase ticks with the fixed timestep rather than the frame delta
    pub fn is_fixed_rate(self) -> bool {
        matches!(self, Phase::FixedUpdate)
    }

    /// The snake_case name used in config files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Update => "update",
            Phase::LateUpdate => "late_update",
            Phase::FixedUpdate => "fixed_update",
            Phase::PostLateUpdate => "post_late_update",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CadenceError::UnknownPhase(s.to_string()))
    }
}
