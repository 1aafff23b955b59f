//! Simulation error types.
//!
//! None of these are gameplay outcomes. Each variant is a broken contract
//! between the caller and the simulation, so callers should stop the run
//! rather than try to recover.

use std::fmt;

use crate::sim::GamePhase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A token was constructed with a level outside `[0, max)`.
    InvalidLevel { level: u8, max: usize },
    /// A play-phase step ran without an active token.
    MissingActiveToken { phase: GamePhase },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { level, max } => {
                write!(f, "token level {level} out of range (expected < {max})")
            }
            Self::MissingActiveToken { phase } => {
                write!(f, "no active token during {phase:?} step")
            }
        }
    }
}

impl std::error::Error for SimError {}
