//! Error types for rejected requests and per-unit faults.
//!
//! Neither kind ever escapes a frame. Requests return `false` at the public
//! surface; faults are logged and the unit is skipped.

use skirmish_core::enums::UnitKind;
use skirmish_core::types::{PlayerId, UnitId};

/// Why a spawn, build or order request was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("unknown player {0:?}")]
    UnknownPlayer(PlayerId),
    #[error("unit type {0:?} is not enabled for this player")]
    UnitTypeDisabled(UnitKind),
    #[error("insufficient photons: need {cost}, have {available}")]
    InsufficientPhotons { cost: f64, available: f64 },
    #[error("match is not active")]
    MatchNotActive,
    #[error("unknown or dead unit {0:?}")]
    UnknownUnit(UnitId),
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),
}

/// A unit whose state cannot be simulated this frame.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum UnitFault {
    #[error("unit {0:?} has a non-finite position")]
    NonFinitePosition(UnitId),
    #[error("unit {0:?} has non-finite hp")]
    NonFiniteHealth(UnitId),
}
