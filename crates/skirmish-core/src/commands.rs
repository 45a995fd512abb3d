//! Commands pushed into the simulation by input handling or multiplayer
//! replay.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::orders::CommandNode;
use crate::types::{PlayerId, UnitId};

/// All possible inbound actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Match control ---
    /// Place bases and start the match.
    StartMatch,
    Pause,
    Resume,

    // --- Units ---
    /// Spawn a unit near `spawn_pos` that walks to `rally_pos`.
    Spawn {
        owner: PlayerId,
        kind: UnitKind,
        spawn_pos: Vec2,
        rally_pos: Vec2,
    },
    /// Give a unit a command node.
    Order {
        unit: UnitId,
        node: CommandNode,
        #[serde(default)]
        mode: QueueMode,
    },
    /// Fade out a unit's queue.
    CancelQueue { unit: UnitId },

    // --- Bases & structures ---
    /// Walk a mobile base toward a point.
    MoveBase { owner: PlayerId, target: Vec2 },
    /// Raise the base shield if it is off cooldown.
    RaiseBaseShield { owner: PlayerId },
    /// Build a structure at a point.
    Build {
        owner: PlayerId,
        kind: StructureKind,
        position: Vec2,
    },
}
