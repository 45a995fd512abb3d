//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::PlayerId;

/// Unit class. Each kind has a static definition in `defs::unit_def`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Cheap melee infantry.
    Grunt,
    /// Standard ranged infantry; throws a grenade.
    Rifleman,
    /// Long-range hitscan marksman.
    Sniper,
    /// Slow siege unit; calls a delayed bombardment.
    Artillery,
    /// Melee duelist with a three-swing combo.
    Swordsman,
    /// Cloaked assassin; reveals itself to throw a knife.
    Shade,
    /// Armored melee unit that raises a shield dome.
    Guardian,
    /// Support unit with a heal pulse and no attack.
    Medic,
    /// Support unit with a timed rally buff.
    Herald,
    /// Small flying unit; fires a missile barrage.
    Drone,
    /// Support unit that calls an orbital strike.
    Uplink,
}

impl UnitKind {
    pub const ALL: [UnitKind; 11] = [
        UnitKind::Grunt,
        UnitKind::Rifleman,
        UnitKind::Sniper,
        UnitKind::Artillery,
        UnitKind::Swordsman,
        UnitKind::Shade,
        UnitKind::Guardian,
        UnitKind::Medic,
        UnitKind::Herald,
        UnitKind::Drone,
        UnitKind::Uplink,
    ];
}

/// Base class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseKind {
    /// Static fortress with a long-range laser.
    #[default]
    Citadel,
    /// Slow mobile base with a shorter laser.
    Walker,
}

/// Player-built structure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Auto-attacks enemy units with projectiles.
    Turret,
    /// Adds photon income while alive.
    Generator,
}

/// How a unit delivers its regular attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    /// Cannot attack.
    #[default]
    None,
    /// Instant damage in contact range; ignores armor.
    Melee,
    /// Projectile or hitscan; mitigated by armor.
    Ranged,
}

/// Damage category, used for armor and shield-dome mitigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    Melee,
    Ranged,
    Ability,
}

/// Projectile flavor; controls visuals and damage category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Standard,
    /// Thrown by a revealing Shade; deals ability damage.
    Knife,
    /// Fired by a missile barrage; deals ability damage.
    Missile,
}

/// Match lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for `StartMatch`.
    #[default]
    Setup,
    Active,
    Paused,
    Ended,
}

/// Match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(PlayerId),
    Draw,
}

/// How a new command node combines with an existing queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueMode {
    /// Clear the queue first.
    #[default]
    Replace,
    /// Append behind existing nodes.
    Append,
}

/// Obstacle category supplied by the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Static,
    /// Edge of the playable area.
    Boundary,
}
