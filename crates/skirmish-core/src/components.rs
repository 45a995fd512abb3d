//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in the simulation's
//! systems, not here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{PlayerId, UnitId};

/// Identity of a unit entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub owner: PlayerId,
}

/// Hit points. `displayed` trails `current` for the health bar only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub displayed: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self {
            current: max,
            max,
            displayed: max,
        }
    }
}

/// Mutable combat state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Seconds until the next regular attack may fire.
    pub attack_cooldown: f32,
    /// Seconds until the ability may be cast again.
    pub ability_cooldown: f32,
    /// Multiplier on outgoing damage earned through promotion.
    pub damage_multiplier: f32,
    /// Distance-traveled credit toward the next promotion.
    pub promotion_credit: f32,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            attack_cooldown: 0.0,
            ability_cooldown: 0.0,
            damage_multiplier: 1.0,
            promotion_credit: 0.0,
        }
    }
}

/// Kinematic and steering state of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Facing angle in radians.
    pub rotation: f32,
    /// Current speed (0 when idle).
    pub speed: f32,
    /// Unit heading this frame (zero when not moving).
    pub heading: Vec2,
    /// Flocking force from the previous frame, for smoothing.
    pub prev_flock_force: Vec2,
    /// Offset applied by the last jitter micro-step.
    pub jitter_offset: Vec2,
}

/// Stuck-detection bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StuckState {
    /// Position at the last progress sample.
    pub anchor: Vec2,
    /// Seconds since the last progress sample.
    pub timer: f32,
    /// Phase angle of the circular jitter search.
    pub jitter_phase: f32,
    pub jittering: bool,
}

/// Shield dome raised around a unit. Allies inside take reduced damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldDome {
    pub radius: f32,
    pub ranged_multiplier: f32,
    pub melee_multiplier: f32,
    pub until: f64,
}

/// Which delayed-impact ability produced an impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactKind {
    Bombardment,
    OrbitalStrike,
}

/// How a delayed impact deals its damage inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ImpactMode {
    /// Damage per second for every frame inside the window.
    Continuous { dps: f32 },
    /// One hit, applied on the first frame inside the window.
    Instant { damage: f32, resolved: bool },
}

/// Telegraphed area impact: nothing happens before `impact_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayedImpact {
    pub kind: ImpactKind,
    pub target: Vec2,
    pub radius: f32,
    pub impact_at: f64,
    pub end_at: f64,
    pub mode: ImpactMode,
}

/// Three-swing melee combo in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwordCombo {
    /// Facing of the combo; semicircle swings hit in front of it.
    pub direction: Vec2,
    /// Swing number (1..=3) that starts next; 4 once all swings began.
    pub next_swing: u8,
    pub next_swing_at: f64,
    /// Swing currently animating, if any.
    pub active_swing: Option<u8>,
    pub active_until: f64,
    /// Set after swing 3; no new combo may start before this time.
    pub reset_until: Option<f64>,
}

/// Reveal, knife throw, recloak sequence of a Shade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StealthStrike {
    pub target: Vec2,
    pub knife_at: f64,
    pub recloak_at: f64,
    pub knife_thrown: bool,
}

/// Timed volley of missiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileBarrage {
    pub target: Vec2,
    pub volleys_left: u8,
    pub next_volley_at: f64,
    pub fired: u8,
}

/// Visual marker of a heal pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealPulse {
    pub radius: f32,
    pub until: f64,
}

/// Temporary stat change; reverted when `until` passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBuff {
    pub speed_multiplier: f32,
    pub damage_multiplier: f32,
    pub until: f64,
}

/// Visual marker of a melee attack, for swing animation timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeAttackEffect {
    pub target: Vec2,
    /// Alternates 1, 2, 3 across consecutive attacks.
    pub swing: u8,
    pub until: f64,
}

/// A unit shoved aside to let a teammate pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avoidance {
    pub origin: Vec2,
    pub return_at: f64,
}

/// Bag of optional transient effect states on a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub cloaked: bool,
    pub shield_dome: Option<ShieldDome>,
    pub delayed_impact: Option<DelayedImpact>,
    pub sword_combo: Option<SwordCombo>,
    pub stealth_strike: Option<StealthStrike>,
    pub missile_barrage: Option<MissileBarrage>,
    pub heal_pulse: Option<HealPulse>,
    pub stat_buff: Option<StatBuff>,
    pub melee_attack: Option<MeleeAttackEffect>,
    pub avoidance: Option<Avoidance>,
}

impl Effects {
    pub fn speed_multiplier(&self) -> f32 {
        self.stat_buff.map_or(1.0, |b| b.speed_multiplier)
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.stat_buff.map_or(1.0, |b| b.damage_multiplier)
    }
}

/// Marks a unit whose hp reached zero. It is no longer simulated or
/// targetable and is despawned once the grace period ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dying {
    pub since: f64,
}

/// Laser shot visual from a base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserBeam {
    pub from: Vec2,
    pub to: Vec2,
    pub until: f64,
}

/// A player's base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub kind: BaseKind,
    pub owner: PlayerId,
    pub hp: f32,
    pub max_hp: f32,
    /// Where a mobile base is walking to.
    pub move_target: Option<Vec2>,
    /// Active shield blocks all damage until this time.
    pub shield_until: Option<f64>,
    /// Earliest time the shield may be raised again.
    pub shield_ready_at: f64,
    pub laser_cooldown: f32,
    pub laser_beam: Option<LaserBeam>,
}

/// A player-built structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub owner: PlayerId,
    pub hp: f32,
    pub max_hp: f32,
    pub attack_cooldown: f32,
}

/// Per-player economy and roster state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub photons: f64,
    /// Unit kinds this player may spawn.
    pub enabled_units: Vec<UnitKind>,
}
