//! Static definitions for unit, base and structure classes.
//!
//! Definitions are plain `Copy` data looked up by kind. Mutable per-entity
//! state lives in components; anything that never changes lives here.

use serde::{Deserialize, Serialize};

use crate::enums::{AttackKind, BaseKind, StructureKind, UnitKind};

/// Static definition of a unit class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    /// Photon cost to spawn.
    pub cost: f64,
    pub hp: f32,
    pub armor: f32,
    pub move_speed: f32,
    /// Collision radius.
    pub radius: f32,
    pub attack: AttackKind,
    pub attack_range: f32,
    /// Attacks per second; cooldown is `1 / attack_rate`.
    pub attack_rate: f32,
    pub attack_damage: f32,
    /// Projectile speed for ranged attacks that are not hitscan.
    pub projectile_speed: f32,
    /// Ranged attack resolves instantly with no projectile.
    pub hitscan: bool,
    /// May fall back to attacking bases and structures.
    pub can_hit_structures: bool,
    /// Seconds between ability uses.
    pub ability_cooldown: f32,
    pub flying: bool,
    pub small: bool,
    pub starts_cloaked: bool,
    /// Area damage dealt once when the unit dies (0 = none).
    pub death_burst_damage: f32,
}

impl UnitDef {
    pub fn attack_cooldown(&self) -> f32 {
        if self.attack_rate <= 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.attack_rate
        }
    }

    pub fn is_melee(&self) -> bool {
        self.attack == AttackKind::Melee
    }

    pub fn is_ranged(&self) -> bool {
        self.attack == AttackKind::Ranged
    }
}

const UNIT_TEMPLATE: UnitDef = UnitDef {
    cost: 50.0,
    hp: 100.0,
    armor: 0.0,
    move_speed: 60.0,
    radius: 8.0,
    attack: AttackKind::None,
    attack_range: 0.0,
    attack_rate: 0.0,
    attack_damage: 0.0,
    projectile_speed: 0.0,
    hitscan: false,
    can_hit_structures: true,
    ability_cooldown: 0.0,
    flying: false,
    small: false,
    starts_cloaked: false,
    death_burst_damage: 0.0,
};

/// Look up the static definition for a unit kind.
pub fn unit_def(kind: UnitKind) -> UnitDef {
    match kind {
        UnitKind::Grunt => UnitDef {
            cost: 30.0,
            hp: 90.0,
            armor: 5.0,
            move_speed: 65.0,
            attack: AttackKind::Melee,
            attack_range: 18.0,
            attack_rate: 1.2,
            attack_damage: 10.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Rifleman => UnitDef {
            cost: 50.0,
            hp: 80.0,
            move_speed: 60.0,
            attack: AttackKind::Ranged,
            attack_range: 110.0,
            attack_rate: 1.0,
            attack_damage: 12.0,
            projectile_speed: 300.0,
            ability_cooldown: 8.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Sniper => UnitDef {
            cost: 80.0,
            hp: 60.0,
            move_speed: 50.0,
            attack: AttackKind::Ranged,
            attack_range: 220.0,
            attack_rate: 0.4,
            attack_damage: 45.0,
            hitscan: true,
            can_hit_structures: false,
            ..UNIT_TEMPLATE
        },
        UnitKind::Artillery => UnitDef {
            cost: 120.0,
            hp: 110.0,
            armor: 10.0,
            move_speed: 35.0,
            radius: 11.0,
            attack: AttackKind::Ranged,
            attack_range: 200.0,
            attack_rate: 0.35,
            attack_damage: 35.0,
            projectile_speed: 180.0,
            ability_cooldown: 14.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Swordsman => UnitDef {
            cost: 60.0,
            hp: 120.0,
            armor: 10.0,
            move_speed: 70.0,
            attack: AttackKind::Melee,
            attack_range: 20.0,
            attack_rate: 1.0,
            attack_damage: 16.0,
            ability_cooldown: 0.5,
            ..UNIT_TEMPLATE
        },
        UnitKind::Shade => UnitDef {
            cost: 90.0,
            hp: 70.0,
            move_speed: 75.0,
            attack: AttackKind::Ranged,
            attack_range: 90.0,
            attack_rate: 0.8,
            attack_damage: 14.0,
            projectile_speed: 320.0,
            ability_cooldown: 6.0,
            starts_cloaked: true,
            can_hit_structures: false,
            ..UNIT_TEMPLATE
        },
        UnitKind::Guardian => UnitDef {
            cost: 100.0,
            hp: 100.0,
            armor: 20.0,
            move_speed: 45.0,
            radius: 10.0,
            attack: AttackKind::Melee,
            attack_range: 20.0,
            attack_rate: 0.8,
            attack_damage: 12.0,
            ability_cooldown: 15.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Medic => UnitDef {
            cost: 70.0,
            hp: 70.0,
            move_speed: 60.0,
            ability_cooldown: 7.0,
            can_hit_structures: false,
            ..UNIT_TEMPLATE
        },
        UnitKind::Herald => UnitDef {
            cost: 80.0,
            hp: 80.0,
            move_speed: 60.0,
            attack: AttackKind::Ranged,
            attack_range: 80.0,
            attack_rate: 0.6,
            attack_damage: 6.0,
            projectile_speed: 260.0,
            ability_cooldown: 12.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Drone => UnitDef {
            cost: 70.0,
            hp: 50.0,
            move_speed: 95.0,
            radius: 6.0,
            attack: AttackKind::Ranged,
            attack_range: 100.0,
            attack_rate: 1.5,
            attack_damage: 6.0,
            projectile_speed: 340.0,
            ability_cooldown: 10.0,
            flying: true,
            small: true,
            death_burst_damage: 20.0,
            ..UNIT_TEMPLATE
        },
        UnitKind::Uplink => UnitDef {
            cost: 150.0,
            hp: 90.0,
            move_speed: 45.0,
            ability_cooldown: 25.0,
            can_hit_structures: false,
            ..UNIT_TEMPLATE
        },
    }
}

/// Static definition of a base class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseDef {
    pub hp: f32,
    pub armor: f32,
    /// Collision and targeting radius.
    pub radius: f32,
    pub mobile: bool,
    pub move_speed: f32,
    pub laser_range: f32,
    pub laser_damage: f32,
    /// Seconds between laser shots.
    pub laser_cooldown: f32,
}

pub fn base_def(kind: BaseKind) -> BaseDef {
    match kind {
        BaseKind::Citadel => BaseDef {
            hp: 1500.0,
            armor: 30.0,
            radius: 40.0,
            mobile: false,
            move_speed: 0.0,
            laser_range: 160.0,
            laser_damage: 20.0,
            laser_cooldown: 1.5,
        },
        BaseKind::Walker => BaseDef {
            hp: 1100.0,
            armor: 20.0,
            radius: 32.0,
            mobile: true,
            move_speed: 15.0,
            laser_range: 120.0,
            laser_damage: 15.0,
            laser_cooldown: 1.2,
        },
    }
}

/// Static definition of a structure class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureDef {
    pub cost: f64,
    pub hp: f32,
    pub armor: f32,
    pub radius: f32,
    pub attack_range: f32,
    /// Attacks per second (0 = does not attack).
    pub attack_rate: f32,
    pub attack_damage: f32,
    pub projectile_speed: f32,
    /// Photons per second added to the owner's income.
    pub income_bonus: f64,
}

pub fn structure_def(kind: StructureKind) -> StructureDef {
    match kind {
        StructureKind::Turret => StructureDef {
            cost: 100.0,
            hp: 300.0,
            armor: 15.0,
            radius: 14.0,
            attack_range: 130.0,
            attack_rate: 1.0,
            attack_damage: 14.0,
            projectile_speed: 320.0,
            income_bonus: 0.0,
        },
        StructureKind::Generator => StructureDef {
            cost: 120.0,
            hp: 200.0,
            armor: 10.0,
            radius: 16.0,
            attack_range: 0.0,
            attack_rate: 0.0,
            attack_damage: 0.0,
            projectile_speed: 0.0,
            income_bonus: crate::constants::GENERATOR_INCOME_PER_SEC,
        },
    }
}
