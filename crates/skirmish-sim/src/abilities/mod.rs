//! Ability system.
//!
//! Each unit kind with a special ability registers an [`Ability`]. Casting
//! is pure: `execute` turns an [`AbilityContext`] into a list of
//! [`AbilityEffect`]s, which the engine then applies to the world. Effects
//! that play out over time (telegraphed impacts, combos, reveal strikes,
//! volleys) are timestamp fields on the caster's `Effects`, polled every
//! frame by [`advance`].

mod barrage;
mod delayed;
mod stealth;
mod support;
mod sword;

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::{debug, trace};

use skirmish_core::components::*;
use skirmish_core::constants::IMPACT_MARKER_SECS;
use skirmish_core::defs::unit_def;
use skirmish_core::enums::{DamageKind, UnitKind};
use skirmish_core::events::SimEvent;
use skirmish_core::state::ImpactMarker;
use skirmish_core::types::{PlayerId, Position, UnitId};
use skirmish_core::Vec2;

use crate::damage::{self, AreaDamage};
use crate::projectile::{Launch, ProjectileSet};
use crate::systems::command_queue::PendingCast;

pub use barrage::MissileBarrageAbility;
pub use delayed::{Bombardment, OrbitalStrike};
pub use stealth::StealthStrikeAbility;
pub use support::{Grenade, HealPulseAbility, Rally, ShieldDomeAbility};
pub use sword::SwordComboAbility;

/// Everything an ability may read when it is cast.
#[derive(Debug, Clone, Copy)]
pub struct AbilityContext {
    pub caster: UnitId,
    pub kind: UnitKind,
    pub owner: PlayerId,
    /// Caster position at cast time.
    pub position: Vec2,
    /// The ability node's anchor point.
    pub anchor: Vec2,
    /// The ability node's aim offset from `anchor`.
    pub direction: Option<Vec2>,
    pub now: f64,
    /// Promotion and buff multipliers combined.
    pub damage_multiplier: f32,
    /// Caster's current effect states, for in-progress checks.
    pub effects: Effects,
}

impl AbilityContext {
    fn usable_direction(&self) -> Option<Vec2> {
        self.direction
            .filter(|d| d.is_finite() && d.length_squared() > f32::EPSILON)
    }

    /// Aim point `anchor + direction`, clamped to `range`.
    pub fn aim_point(&self, range: f32) -> Option<Vec2> {
        self.usable_direction()
            .map(|d| self.anchor + d.clamp_length_max(range))
    }

    /// Unit-length facing taken from the aim offset.
    pub fn facing(&self) -> Option<Vec2> {
        self.usable_direction().map(|d| d.normalize())
    }
}

/// A change to the world requested by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    Telegraph(DelayedImpact),
    BeginCombo(SwordCombo),
    /// Breaks the caster's cloak immediately.
    BeginStealthStrike(StealthStrike),
    BeginBarrage(MissileBarrage),
    RaiseDome(ShieldDome),
    /// Instant ability damage to enemies in a circle.
    Blast { center: Vec2, radius: f32, damage: f32 },
    /// Instant heal of allies in a circle.
    Heal {
        center: Vec2,
        radius: f32,
        amount: f32,
        visual_until: f64,
    },
    /// Timed stat buff on allies in a circle; reverted when it expires.
    Buff {
        center: Vec2,
        radius: f32,
        buff: StatBuff,
    },
}

pub trait Ability: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve a cast. An empty list means the cast was a no-op.
    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect>;
}

/// Ability implementations keyed by unit kind.
pub struct AbilityRegistry {
    abilities: HashMap<UnitKind, Box<dyn Ability>>,
}

impl AbilityRegistry {
    pub fn empty() -> Self {
        Self {
            abilities: HashMap::new(),
        }
    }

    /// The standard roster. Grunts and Snipers have no ability.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(UnitKind::Rifleman, Grenade);
        registry.register(UnitKind::Artillery, Bombardment);
        registry.register(UnitKind::Swordsman, SwordComboAbility);
        registry.register(UnitKind::Shade, StealthStrikeAbility);
        registry.register(UnitKind::Guardian, ShieldDomeAbility);
        registry.register(UnitKind::Medic, HealPulseAbility);
        registry.register(UnitKind::Herald, Rally);
        registry.register(UnitKind::Drone, MissileBarrageAbility);
        registry.register(UnitKind::Uplink, OrbitalStrike);
        registry
    }

    pub fn register(&mut self, kind: UnitKind, ability: impl Ability + 'static) {
        self.abilities.insert(kind, Box::new(ability));
    }

    pub fn get(&self, kind: UnitKind) -> Option<&dyn Ability> {
        self.abilities.get(&kind).map(|a| a.as_ref())
    }
}

impl Default for AbilityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cast the abilities whose nodes completed this frame. A cast on cooldown,
/// without a registered ability, or that produces no effects does nothing.
pub fn cast(
    world: &mut World,
    registry: &AbilityRegistry,
    casts: Vec<PendingCast>,
    now: f64,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    for pending in casts {
        let (unit, position, combat, effects) = match world
            .query_one_mut::<(&Unit, &Position, &CombatState, &Effects)>(pending.caster)
        {
            Ok((unit, pos, combat, effects)) => (*unit, pos.0, *combat, *effects),
            Err(_) => continue,
        };
        if combat.ability_cooldown > 0.0 {
            trace!(unit = unit.id.0, "ability on cooldown");
            continue;
        }
        let Some(ability) = registry.get(unit.kind) else {
            continue;
        };

        let ctx = AbilityContext {
            caster: unit.id,
            kind: unit.kind,
            owner: unit.owner,
            position,
            anchor: pending.anchor,
            direction: pending.direction,
            now,
            damage_multiplier: combat.damage_multiplier * effects.damage_multiplier(),
            effects,
        };
        let produced = ability.execute(&ctx);
        if produced.is_empty() {
            trace!(unit = unit.id.0, ability = ability.name(), "cast was a no-op");
            continue;
        }

        if let Ok(mut c) = world.get::<&mut CombatState>(pending.caster) {
            c.ability_cooldown = unit_def(unit.kind).ability_cooldown;
        }
        events.push(SimEvent::AbilityCast {
            unit: unit.id,
            kind: unit.kind,
            position,
        });
        debug!(unit = unit.id.0, ability = ability.name(), "ability cast");

        for effect in produced {
            apply_effect(world, pending.caster, &ctx, effect, events, impacts);
        }
    }
}

fn apply_effect(
    world: &mut World,
    caster: Entity,
    ctx: &AbilityContext,
    effect: AbilityEffect,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    match effect {
        AbilityEffect::Telegraph(impact) => {
            with_effects(world, caster, |fx| fx.delayed_impact = Some(impact))
        }
        AbilityEffect::BeginCombo(combo) => {
            with_effects(world, caster, |fx| fx.sword_combo = Some(combo))
        }
        AbilityEffect::BeginStealthStrike(strike) => with_effects(world, caster, |fx| {
            fx.cloaked = false;
            fx.stealth_strike = Some(strike);
        }),
        AbilityEffect::BeginBarrage(barrage) => {
            with_effects(world, caster, |fx| fx.missile_barrage = Some(barrage))
        }
        AbilityEffect::RaiseDome(dome) => {
            with_effects(world, caster, |fx| fx.shield_dome = Some(dome))
        }
        AbilityEffect::Blast {
            center,
            radius,
            damage: amount,
        } => {
            let area = AreaDamage {
                owner: ctx.owner,
                center,
                radius,
                amount,
                kind: DamageKind::Ability,
                facing: None,
                hits_buildings: true,
            };
            damage::apply_area(world, &area, ctx.now, events);
            impacts.push(ImpactMarker {
                position: center,
                radius,
                remaining: IMPACT_MARKER_SECS,
            });
        }
        AbilityEffect::Heal {
            center,
            radius,
            amount,
            visual_until,
        } => {
            for (_entity, (unit, pos, health)) in world
                .query_mut::<(&Unit, &Position, &mut Health)>()
                .without::<&Dying>()
            {
                if unit.owner == ctx.owner && pos.0.distance(center) <= radius {
                    health.current = (health.current + amount).min(health.max);
                }
            }
            with_effects(world, caster, |fx| {
                fx.heal_pulse = Some(HealPulse {
                    radius,
                    until: visual_until,
                })
            });
        }
        AbilityEffect::Buff {
            center,
            radius,
            buff,
        } => {
            for (_entity, (unit, pos, fx)) in world
                .query_mut::<(&Unit, &Position, &mut Effects)>()
                .without::<&Dying>()
            {
                if unit.owner == ctx.owner && pos.0.distance(center) <= radius {
                    fx.stat_buff = Some(buff);
                }
            }
        }
    }
}

fn with_effects(world: &mut World, entity: Entity, f: impl FnOnce(&mut Effects)) {
    if let Ok(mut fx) = world.get::<&mut Effects>(entity) {
        f(&mut *fx);
    }
}

/// Caster state handed to the per-frame advance of each timed ability.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Caster {
    pub unit: Unit,
    pub position: Vec2,
    pub now: f64,
    pub dt: f32,
    pub damage_multiplier: f32,
}

/// World changes produced while advancing timed abilities.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    Area(AreaDamage),
    Launch(Launch),
    Impact(ImpactMarker),
}

/// Poll every in-progress timed ability and apply what came due.
pub fn advance(
    world: &mut World,
    now: f64,
    dt: f32,
    projectiles: &mut ProjectileSet,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    let mut actions = Vec::new();

    for (_entity, (unit, pos, combat, effects)) in world
        .query_mut::<(&Unit, &Position, &CombatState, &mut Effects)>()
        .without::<&Dying>()
    {
        if !pos.0.is_finite() {
            continue;
        }
        let caster = Caster {
            unit: *unit,
            position: pos.0,
            now,
            dt,
            damage_multiplier: combat.damage_multiplier * effects.damage_multiplier(),
        };
        delayed::advance(&mut effects.delayed_impact, &caster, &mut actions);
        sword::advance(&mut effects.sword_combo, &caster, &mut actions, events);
        stealth::advance(effects, &caster, &mut actions, events);
        barrage::advance(&mut effects.missile_barrage, &caster, &mut actions);
    }

    for action in actions {
        match action {
            Action::Area(area) => {
                damage::apply_area(world, &area, now, events);
            }
            Action::Launch(launch) => {
                events.push(SimEvent::ProjectileFired {
                    owner: launch.owner,
                    kind: launch.kind,
                    from: launch.from,
                });
                projectiles.launch(launch);
            }
            Action::Impact(marker) => impacts.push(marker),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context(kind: UnitKind, direction: Option<Vec2>) -> AbilityContext {
    AbilityContext {
        caster: UnitId(1),
        kind,
        owner: PlayerId(0),
        position: Vec2::new(100.0, 100.0),
        anchor: Vec2::new(100.0, 100.0),
        direction,
        now: 10.0,
        damage_multiplier: 1.0,
        effects: Effects::default(),
    }
}
