//! Damage resolution: armor mitigation, shield domes, base shields.
//!
//! Melee ignores armor. Ranged and ability damage is scaled by
//! `1 - armor / (armor + ARMOR_CONSTANT)`. A shield dome on the target's
//! side multiplies ranged and melee damage; overlapping domes take the
//! strongest multiplier. An active base shield blocks everything.

use hecs::World;

use skirmish_core::components::{Base, Dying, Effects, Health, Structure, Unit};
use skirmish_core::constants::ARMOR_CONSTANT;
use skirmish_core::defs::{base_def, structure_def, unit_def};
use skirmish_core::enums::DamageKind;
use skirmish_core::events::SimEvent;
use skirmish_core::types::{PlayerId, Position};
use skirmish_core::Vec2;

use crate::projectile::TargetRef;

/// Fraction of ranged/ability damage that gets through `armor`.
pub fn armor_factor(armor: f32) -> f32 {
    if armor <= 0.0 {
        1.0
    } else {
        1.0 - armor / (armor + ARMOR_CONSTANT)
    }
}

/// Final damage for one hit.
pub fn mitigate(base: f32, armor: f32, kind: DamageKind, shield_multiplier: f32) -> f32 {
    let armored = match kind {
        DamageKind::Melee => base,
        DamageKind::Ranged | DamageKind::Ability => base * armor_factor(armor),
    };
    armored * shield_multiplier
}

/// Strongest dome multiplier covering `pos` for damage of `kind` aimed at
/// something owned by `owner`. 1.0 when no dome applies.
pub fn dome_multiplier(world: &World, owner: PlayerId, pos: Vec2, kind: DamageKind, now: f64) -> f32 {
    if kind == DamageKind::Ability {
        return 1.0;
    }
    let mut best = 1.0_f32;
    for (_entity, (unit, provider, effects)) in world
        .query::<(&Unit, &Position, &Effects)>()
        .without::<&Dying>()
        .iter()
    {
        if unit.owner != owner {
            continue;
        }
        let Some(dome) = effects.shield_dome else {
            continue;
        };
        if dome.until <= now || provider.0.distance(pos) > dome.radius {
            continue;
        }
        let m = match kind {
            DamageKind::Melee => dome.melee_multiplier,
            _ => dome.ranged_multiplier,
        };
        best = best.min(m);
    }
    best
}

/// Apply one hit to a target. Returns the damage actually dealt.
pub fn apply_hit(
    world: &mut World,
    target: TargetRef,
    amount: f32,
    kind: DamageKind,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> f32 {
    match target {
        TargetRef::Unit(e) => {
            if world.get::<&Dying>(e).is_ok() {
                return 0.0;
            }
            let (owner, pos, armor) = match (world.get::<&Unit>(e), world.get::<&Position>(e)) {
                (Ok(unit), Ok(pos)) => (unit.owner, pos.0, unit_def(unit.kind).armor),
                _ => return 0.0,
            };
            let mult = dome_multiplier(world, owner, pos, kind, now);
            let dealt = mitigate(amount, armor, kind, mult);
            if let Ok(mut health) = world.get::<&mut Health>(e) {
                health.current -= dealt;
            }
            dealt
        }
        TargetRef::Base(e) => {
            let (owner, pos, base_kind, shielded) = match (world.get::<&Base>(e), world.get::<&Position>(e)) {
                (Ok(base), Ok(pos)) if base.hp > 0.0 => (
                    base.owner,
                    pos.0,
                    base.kind,
                    base.shield_until.is_some_and(|t| now < t),
                ),
                _ => return 0.0,
            };
            if shielded {
                events.push(SimEvent::ShieldBlocked { owner, amount });
                return 0.0;
            }
            let mult = dome_multiplier(world, owner, pos, kind, now);
            let dealt = mitigate(amount, base_def(base_kind).armor, kind, mult);
            if let Ok(mut base) = world.get::<&mut Base>(e) {
                base.hp = (base.hp - dealt).max(0.0);
                events.push(SimEvent::BaseDamaged {
                    owner,
                    amount: dealt,
                    remaining: base.hp,
                });
            }
            dealt
        }
        TargetRef::Structure(e) => {
            let (owner, pos, structure_kind) =
                match (world.get::<&Structure>(e), world.get::<&Position>(e)) {
                    (Ok(s), Ok(pos)) if s.hp > 0.0 => (s.owner, pos.0, s.kind),
                    _ => return 0.0,
                };
            let mult = dome_multiplier(world, owner, pos, kind, now);
            let dealt = mitigate(amount, structure_def(structure_kind).armor, kind, mult);
            if let Ok(mut s) = world.get::<&mut Structure>(e) {
                s.hp = (s.hp - dealt).max(0.0);
            }
            dealt
        }
    }
}

/// Area damage against everything hostile to `owner` inside a circle.
#[derive(Debug, Clone, Copy)]
pub struct AreaDamage {
    pub owner: PlayerId,
    pub center: Vec2,
    pub radius: f32,
    pub amount: f32,
    pub kind: DamageKind,
    /// Restrict hits to the half-plane in front of this direction.
    pub facing: Option<Vec2>,
    pub hits_buildings: bool,
}

/// Apply area damage. Returns the number of targets hit.
pub fn apply_area(world: &mut World, area: &AreaDamage, now: f64, events: &mut Vec<SimEvent>) -> usize {
    let in_arc = |p: Vec2| area.facing.map_or(true, |f| (p - area.center).dot(f) >= 0.0);
    let mut targets = Vec::new();

    for (entity, (unit, pos)) in world.query::<(&Unit, &Position)>().without::<&Dying>().iter() {
        let reach = area.radius + unit_def(unit.kind).radius;
        if unit.owner != area.owner && pos.0.distance(area.center) <= reach && in_arc(pos.0) {
            targets.push(TargetRef::Unit(entity));
        }
    }
    if area.hits_buildings {
        for (entity, (base, pos)) in world.query::<(&Base, &Position)>().iter() {
            let reach = area.radius + base_def(base.kind).radius;
            if base.owner != area.owner && base.hp > 0.0 && pos.0.distance(area.center) <= reach {
                targets.push(TargetRef::Base(entity));
            }
        }
        for (entity, (s, pos)) in world.query::<(&Structure, &Position)>().iter() {
            let reach = area.radius + structure_def(s.kind).radius;
            if s.owner != area.owner && s.hp > 0.0 && pos.0.distance(area.center) <= reach {
                targets.push(TargetRef::Structure(entity));
            }
        }
    }

    for target in &targets {
        apply_hit(world, *target, area.amount, area.kind, now, events);
    }
    targets.len()
}
