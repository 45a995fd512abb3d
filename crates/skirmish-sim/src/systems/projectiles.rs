//! Projectile system: integrate, detect hits, apply damage, recycle.
//!
//! A projectile lands when it comes within hit distance of its target
//! position or when its lifetime runs out. The locked target takes the hit
//! if it is still alive; otherwise the nearest enemy unit at the impact
//! point, then a base, then a structure.

use hecs::World;

use skirmish_core::components::{Base, Dying, Health, Structure};
use skirmish_core::constants::{IMPACT_MARKER_SECS, PROJECTILE_FALLBACK_RADIUS, PROJECTILE_HIT_DISTANCE};
use skirmish_core::events::SimEvent;
use skirmish_core::state::ImpactMarker;
use skirmish_core::types::PlayerId;
use skirmish_core::Vec2;

use crate::damage;
use crate::projectile::{Projectile, ProjectileSet, TargetRef};
use crate::systems::combat::{self, TargetInfo};

pub fn run(
    world: &mut World,
    now: f64,
    dt: f32,
    projectiles: &mut ProjectileSet,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    let mut landed = Vec::new();
    let mut i = 0;
    while i < projectiles.active.len() {
        let p = &mut projectiles.active[i];
        let step = p.velocity * dt;
        let remaining = p.target_pos - p.position;
        if step.length_squared() >= remaining.length_squared() {
            p.position = p.target_pos;
        } else {
            p.position += step;
        }
        p.lifetime -= dt;

        if p.position.distance(p.target_pos) < PROJECTILE_HIT_DISTANCE || p.lifetime <= 0.0 {
            landed.push(projectiles.active.swap_remove(i));
        } else {
            i += 1;
        }
    }
    if landed.is_empty() {
        return;
    }

    let units = combat::collect_unit_targets(world);
    let buildings = combat::collect_building_targets(world);
    for p in landed {
        let target = p
            .target
            .filter(|t| is_alive(world, *t))
            .or_else(|| fallback_target(&p, &units, &buildings));
        if let Some(target) = target {
            damage::apply_hit(world, target, p.damage, p.damage_kind(), now, events);
        }
        events.push(SimEvent::ProjectileImpact {
            kind: p.kind,
            position: p.position,
        });
        impacts.push(ImpactMarker {
            position: p.position,
            radius: PROJECTILE_FALLBACK_RADIUS * 0.5,
            remaining: IMPACT_MARKER_SECS,
        });
        projectiles.release(p);
    }
}

fn is_alive(world: &World, target: TargetRef) -> bool {
    match target {
        TargetRef::Unit(e) => {
            world.get::<&Dying>(e).is_err()
                && world.get::<&Health>(e).is_ok_and(|h| h.current > 0.0)
        }
        TargetRef::Base(e) => world.get::<&Base>(e).is_ok_and(|b| b.hp > 0.0),
        TargetRef::Structure(e) => world.get::<&Structure>(e).is_ok_and(|s| s.hp > 0.0),
    }
}

fn fallback_target(p: &Projectile, units: &[TargetInfo], buildings: &[TargetInfo]) -> Option<TargetRef> {
    let hostile = |t: &&TargetInfo| is_enemy(p.owner, t) && within(p.position, t);
    combat::nearest(units.iter().filter(hostile), p.position)
        .or_else(|| {
            combat::nearest(
                buildings
                    .iter()
                    .filter(hostile)
                    .filter(|t| matches!(t.target, TargetRef::Base(_))),
                p.position,
            )
        })
        .or_else(|| combat::nearest(buildings.iter().filter(hostile), p.position))
        .map(|t| t.target)
}

fn is_enemy(owner: PlayerId, t: &TargetInfo) -> bool {
    t.owner != owner
}

fn within(point: Vec2, t: &TargetInfo) -> bool {
    t.position.distance(point) <= PROJECTILE_FALLBACK_RADIUS + t.radius
}
