//! Base behavior: shield expiry, mobile base movement and the laser.

use hecs::World;
use tracing::trace;

use skirmish_core::components::{Base, LaserBeam};
use skirmish_core::constants::{ARRIVAL_THRESHOLD, LASER_VISUAL_SECS};
use skirmish_core::defs::base_def;
use skirmish_core::enums::DamageKind;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;
use skirmish_core::Vec2;

use crate::damage;
use crate::map::CollisionQuery;
use crate::projectile::TargetRef;
use crate::systems::combat;

pub fn run(world: &mut World, now: f64, dt: f32, map: &dyn CollisionQuery, events: &mut Vec<SimEvent>) {
    let units = combat::collect_unit_targets(world);
    let mut shots: Vec<(TargetRef, f32)> = Vec::new();

    for (_entity, (base, pos)) in world.query_mut::<(&mut Base, &mut Position)>() {
        if base.hp <= 0.0 {
            continue;
        }
        let def = base_def(base.kind);

        if base.shield_until.is_some_and(|t| now >= t) {
            base.shield_until = None;
        }

        if let Some(target) = base.move_target.filter(|_| def.mobile) {
            let to_target = target - pos.0;
            let dist = to_target.length();
            if dist <= ARRIVAL_THRESHOLD {
                base.move_target = None;
            } else {
                let step = to_target / dist * (def.move_speed * dt).min(dist);
                let next = pos.0 + step;
                if map.point_blocked(next, def.radius * 0.5) {
                    trace!(owner = base.owner.0, "base movement blocked");
                    base.move_target = None;
                } else {
                    pos.0 = next;
                }
            }
        }

        base.laser_cooldown = (base.laser_cooldown - dt).max(0.0);
        if base.laser_cooldown > 0.0 {
            continue;
        }
        let from = pos.0;
        let target = combat::nearest(
            units.iter().filter(|t| {
                t.owner != base.owner && !t.cloaked && t.position.distance(from) <= def.laser_range
            }),
            from,
        );
        if let Some(target) = target {
            base.laser_cooldown = def.laser_cooldown;
            base.laser_beam = Some(LaserBeam {
                from,
                to: target.position,
                until: now + LASER_VISUAL_SECS,
            });
            shots.push((target.target, def.laser_damage));
        }
    }

    for (target, amount) in shots {
        damage::apply_hit(world, target, amount, DamageKind::Ranged, now, events);
    }
}

/// Where a mobile base may be sent: clamped into the map.
pub fn clamp_move_target(map: &dyn CollisionQuery, target: Vec2) -> Vec2 {
    map.bounds().clamp(target)
}
