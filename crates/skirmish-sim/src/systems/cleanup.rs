//! Cleanup system: death handling and despawning.
//!
//! A unit whose hp reached zero is marked `Dying` exactly once. That frame it
//! emits `UnitDied` and, for kinds with a death burst, deals area damage.
//! Dying units are despawned after the grace period; destroyed structures
//! go immediately. Bases stay in the world at zero hp for the victory check.

use hecs::{Entity, World};
use tracing::debug;

use skirmish_core::components::{Dying, Health, Structure, Unit};
use skirmish_core::constants::{DEATH_BURST_RADIUS, DEATH_GRACE_SECS};
use skirmish_core::defs::unit_def;
use skirmish_core::enums::DamageKind;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;

use crate::damage::{self, AreaDamage};

/// Mark dead units as dying and remove destroyed structures.
pub fn remove_dead(world: &mut World, now: f64, events: &mut Vec<SimEvent>) {
    let dead: Vec<(Entity, Unit, Position)> = world
        .query::<(&Unit, &Position, &Health)>()
        .without::<&Dying>()
        .iter()
        .filter(|(_, (_, _, health))| health.current <= 0.0)
        .map(|(entity, (unit, pos, _))| (entity, *unit, *pos))
        .collect();

    let mut bursts = Vec::new();
    for (entity, unit, pos) in dead {
        let _ = world.insert_one(entity, Dying { since: now });
        events.push(SimEvent::UnitDied {
            unit: unit.id,
            kind: unit.kind,
            owner: unit.owner,
            position: pos.0,
        });
        debug!(unit = unit.id.0, kind = ?unit.kind, owner = unit.owner.0, "unit died");

        let burst = unit_def(unit.kind).death_burst_damage;
        if burst > 0.0 && pos.0.is_finite() {
            bursts.push(AreaDamage {
                owner: unit.owner,
                center: pos.0,
                radius: DEATH_BURST_RADIUS,
                amount: burst,
                kind: DamageKind::Ability,
                facing: None,
                hits_buildings: true,
            });
        }
    }
    // Units killed by a burst are picked up next frame.
    for burst in bursts {
        damage::apply_area(world, &burst, now, events);
    }

    let destroyed: Vec<(Entity, Structure)> = world
        .query::<&Structure>()
        .iter()
        .filter(|(_, s)| s.hp <= 0.0)
        .map(|(entity, s)| (entity, *s))
        .collect();
    for (entity, structure) in destroyed {
        let _ = world.despawn(entity);
        events.push(SimEvent::StructureDestroyed {
            owner: structure.owner,
            kind: structure.kind,
        });
        debug!(kind = ?structure.kind, owner = structure.owner.0, "structure destroyed");
    }
}

/// Despawn units whose death grace period is over.
/// Uses a pre-allocated buffer to avoid per-frame allocation.
pub fn despawn_finished(world: &mut World, now: f64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, dying) in world.query_mut::<&Dying>() {
        if now - dying.since >= DEATH_GRACE_SECS {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
