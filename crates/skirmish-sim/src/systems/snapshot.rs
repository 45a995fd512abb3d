//! Snapshot system: queries the ECS world and builds a complete
//! `GameStateSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use skirmish_core::components::*;
use skirmish_core::enums::{GamePhase, Winner};
use skirmish_core::events::SimEvent;
use skirmish_core::orders::CommandQueue;
use skirmish_core::state::*;
use skirmish_core::types::{Position, SimTime};

use crate::projectile::Projectile;

/// Everything the snapshot needs that does not live in the world.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub winner: Option<Winner>,
    pub players: &'a [PlayerState],
    pub projectiles: &'a [Projectile],
    pub impacts: &'a [ImpactMarker],
    pub events: Vec<SimEvent>,
}

pub fn build_snapshot(world: &World, now: f64, inputs: SnapshotInputs) -> GameStateSnapshot {
    GameStateSnapshot {
        time: inputs.time,
        phase: inputs.phase,
        winner: inputs.winner,
        players: inputs
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                photons: p.photons,
            })
            .collect(),
        units: build_units(world),
        bases: build_bases(world, now),
        structures: build_structures(world),
        projectiles: inputs
            .projectiles
            .iter()
            .map(|p| ProjectileView {
                kind: p.kind,
                owner: p.owner,
                position: p.position,
                velocity: p.velocity,
            })
            .collect(),
        impacts: inputs.impacts.to_vec(),
        events: inputs.events,
    }
}

/// Units sorted by id so snapshots are stable across frames.
fn build_units(world: &World) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(
            &Unit,
            &Position,
            &Motion,
            &Health,
            &Effects,
            &CommandQueue,
            Option<&Dying>,
        )>()
        .iter()
        .map(|(_, (unit, pos, motion, health, effects, queue, dying))| UnitView {
            id: unit.id,
            kind: unit.kind,
            owner: unit.owner,
            position: pos.0,
            rotation: motion.rotation,
            speed: motion.speed,
            hp: health.current,
            max_hp: health.max,
            displayed_hp: health.displayed,
            dying: dying.is_some(),
            queue: queue.iter().cloned().collect(),
            queue_fading: queue.is_cancelling(),
            effects: *effects,
        })
        .collect();
    units.sort_by_key(|u| u.id);
    units
}

fn build_bases(world: &World, now: f64) -> Vec<BaseView> {
    let mut bases: Vec<BaseView> = world
        .query::<(&Base, &Position)>()
        .iter()
        .map(|(_, (base, pos))| BaseView {
            owner: base.owner,
            kind: base.kind,
            position: pos.0,
            hp: base.hp,
            max_hp: base.max_hp,
            shielded: base.shield_until.is_some_and(|t| now < t),
            laser_beam: base.laser_beam,
        })
        .collect();
    bases.sort_by_key(|b| b.owner.0);
    bases
}

fn build_structures(world: &World) -> Vec<StructureView> {
    world
        .query::<(&Structure, &Position)>()
        .iter()
        .map(|(_, (s, pos))| StructureView {
            owner: s.owner,
            kind: s.kind,
            position: pos.0,
            hp: s.hp,
            max_hp: s.max_hp,
        })
        .collect()
}
