//! Entity spawn factories for units, bases and structures.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::*;
use skirmish_core::constants::SPAWN_SCATTER;
use skirmish_core::defs::{base_def, structure_def, unit_def};
use skirmish_core::enums::*;
use skirmish_core::map::{MapLayout, Rect};
use skirmish_core::orders::{CommandNode, CommandQueue};
use skirmish_core::types::{PlayerId, Position, UnitId};
use skirmish_core::Vec2;

/// Place one base per player at the map's spawn points.
pub fn setup_match(world: &mut World, map: &MapLayout, player_count: u8) -> Vec<Entity> {
    map.bases
        .iter()
        .take(player_count as usize)
        .enumerate()
        .map(|(i, spawn)| spawn_base(world, PlayerId(i as u8), spawn.kind, spawn.position))
        .collect()
}

pub fn spawn_base(world: &mut World, owner: PlayerId, kind: BaseKind, position: Vec2) -> Entity {
    let def = base_def(kind);
    world.spawn((
        Base {
            kind,
            owner,
            hp: def.hp,
            max_hp: def.hp,
            move_target: None,
            shield_until: None,
            shield_ready_at: 0.0,
            laser_cooldown: 0.0,
            laser_beam: None,
        },
        Position(position),
    ))
}

pub fn spawn_structure(world: &mut World, owner: PlayerId, kind: StructureKind, position: Vec2) -> Entity {
    let def = structure_def(kind);
    world.spawn((
        Structure {
            kind,
            owner,
            hp: def.hp,
            max_hp: def.hp,
            attack_cooldown: 0.0,
        },
        Position(position),
    ))
}

/// Spawn a unit scattered around `spawn_pos` and send it to `rally_pos`.
/// Both points are clamped into `bounds`.
pub fn spawn_unit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    bounds: Rect,
    id: UnitId,
    kind: UnitKind,
    owner: PlayerId,
    spawn_pos: Vec2,
    rally_pos: Vec2,
) -> Entity {
    let scatter = Vec2::new(
        rng.gen_range(-SPAWN_SCATTER..=SPAWN_SCATTER),
        rng.gen_range(-SPAWN_SCATTER..=SPAWN_SCATTER),
    );
    let position = bounds.clamp(spawn_pos + scatter);
    let rally = bounds.clamp(rally_pos);

    let mut queue = CommandQueue::new();
    if rally.distance(position) > f32::EPSILON {
        queue.push(CommandNode::Move { target: rally });
    }
    let jitter_phase = rng.gen_range(0.0..std::f32::consts::TAU);
    let entity = spawn_unit_at(world, id, kind, owner, position, queue);
    if let Ok(mut stuck) = world.get::<&mut StuckState>(entity) {
        stuck.jitter_phase = jitter_phase;
    }
    entity
}

/// Spawn a unit exactly at `position` with the given queue.
pub fn spawn_unit_at(
    world: &mut World,
    id: UnitId,
    kind: UnitKind,
    owner: PlayerId,
    position: Vec2,
    queue: CommandQueue,
) -> Entity {
    let def = unit_def(kind);
    let facing = queue
        .head()
        .and_then(|n| n.destination())
        .map_or(Vec2::X, |d| d - position);
    world.spawn((
        Unit { id, kind, owner },
        Position(position),
        Health::full(def.hp),
        CombatState::default(),
        Motion {
            rotation: facing.y.atan2(facing.x),
            ..Default::default()
        },
        StuckState {
            anchor: position,
            ..Default::default()
        },
        Effects {
            cloaked: def.starts_cloaked,
            ..Default::default()
        },
        queue,
    ))
}
