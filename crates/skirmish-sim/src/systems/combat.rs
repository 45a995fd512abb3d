//! Combat system: target acquisition and regular attacks.
//!
//! Runs after movement so ranges reflect this frame's positions. Each unit
//! with an attack and a ready cooldown picks the nearest valid enemy unit
//! in range, falling back to bases and structures when it can hit them.
//! Units on a plain move or ability approach hold fire; idle, attack-move,
//! patrol and path-following units engage.

use hecs::{Entity, World};

use skirmish_core::components::*;
use skirmish_core::constants::{IMPACT_MARKER_SECS, MELEE_VISUAL_SECS};
use skirmish_core::defs::{base_def, structure_def, unit_def, UnitDef};
use skirmish_core::enums::{AttackKind, DamageKind, ProjectileKind};
use skirmish_core::events::SimEvent;
use skirmish_core::orders::{CommandNode, CommandQueue};
use skirmish_core::state::ImpactMarker;
use skirmish_core::types::{PlayerId, Position};
use skirmish_core::Vec2;

use crate::damage;
use crate::projectile::{Launch, ProjectileSet, TargetRef};

/// Frame-start view of something that can be attacked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TargetInfo {
    pub target: TargetRef,
    pub owner: PlayerId,
    pub position: Vec2,
    pub radius: f32,
    pub flying: bool,
    pub cloaked: bool,
}

/// Living, non-dying units with a finite position.
pub(crate) fn collect_unit_targets(world: &World) -> Vec<TargetInfo> {
    let targets = world
        .query::<(&Unit, &Position, &Health, &Effects)>()
        .without::<&Dying>()
        .iter()
        .filter(|(_, (_, pos, health, _))| pos.0.is_finite() && health.current > 0.0)
        .map(|(entity, (unit, pos, _, effects))| {
            let def = unit_def(unit.kind);
            TargetInfo {
                target: TargetRef::Unit(entity),
                owner: unit.owner,
                position: pos.0,
                radius: def.radius,
                flying: def.flying,
                cloaked: effects.cloaked,
            }
        })
        .collect();
    targets
}

/// Standing bases and structures.
pub(crate) fn collect_building_targets(world: &World) -> Vec<TargetInfo> {
    let mut targets: Vec<TargetInfo> = world
        .query::<(&Base, &Position)>()
        .iter()
        .filter(|(_, (base, _))| base.hp > 0.0)
        .map(|(entity, (base, pos))| TargetInfo {
            target: TargetRef::Base(entity),
            owner: base.owner,
            position: pos.0,
            radius: base_def(base.kind).radius,
            flying: false,
            cloaked: false,
        })
        .collect();
    targets.extend(
        world
            .query::<(&Structure, &Position)>()
            .iter()
            .filter(|(_, (s, _))| s.hp > 0.0)
            .map(|(entity, (s, pos))| TargetInfo {
                target: TargetRef::Structure(entity),
                owner: s.owner,
                position: pos.0,
                radius: structure_def(s.kind).radius,
                flying: false,
                cloaked: false,
            }),
    );
    targets
}

pub(crate) fn nearest<'a>(
    candidates: impl Iterator<Item = &'a TargetInfo>,
    from: Vec2,
) -> Option<&'a TargetInfo> {
    candidates.min_by(|a, b| {
        a.position
            .distance_squared(from)
            .total_cmp(&b.position.distance_squared(from))
    })
}

/// Nearest enemy ground unit in range, else nearest enemy building in
/// range. Flying units are only reachable by abilities.
fn acquire<'a>(
    def: &UnitDef,
    owner: PlayerId,
    from: Vec2,
    units: &'a [TargetInfo],
    buildings: &'a [TargetInfo],
) -> Option<&'a TargetInfo> {
    let unit = nearest(
        units.iter().filter(|t| {
            t.owner != owner
                && !t.cloaked
                && !t.flying
                && t.position.distance(from) <= def.attack_range
        }),
        from,
    );
    if unit.is_some() || !def.can_hit_structures {
        return unit;
    }
    nearest(
        buildings
            .iter()
            .filter(|t| t.owner != owner && t.position.distance(from) <= def.attack_range + t.radius),
        from,
    )
}

fn engages(queue: &CommandQueue) -> bool {
    !matches!(
        queue.head(),
        Some(CommandNode::Move { .. } | CommandNode::Ability { .. })
    )
}

struct Attack {
    attacker: Entity,
    unit: Unit,
    from: Vec2,
    target: TargetInfo,
    damage: f32,
}

pub fn run(
    world: &mut World,
    now: f64,
    projectiles: &mut ProjectileSet,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    let units = collect_unit_targets(world);
    let buildings = collect_building_targets(world);
    let mut attacks = Vec::new();

    for (entity, (unit, pos, combat, motion, effects, queue)) in world
        .query_mut::<(
            &Unit,
            &Position,
            &mut CombatState,
            &mut Motion,
            &Effects,
            &CommandQueue,
        )>()
        .without::<&Dying>()
    {
        let def = unit_def(unit.kind);
        if def.attack == AttackKind::None
            || combat.attack_cooldown > 0.0
            || effects.cloaked
            || !pos.0.is_finite()
            || !engages(queue)
        {
            continue;
        }
        let Some(target) = acquire(&def, unit.owner, pos.0, &units, &buildings) else {
            continue;
        };

        combat.attack_cooldown = def.attack_cooldown();
        if motion.speed == 0.0 {
            let facing = target.position - pos.0;
            motion.rotation = facing.y.atan2(facing.x);
        }
        attacks.push(Attack {
            attacker: entity,
            unit: *unit,
            from: pos.0,
            target: *target,
            damage: def.attack_damage * combat.damage_multiplier * effects.damage_multiplier(),
        });
    }

    for attack in attacks {
        resolve(world, attack, now, projectiles, events, impacts);
    }
}

fn resolve(
    world: &mut World,
    attack: Attack,
    now: f64,
    projectiles: &mut ProjectileSet,
    events: &mut Vec<SimEvent>,
    impacts: &mut Vec<ImpactMarker>,
) {
    let def = unit_def(attack.unit.kind);
    match def.attack {
        AttackKind::None => {}
        AttackKind::Melee => {
            damage::apply_hit(world, attack.target.target, attack.damage, DamageKind::Melee, now, events);
            if let Ok(mut effects) = world.get::<&mut Effects>(attack.attacker) {
                let swing = effects.melee_attack.map_or(1, |m| m.swing % 3 + 1);
                effects.melee_attack = Some(MeleeAttackEffect {
                    target: attack.target.position,
                    swing,
                    until: now + MELEE_VISUAL_SECS,
                });
            }
        }
        AttackKind::Ranged if def.hitscan => {
            damage::apply_hit(world, attack.target.target, attack.damage, DamageKind::Ranged, now, events);
            impacts.push(ImpactMarker {
                position: attack.target.position,
                radius: attack.target.radius,
                remaining: IMPACT_MARKER_SECS,
            });
        }
        AttackKind::Ranged => {
            events.push(SimEvent::ProjectileFired {
                owner: attack.unit.owner,
                kind: ProjectileKind::Standard,
                from: attack.from,
            });
            projectiles.launch(Launch {
                from: attack.from,
                target_pos: attack.target.position,
                target: Some(attack.target.target),
                speed: def.projectile_speed,
                damage: attack.damage,
                owner: attack.unit.owner,
                kind: ProjectileKind::Standard,
            });
        }
    }
}
