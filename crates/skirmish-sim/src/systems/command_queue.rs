//! Command queue system: advances the head node of every unit's queue.
//!
//! Per unit and frame: cooldowns and the displayed hp decay, a fading
//! queue is finished, the head node steers the unit or completes on
//! arrival, and sidestepped units schedule their return. A unit whose
//! state is corrupt is logged and skipped without touching the others.

use hecs::{Entity, World};
use tracing::{debug, warn};

use skirmish_core::components::*;
use skirmish_core::constants::*;
use skirmish_core::defs::unit_def;
use skirmish_core::events::SimEvent;
use skirmish_core::map::MapLayout;
use skirmish_core::orders::{CommandNode, CommandQueue};
use skirmish_core::types::Position;
use skirmish_core::Vec2;

use crate::error::UnitFault;
use crate::map::{Airspace, CollisionQuery};
use crate::systems::steering::{self, Mover, Neighbor};

/// Per-frame inputs shared by every unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitsFrame<'a> {
    pub now: f64,
    pub dt: f32,
    pub map: &'a MapLayout,
    pub promotion_enabled: bool,
}

/// An ability node whose unit reached its anchor this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCast {
    pub caster: Entity,
    pub anchor: Vec2,
    pub direction: Option<Vec2>,
}

struct UnitState<'q> {
    entity: Entity,
    unit: &'q Unit,
    pos: &'q mut Position,
    health: &'q mut Health,
    combat: &'q mut CombatState,
    motion: &'q mut Motion,
    stuck: &'q mut StuckState,
    effects: &'q mut Effects,
    queue: &'q mut CommandQueue,
}

enum Goal {
    Idle,
    Arrived,
    PathDone,
    Steer { target: Vec2, path_dir: Option<Vec2> },
}

/// Advance every living unit's queue. Returns the abilities to cast.
pub fn run(world: &mut World, frame: &UnitsFrame, events: &mut Vec<SimEvent>) -> Vec<PendingCast> {
    let neighbors = collect_neighbors(world);
    let airspace = Airspace(frame.map.bounds);
    let mut casts = Vec::new();
    let mut shoves = Vec::new();

    for (entity, (unit, pos, health, combat, motion, stuck, effects, queue)) in world
        .query_mut::<(
            &Unit,
            &mut Position,
            &mut Health,
            &mut CombatState,
            &mut Motion,
            &mut StuckState,
            &mut Effects,
            &mut CommandQueue,
        )>()
        .without::<&Dying>()
    {
        let query: &dyn CollisionQuery = if unit_def(unit.kind).flying {
            &airspace
        } else {
            frame.map
        };
        let mut state = UnitState {
            entity,
            unit,
            pos,
            health,
            combat,
            motion,
            stuck,
            effects,
            queue,
        };
        if let Err(fault) = update_unit(
            &mut state,
            frame,
            query,
            &neighbors,
            &mut casts,
            &mut shoves,
            events,
        ) {
            warn!(%fault, "skipping unit this frame");
        }
    }

    apply_shoves(world, frame, shoves);
    casts
}

/// Frame-start view of every living unit.
pub(crate) fn collect_neighbors(world: &World) -> Vec<Neighbor> {
    let neighbors = world
        .query::<(&Unit, &Position, &Motion, &CommandQueue)>()
        .without::<&Dying>()
        .iter()
        .filter(|(_, (_, pos, _, _))| pos.0.is_finite())
        .map(|(entity, (unit, pos, motion, queue))| {
            let def = unit_def(unit.kind);
            Neighbor {
                entity,
                owner: unit.owner,
                position: pos.0,
                heading: motion.heading,
                radius: def.radius,
                moving: !queue.is_empty() && !queue.is_cancelling(),
                flying: def.flying,
            }
        })
        .collect();
    neighbors
}

fn update_unit(
    u: &mut UnitState,
    frame: &UnitsFrame,
    query: &dyn CollisionQuery,
    neighbors: &[Neighbor],
    casts: &mut Vec<PendingCast>,
    shoves: &mut Vec<(Entity, Vec2)>,
    events: &mut Vec<SimEvent>,
) -> Result<(), UnitFault> {
    if !u.pos.0.is_finite() {
        return Err(UnitFault::NonFinitePosition(u.unit.id));
    }
    if !u.health.current.is_finite() {
        return Err(UnitFault::NonFiniteHealth(u.unit.id));
    }

    tick_timers(u, frame.dt);

    if u.queue.is_cancelling() {
        u.queue.finish_cancel(frame.now);
        halt(u);
        return Ok(());
    }

    let def = unit_def(u.unit.kind);
    let mover = Mover {
        entity: u.entity,
        owner: u.unit.owner,
        position: u.pos.0,
        radius: def.radius,
        flying: def.flying,
    };

    let goal = match u.queue.head_mut() {
        None => Goal::Idle,
        Some(CommandNode::FollowPath { path }) => {
            // Intermediate waypoints are passed loosely; the last one is
            // held to the regular arrival threshold.
            while let Some(next) = path.front() {
                let reach = if path.len() == 1 {
                    ARRIVAL_THRESHOLD
                } else {
                    PATH_REACH_RADIUS
                };
                if next.distance(mover.position) > reach {
                    break;
                }
                path.pop_front();
            }
            match steering::lookahead_point(mover.position, path.iter(), PATH_LOOKAHEAD) {
                None => Goal::PathDone,
                Some(target) => Goal::Steer {
                    target,
                    path_dir: path
                        .front()
                        .map(|next| (*next - mover.position).normalize_or_zero()),
                },
            }
        }
        Some(node) => match node.destination() {
            Some(target) if !steering::has_arrived(&mover, target, neighbors) => Goal::Steer {
                target,
                path_dir: None,
            },
            _ => Goal::Arrived,
        },
    };

    match goal {
        Goal::Idle => {
            halt(u);
            reset_stuck(u);
        }
        Goal::Arrived => arrive(u, casts),
        Goal::PathDone => {
            u.queue.pop();
            halt(u);
            reset_stuck(u);
        }
        Goal::Steer { target, path_dir } => {
            steer(u, frame, query, &mover, target, path_dir, neighbors, shoves, events);
        }
    }
    schedule_return(u, frame.now);
    Ok(())
}

/// Queue the walk back for a sidestepped unit once it has settled. Runs
/// after movement so the unit only moves again on the next frame.
fn schedule_return(u: &mut UnitState, now: f64) {
    let Some(avoidance) = u.effects.avoidance else {
        return;
    };
    if u.queue.is_empty() && now >= avoidance.return_at {
        u.effects.avoidance = None;
        u.queue.push(CommandNode::Move {
            target: avoidance.origin,
        });
    }
}

fn tick_timers(u: &mut UnitState, dt: f32) {
    u.combat.attack_cooldown = (u.combat.attack_cooldown - dt).max(0.0);
    u.combat.ability_cooldown = (u.combat.ability_cooldown - dt).max(0.0);
    let blend = (HP_DISPLAY_BLEND_PER_SEC * dt).min(1.0);
    u.health.displayed += (u.health.current.max(0.0) - u.health.displayed) * blend;
}

fn halt(u: &mut UnitState) {
    u.motion.speed = 0.0;
    u.motion.heading = Vec2::ZERO;
    u.motion.jitter_offset = Vec2::ZERO;
}

fn reset_stuck(u: &mut UnitState) {
    u.stuck.anchor = u.pos.0;
    u.stuck.timer = 0.0;
    u.stuck.jittering = false;
}

/// Pop the head node. Patrols flip direction; abilities are handed off.
fn arrive(u: &mut UnitState, casts: &mut Vec<PendingCast>) {
    match u.queue.pop() {
        Some(CommandNode::Patrol { target, return_to }) => {
            u.queue.push(CommandNode::Patrol {
                target: return_to,
                return_to: target,
            });
        }
        Some(CommandNode::Ability {
            position,
            direction,
        }) => casts.push(PendingCast {
            caster: u.entity,
            anchor: position,
            direction,
        }),
        _ => {}
    }
    halt(u);
    reset_stuck(u);
}

#[allow(clippy::too_many_arguments)]
fn steer(
    u: &mut UnitState,
    frame: &UnitsFrame,
    query: &dyn CollisionQuery,
    mover: &Mover,
    target: Vec2,
    path_dir: Option<Vec2>,
    neighbors: &[Neighbor],
    shoves: &mut Vec<(Entity, Vec2)>,
    events: &mut Vec<SimEvent>,
) {
    let start = mover.position;
    let to_target = target - start;
    let distance = to_target.length();
    let desired = to_target.normalize_or_zero();
    if desired == Vec2::ZERO {
        halt(u);
        return;
    }

    let flock = steering::flocking_force(mover, desired, path_dir, neighbors, u.motion.prev_flock_force);
    u.motion.prev_flock_force = flock;
    let dir = steering::blend_direction(desired, flock);
    let speed = unit_def(u.unit.kind).move_speed * u.effects.speed_multiplier();

    let next = match steering::probe_heading(query, start, dir, to_target, mover.radius) {
        Some(heading) => {
            let candidate = start + heading * (speed * frame.dt).min(distance);
            let resolved = steering::resolve_collisions(mover, candidate, heading, neighbors);
            shoves.extend(resolved.shoved);
            u.motion.heading = heading;
            if !query.point_blocked(resolved.position, mover.radius) {
                resolved.position
            } else if !query.point_blocked(candidate, mover.radius) {
                candidate
            } else {
                start
            }
        }
        None => {
            u.motion.heading = Vec2::ZERO;
            start
        }
    };

    u.pos.0 = next;
    let moved = next.distance(start);
    u.motion.speed = if frame.dt > 0.0 { moved / frame.dt } else { 0.0 };
    if moved > 1e-4 {
        let facing = next - start;
        u.motion.rotation = facing.y.atan2(facing.x);
    }

    if frame.promotion_enabled {
        accrue_promotion(u, moved);
    }
    track_progress(u, frame, query, mover.radius, target, events);
}

/// Distance traveled earns credit, weighted by how many movement nodes
/// are still queued; each full threshold raises the damage multiplier.
fn accrue_promotion(u: &mut UnitState, moved: f32) {
    if moved <= 0.0 {
        return;
    }
    let queued = u.queue.movement_nodes().max(1);
    u.combat.promotion_credit += moved * (1.0 + PROMOTION_QUEUE_BONUS * (queued - 1) as f32);
    while u.combat.promotion_credit >= PROMOTION_CREDIT_THRESHOLD {
        u.combat.promotion_credit -= PROMOTION_CREDIT_THRESHOLD;
        u.combat.damage_multiplier =
            (u.combat.damage_multiplier + PROMOTION_DAMAGE_STEP).min(MAX_DAMAGE_MULTIPLIER);
    }
}

/// Stuck detection: jitter after a short stall, fade the queue out after
/// a long one.
fn track_progress(
    u: &mut UnitState,
    frame: &UnitsFrame,
    query: &dyn CollisionQuery,
    radius: f32,
    target: Vec2,
    events: &mut Vec<SimEvent>,
) {
    u.stuck.timer += frame.dt;
    if u.pos.0.distance(u.stuck.anchor) >= STUCK_PROGRESS_DISTANCE {
        reset_stuck(u);
        u.motion.jitter_offset = Vec2::ZERO;
        return;
    }

    if u.stuck.timer >= STUCK_TIMEOUT_SECS {
        u.queue.begin_cancel(frame.now, QUEUE_CANCEL_FADE_SECS);
        reset_stuck(u);
        halt(u);
        events.push(SimEvent::QueueCancelled { unit: u.unit.id });
        debug!(unit = u.unit.id.0, "stuck past timeout, fading queue out");
        return;
    }

    if u.stuck.timer >= STUCK_JITTER_AFTER_SECS {
        u.stuck.jittering = true;
        u.stuck.jitter_phase = (u.stuck.jitter_phase + JITTER_PHASE_STEP) % std::f32::consts::TAU;
        let offset = Vec2::from_angle(u.stuck.jitter_phase) * JITTER_AMPLITUDE;
        let probe = u.pos.0 + offset;
        let to_target = target - probe;
        let escapes = !query.point_blocked(probe, radius)
            && steering::probe_heading(query, probe, to_target.normalize_or_zero(), to_target, radius)
                .is_some();
        if escapes {
            u.pos.0 = probe;
            u.motion.jitter_offset = offset;
        } else {
            u.motion.jitter_offset = Vec2::ZERO;
        }
    }
}

/// Give shoved idle allies a sidestep order and remember where to send
/// them back. Positions are untouched here; the sidestep is walked like
/// any other move node.
fn apply_shoves(world: &mut World, frame: &UnitsFrame, shoves: Vec<(Entity, Vec2)>) {
    let airspace = Airspace(frame.map.bounds);
    for (entity, side) in shoves {
        let Ok((unit, pos, effects, queue)) =
            world.query_one_mut::<(&Unit, &Position, &mut Effects, &mut CommandQueue)>(entity)
        else {
            continue;
        };
        if !queue.is_empty() || !pos.0.is_finite() {
            continue;
        }
        let def = unit_def(unit.kind);
        let query: &dyn CollisionQuery = if def.flying { &airspace } else { frame.map };
        let step = frame.map.bounds.clamp(pos.0 + side * AVOIDANCE_SHOVE_DISTANCE);
        if query.point_blocked(step, def.radius) {
            continue;
        }
        let origin = effects.avoidance.map_or(pos.0, |a| a.origin);
        queue.push(CommandNode::Move { target: step });
        effects.avoidance = Some(Avoidance {
            origin,
            return_at: frame.now + AVOIDANCE_RETURN_DELAY_SECS,
        });
    }
}
