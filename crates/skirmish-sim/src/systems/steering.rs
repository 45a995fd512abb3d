//! Steering and local collision for one unit.
//!
//! Flocking (separation, cohesion, alignment) bends the goal direction,
//! a probe fan routes around nearby obstacles, and collision resolution
//! softly pushes the unit off allies before a hard obstacle check.
//! These are pure helpers; the command queue system applies the results.

use hecs::Entity;

use skirmish_core::constants::*;
use skirmish_core::types::PlayerId;
use skirmish_core::Vec2;

use crate::map::CollisionQuery;

/// Frame-start view of another unit, used for flocking and collision.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub entity: Entity,
    pub owner: PlayerId,
    pub position: Vec2,
    pub heading: Vec2,
    pub radius: f32,
    /// Has an active, non-fading command queue.
    pub moving: bool,
    pub flying: bool,
}

/// The unit doing the steering.
#[derive(Debug, Clone, Copy)]
pub struct Mover {
    pub entity: Entity,
    pub owner: PlayerId,
    pub position: Vec2,
    pub radius: f32,
    pub flying: bool,
}

impl Mover {
    fn is_ally(&self, n: &Neighbor) -> bool {
        n.entity != self.entity && n.owner == self.owner && n.flying == self.flying
    }
}

/// Combined flocking force, smoothed against last frame's force and with
/// any component pointing back against `desired` removed.
pub fn flocking_force(
    mover: &Mover,
    desired: Vec2,
    path_dir: Option<Vec2>,
    neighbors: &[Neighbor],
    prev_force: Vec2,
) -> Vec2 {
    let mut separation = Vec2::ZERO;
    let mut centroid = Vec2::ZERO;
    let mut cohesion_count = 0u32;
    let mut heading_sum = Vec2::ZERO;
    let mut alignment_count = 0u32;

    for n in neighbors.iter().filter(|n| mover.is_ally(n)) {
        let offset = mover.position - n.position;
        let d = offset.length();

        if d > 1e-3 && d < SEPARATION_RADIUS {
            let mut push = offset / d * (SEPARATION_STRENGTH / (d * d * d));
            if let Some(along) = path_dir {
                let parallel = along * push.dot(along);
                push = push - parallel + parallel * PATH_SEPARATION_ALONG_FACTOR;
            }
            separation += push;
        }
        if !n.moving {
            continue;
        }
        if d < COHESION_RADIUS {
            centroid += n.position;
            cohesion_count += 1;
        }
        if d < ALIGNMENT_RADIUS && n.heading != Vec2::ZERO {
            heading_sum += n.heading;
            alignment_count += 1;
        }
    }

    let separation = separation.clamp_length_max(MAX_SEPARATION_FORCE);
    let cohesion = if cohesion_count > 0 {
        let center = centroid / cohesion_count as f32;
        ((center - mover.position) * COHESION_STRENGTH).clamp_length_max(MAX_COHESION_FORCE)
    } else {
        Vec2::ZERO
    };
    let alignment = if alignment_count > 0 {
        (heading_sum / alignment_count as f32 * ALIGNMENT_STRENGTH)
            .clamp_length_max(MAX_ALIGNMENT_FORCE)
    } else {
        Vec2::ZERO
    };

    let raw = (separation + cohesion + alignment).clamp_length_max(MAX_FLOCKING_FORCE);
    let smoothed = prev_force.lerp(raw, FLOCKING_SMOOTHING);

    let back = smoothed.dot(desired);
    if back < 0.0 {
        smoothed - desired * back
    } else {
        smoothed
    }
}

/// Blend the goal direction with the flocking force. Goal dominates.
pub fn blend_direction(desired: Vec2, flock: Vec2) -> Vec2 {
    let blended = desired * GOAL_DIRECTION_WEIGHT + flock;
    let dir = blended.normalize_or_zero();
    if dir == Vec2::ZERO {
        desired
    } else {
        dir
    }
}

/// Cast a short lookahead along `dir`. If blocked, fan out alternately to
/// either side and take the first clear heading that still makes progress
/// toward the target. `None` means the unit should hold this frame.
pub fn probe_heading(
    query: &dyn CollisionQuery,
    from: Vec2,
    dir: Vec2,
    to_target: Vec2,
    radius: f32,
) -> Option<Vec2> {
    let reach = PROBE_LOOKAHEAD.min(to_target.length()).max(radius * 0.5);
    let clear = |h: Vec2| !query.segment_blocked(from, from + h * reach, radius);

    if clear(dir) {
        return Some(dir);
    }
    for attempt in 1..=PROBE_MAX_ATTEMPTS {
        let steps = attempt.div_ceil(2) as f32;
        let sign = if attempt % 2 == 1 { 1.0 } else { -1.0 };
        let candidate = Vec2::from_angle(sign * steps * PROBE_ANGLE_STEP).rotate(dir);
        if candidate.dot(to_target) > 1e-4 && clear(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Result of soft collision against allies.
#[derive(Debug, Default)]
pub struct Resolved {
    pub position: Vec2,
    /// Idle allies in the way, with the direction to shove them.
    pub shoved: Vec<(Entity, Vec2)>,
}

/// Nudge `candidate` away from overlapping allies, capped per frame.
/// Units never hard-block each other; only obstacles do.
pub fn resolve_collisions(mover: &Mover, candidate: Vec2, heading: Vec2, neighbors: &[Neighbor]) -> Resolved {
    let mut push = Vec2::ZERO;
    let mut shoved = Vec::new();

    for n in neighbors.iter().filter(|n| mover.is_ally(n)) {
        let min_sep = mover.radius + n.radius;
        let offset = candidate - n.position;
        let d = offset.length();
        if d >= min_sep {
            continue;
        }
        let away = if d > 1e-3 { offset / d } else { heading.perp() };
        push += away * (min_sep - d) * COLLISION_PUSH_FACTOR;
        if !n.moving {
            // Step out of the lane, toward whichever side the ally already leans.
            let lateral = heading.perp();
            let side = if (n.position - mover.position).dot(lateral) >= 0.0 {
                lateral
            } else {
                -lateral
            };
            shoved.push((n.entity, side));
        }
    }

    Resolved {
        position: candidate + push.clamp_length_max(MAX_COLLISION_PUSH),
        shoved,
    }
}

/// Whether a unit at `pos` counts as arrived at `target`.
///
/// Either it is within the arrival threshold, or an ally already stands on
/// the target and the unit is close enough to give up on it.
pub fn has_arrived(mover: &Mover, target: Vec2, neighbors: &[Neighbor]) -> bool {
    let d = mover.position.distance(target);
    if d <= ARRIVAL_THRESHOLD {
        return true;
    }
    d <= OCCUPIED_ARRIVAL_RADIUS
        && neighbors
            .iter()
            .any(|n| mover.is_ally(n) && n.position.distance(target) <= OCCUPIED_TARGET_EPSILON)
}

/// Point `lookahead` units ahead along the polyline that starts at `from`
/// and runs through `path`. Returns the last waypoint if the path is shorter.
pub fn lookahead_point<'a>(from: Vec2, path: impl IntoIterator<Item = &'a Vec2>, lookahead: f32) -> Option<Vec2> {
    let mut remaining = lookahead;
    let mut prev = from;
    let mut last = None;
    for &point in path {
        let seg = point - prev;
        let len = seg.length();
        if len >= remaining {
            return Some(prev + seg / len * remaining);
        }
        remaining -= len;
        prev = point;
        last = Some(point);
    }
    last
}
