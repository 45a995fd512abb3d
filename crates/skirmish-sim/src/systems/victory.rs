//! Match end checks.

use hecs::World;

use skirmish_core::components::Base;
use skirmish_core::enums::Winner;
use skirmish_core::types::PlayerId;

/// Winner once the time limit has elapsed: the player whose base has the
/// higher hp fraction, or a draw. `None` while time remains or without a
/// limit.
pub fn check_time_limit(world: &World, elapsed: f64, limit: f64) -> Option<Winner> {
    if limit <= 0.0 || elapsed < limit {
        return None;
    }
    let mut best: Option<(PlayerId, f32)> = None;
    let mut tied = false;
    for (_, base) in world.query::<&Base>().iter() {
        let fraction = if base.max_hp > 0.0 { base.hp / base.max_hp } else { 0.0 };
        match best {
            Some((_, f)) if fraction < f => {}
            Some((_, f)) if fraction == f => tied = true,
            _ => {
                best = Some((base.owner, fraction));
                tied = false;
            }
        }
    }
    match best {
        Some((owner, _)) if !tied => Some(Winner::Player(owner)),
        _ => Some(Winner::Draw),
    }
}

/// Winner once at most one player still has a standing base. Bases that
/// fell in the same frame make a draw. Worlds with fewer than two bases
/// never end this way.
pub fn check_victory(world: &World) -> Option<Winner> {
    let mut owners = Vec::new();
    let mut standing = Vec::new();
    for (_, base) in world.query::<&Base>().iter() {
        if !owners.contains(&base.owner) {
            owners.push(base.owner);
        }
        if base.hp > 0.0 && !standing.contains(&base.owner) {
            standing.push(base.owner);
        }
    }
    if owners.len() < 2 {
        return None;
    }
    match standing.as_slice() {
        [] => Some(Winner::Draw),
        [only] => Some(Winner::Player(*only)),
        _ => None,
    }
}
