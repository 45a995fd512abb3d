//! Photon income.

use hecs::World;

use skirmish_core::components::{Base, PlayerState, Structure};
use skirmish_core::defs::structure_def;

/// Every player with a standing base earns `base_income` per second plus
/// the bonus of each of their standing structures.
pub fn run(world: &World, players: &mut [PlayerState], base_income: f64, dt: f64) {
    for player in players.iter_mut() {
        let has_base = world
            .query::<&Base>()
            .iter()
            .any(|(_, b)| b.owner == player.id && b.hp > 0.0);
        if !has_base {
            continue;
        }
        let bonus: f64 = world
            .query::<&Structure>()
            .iter()
            .filter(|(_, s)| s.owner == player.id && s.hp > 0.0)
            .map(|(_, s)| structure_def(s.kind).income_bonus)
            .sum();
        player.photons += (base_income + bonus) * dt;
    }
}
