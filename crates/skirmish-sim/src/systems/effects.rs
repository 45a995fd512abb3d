//! Decay of transient visual and timed effect state.

use hecs::World;

use skirmish_core::components::{Base, Effects};
use skirmish_core::state::ImpactMarker;

pub fn run(world: &mut World, now: f64, dt: f32, impacts: &mut Vec<ImpactMarker>) {
    impacts.retain_mut(|marker| {
        marker.remaining -= dt;
        marker.remaining > 0.0
    });

    for (_entity, effects) in world.query_mut::<&mut Effects>() {
        if effects.melee_attack.is_some_and(|m| now >= m.until) {
            effects.melee_attack = None;
        }
        if effects.heal_pulse.is_some_and(|h| now >= h.until) {
            effects.heal_pulse = None;
        }
        // Dropping the buff reverts speed and damage.
        if effects.stat_buff.is_some_and(|b| now >= b.until) {
            effects.stat_buff = None;
        }
        if effects.shield_dome.is_some_and(|d| now >= d.until) {
            effects.shield_dome = None;
        }
    }

    for (_entity, base) in world.query_mut::<&mut Base>() {
        if base.laser_beam.is_some_and(|l| now >= l.until) {
            base.laser_beam = None;
        }
    }
}
