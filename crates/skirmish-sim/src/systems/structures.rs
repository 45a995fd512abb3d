//! Structure behavior: turrets fire pooled projectiles at enemy units.

use hecs::World;

use skirmish_core::components::Structure;
use skirmish_core::defs::structure_def;
use skirmish_core::enums::ProjectileKind;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;

use crate::projectile::{Launch, ProjectileSet};
use crate::systems::combat;

pub fn run(world: &mut World, dt: f32, projectiles: &mut ProjectileSet, events: &mut Vec<SimEvent>) {
    let units = combat::collect_unit_targets(world);

    for (_entity, (structure, pos)) in world.query_mut::<(&mut Structure, &Position)>() {
        let def = structure_def(structure.kind);
        if structure.hp <= 0.0 || def.attack_rate <= 0.0 {
            continue;
        }
        structure.attack_cooldown = (structure.attack_cooldown - dt).max(0.0);
        if structure.attack_cooldown > 0.0 {
            continue;
        }
        let from = pos.0;
        let Some(target) = combat::nearest(
            units.iter().filter(|t| {
                t.owner != structure.owner
                    && !t.cloaked
                    && t.position.distance(from) <= def.attack_range
            }),
            from,
        ) else {
            continue;
        };

        structure.attack_cooldown = 1.0 / def.attack_rate;
        events.push(SimEvent::ProjectileFired {
            owner: structure.owner,
            kind: ProjectileKind::Standard,
            from,
        });
        projectiles.launch(Launch {
            from,
            target_pos: target.position,
            target: Some(target.target),
            speed: def.projectile_speed,
            damage: def.attack_damage,
            owner: structure.owner,
            kind: ProjectileKind::Standard,
        });
    }
}
