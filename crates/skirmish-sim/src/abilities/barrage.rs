//! Drone missile barrage: a fixed number of volleys at a fixed interval,
//! fanned sideways around the aim point.

use skirmish_core::components::MissileBarrage;
use skirmish_core::constants::*;
use skirmish_core::enums::ProjectileKind;
use skirmish_core::Vec2;

use super::{Ability, AbilityContext, AbilityEffect, Action, Caster};
use crate::projectile::Launch;

pub struct MissileBarrageAbility;

impl Ability for MissileBarrageAbility {
    fn name(&self) -> &'static str {
        "missile_barrage"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        if ctx.effects.missile_barrage.is_some() {
            return Vec::new();
        }
        let Some(target) = ctx.aim_point(BARRAGE_RANGE) else {
            return Vec::new();
        };
        vec![AbilityEffect::BeginBarrage(MissileBarrage {
            target,
            volleys_left: BARRAGE_VOLLEYS,
            next_volley_at: ctx.now,
            fired: 0,
        })]
    }
}

pub(crate) fn advance(slot: &mut Option<MissileBarrage>, caster: &Caster, actions: &mut Vec<Action>) {
    let Some(mut barrage) = *slot else {
        return;
    };

    if barrage.volleys_left > 0 && caster.now >= barrage.next_volley_at {
        let lateral = (barrage.target - caster.position)
            .try_normalize()
            .unwrap_or(Vec2::X)
            .perp();
        let spread = match barrage.fired % 3 {
            0 => 0.0,
            1 => BARRAGE_SPREAD,
            _ => -BARRAGE_SPREAD,
        };
        actions.push(Action::Launch(Launch {
            from: caster.position,
            target_pos: barrage.target + lateral * spread,
            target: None,
            speed: BARRAGE_MISSILE_SPEED,
            damage: BARRAGE_MISSILE_DAMAGE * caster.damage_multiplier,
            owner: caster.unit.owner,
            kind: ProjectileKind::Missile,
        }));
        barrage.fired += 1;
        barrage.volleys_left -= 1;
        barrage.next_volley_at += BARRAGE_INTERVAL_SECS;
    }

    *slot = (barrage.volleys_left > 0).then_some(barrage);
}
