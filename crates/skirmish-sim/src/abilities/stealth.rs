//! Shade reveal-then-strike: cloak breaks on cast, the knife flies after a
//! short delay, and the Shade recloaks after a further delay.

use skirmish_core::components::{Effects, StealthStrike};
use skirmish_core::constants::*;
use skirmish_core::enums::ProjectileKind;
use skirmish_core::events::SimEvent;

use super::{Ability, AbilityContext, AbilityEffect, Action, Caster};
use crate::projectile::Launch;

pub struct StealthStrikeAbility;

impl Ability for StealthStrikeAbility {
    fn name(&self) -> &'static str {
        "stealth_strike"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        if ctx.effects.stealth_strike.is_some() {
            return Vec::new();
        }
        let Some(target) = ctx.aim_point(KNIFE_RANGE) else {
            return Vec::new();
        };
        let knife_at = ctx.now + KNIFE_THROW_DELAY_SECS;
        vec![AbilityEffect::BeginStealthStrike(StealthStrike {
            target,
            knife_at,
            recloak_at: knife_at + RECLOAK_DELAY_SECS,
            knife_thrown: false,
        })]
    }
}

pub(crate) fn advance(
    effects: &mut Effects,
    caster: &Caster,
    actions: &mut Vec<Action>,
    events: &mut Vec<SimEvent>,
) {
    let Some(mut strike) = effects.stealth_strike else {
        return;
    };

    if !strike.knife_thrown && caster.now >= strike.knife_at {
        actions.push(Action::Launch(Launch {
            from: caster.position,
            target_pos: strike.target,
            target: None,
            speed: KNIFE_SPEED,
            damage: KNIFE_DAMAGE * caster.damage_multiplier,
            owner: caster.unit.owner,
            kind: ProjectileKind::Knife,
        }));
        strike.knife_thrown = true;
        events.push(SimEvent::KnifeThrown {
            unit: caster.unit.id,
            target: strike.target,
        });
    }

    if caster.now >= strike.recloak_at {
        effects.cloaked = true;
        effects.stealth_strike = None;
        events.push(SimEvent::Recloaked {
            unit: caster.unit.id,
        });
    } else {
        effects.stealth_strike = Some(strike);
    }
}
