//! Abilities that resolve within the casting frame.

use skirmish_core::components::{ShieldDome, StatBuff};
use skirmish_core::constants::*;

use super::{Ability, AbilityContext, AbilityEffect};

/// Guardian: dome that softens ranged and melee hits on nearby allies.
pub struct ShieldDomeAbility;

impl Ability for ShieldDomeAbility {
    fn name(&self) -> &'static str {
        "shield_dome"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        vec![AbilityEffect::RaiseDome(ShieldDome {
            radius: SHIELD_DOME_RADIUS,
            ranged_multiplier: SHIELD_DOME_RANGED_MULTIPLIER,
            melee_multiplier: SHIELD_DOME_MELEE_MULTIPLIER,
            until: ctx.now + SHIELD_DOME_DURATION_SECS,
        })]
    }
}

/// Medic: heals every ally around the caster.
pub struct HealPulseAbility;

impl Ability for HealPulseAbility {
    fn name(&self) -> &'static str {
        "heal_pulse"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        vec![AbilityEffect::Heal {
            center: ctx.position,
            radius: HEAL_PULSE_RADIUS,
            amount: HEAL_PULSE_AMOUNT,
            visual_until: ctx.now + HEAL_PULSE_VISUAL_SECS,
        }]
    }
}

/// Herald: temporary speed and damage boost around the caster.
pub struct Rally;

impl Ability for Rally {
    fn name(&self) -> &'static str {
        "rally"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        vec![AbilityEffect::Buff {
            center: ctx.position,
            radius: RALLY_RADIUS,
            buff: StatBuff {
                speed_multiplier: RALLY_SPEED_MULTIPLIER,
                damage_multiplier: RALLY_DAMAGE_MULTIPLIER,
                until: ctx.now + RALLY_DURATION_SECS,
            },
        }]
    }
}

/// Rifleman: instant area damage at the aim point.
pub struct Grenade;

impl Ability for Grenade {
    fn name(&self) -> &'static str {
        "grenade"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        let Some(center) = ctx.aim_point(GRENADE_RANGE) else {
            return Vec::new();
        };
        vec![AbilityEffect::Blast {
            center,
            radius: GRENADE_RADIUS,
            damage: GRENADE_DAMAGE * ctx.damage_multiplier,
        }]
    }
}
