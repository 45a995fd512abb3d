//! Telegraphed area impacts: nothing lands before `impact_at`, damage is
//! applied only inside `[impact_at, end_at)`, then the effect clears.

use skirmish_core::components::{DelayedImpact, ImpactKind, ImpactMode};
use skirmish_core::constants::*;
use skirmish_core::enums::DamageKind;
use skirmish_core::state::ImpactMarker;

use super::{Ability, AbilityContext, AbilityEffect, Action, Caster};
use crate::damage::AreaDamage;

/// Artillery: continuous damage over an area after a delay.
pub struct Bombardment;

impl Ability for Bombardment {
    fn name(&self) -> &'static str {
        "bombardment"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        if ctx.effects.delayed_impact.is_some() {
            return Vec::new();
        }
        let Some(target) = ctx.aim_point(BOMBARDMENT_RANGE) else {
            return Vec::new();
        };
        let impact_at = ctx.now + BOMBARDMENT_DELAY_SECS;
        vec![AbilityEffect::Telegraph(DelayedImpact {
            kind: ImpactKind::Bombardment,
            target,
            radius: BOMBARDMENT_RADIUS,
            impact_at,
            end_at: impact_at + BOMBARDMENT_DURATION_SECS,
            mode: ImpactMode::Continuous {
                dps: BOMBARDMENT_DPS * ctx.damage_multiplier,
            },
        })]
    }
}

/// Uplink: one heavy hit after a long telegraph.
pub struct OrbitalStrike;

impl Ability for OrbitalStrike {
    fn name(&self) -> &'static str {
        "orbital_strike"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        if ctx.effects.delayed_impact.is_some() {
            return Vec::new();
        }
        let Some(target) = ctx.aim_point(ORBITAL_STRIKE_RANGE) else {
            return Vec::new();
        };
        let impact_at = ctx.now + ORBITAL_STRIKE_DELAY_SECS;
        vec![AbilityEffect::Telegraph(DelayedImpact {
            kind: ImpactKind::OrbitalStrike,
            target,
            radius: ORBITAL_STRIKE_RADIUS,
            impact_at,
            end_at: impact_at + ORBITAL_STRIKE_WINDOW_SECS,
            mode: ImpactMode::Instant {
                damage: ORBITAL_STRIKE_DAMAGE * ctx.damage_multiplier,
                resolved: false,
            },
        })]
    }
}

fn blast(caster: &Caster, impact: &DelayedImpact, amount: f32) -> Action {
    Action::Area(AreaDamage {
        owner: caster.unit.owner,
        center: impact.target,
        radius: impact.radius,
        amount,
        kind: DamageKind::Ability,
        facing: None,
        hits_buildings: true,
    })
}

pub(crate) fn advance(slot: &mut Option<DelayedImpact>, caster: &Caster, actions: &mut Vec<Action>) {
    let Some(mut impact) = *slot else {
        return;
    };
    if caster.now >= impact.end_at {
        *slot = None;
        return;
    }
    if caster.now < impact.impact_at {
        return;
    }

    let mode = impact.mode;
    match mode {
        ImpactMode::Continuous { dps } => actions.push(blast(caster, &impact, dps * caster.dt)),
        ImpactMode::Instant {
            damage,
            resolved: false,
        } => {
            actions.push(blast(caster, &impact, damage));
            actions.push(Action::Impact(ImpactMarker {
                position: impact.target,
                radius: impact.radius,
                remaining: IMPACT_MARKER_SECS,
            }));
            impact.mode = ImpactMode::Instant {
                damage,
                resolved: true,
            };
        }
        ImpactMode::Instant { resolved: true, .. } => {}
    }
    *slot = Some(impact);
}
