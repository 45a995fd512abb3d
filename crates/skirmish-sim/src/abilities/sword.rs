//! Swordsman three-swing combo.
//!
//! Swings 1 and 2 hit a semicircle in front of the combo direction, swing 3
//! hits a full circle. A pause separates swings; after swing 3 the combo
//! record stays until the reset pause ends, which blocks a new combo.

use skirmish_core::components::SwordCombo;
use skirmish_core::constants::*;
use skirmish_core::enums::DamageKind;
use skirmish_core::events::SimEvent;

use super::{Ability, AbilityContext, AbilityEffect, Action, Caster};
use crate::damage::AreaDamage;

pub struct SwordComboAbility;

impl Ability for SwordComboAbility {
    fn name(&self) -> &'static str {
        "sword_combo"
    }

    fn execute(&self, ctx: &AbilityContext) -> Vec<AbilityEffect> {
        if ctx.effects.sword_combo.is_some() {
            return Vec::new();
        }
        let Some(direction) = ctx.facing() else {
            return Vec::new();
        };
        vec![AbilityEffect::BeginCombo(SwordCombo {
            direction,
            next_swing: 1,
            next_swing_at: ctx.now,
            active_swing: None,
            active_until: ctx.now,
            reset_until: None,
        })]
    }
}

pub(crate) fn advance(
    slot: &mut Option<SwordCombo>,
    caster: &Caster,
    actions: &mut Vec<Action>,
    events: &mut Vec<SimEvent>,
) {
    let Some(mut combo) = *slot else {
        return;
    };

    if combo.active_swing.is_some() && caster.now >= combo.active_until {
        combo.active_swing = None;
    }

    if combo.next_swing <= 3 && caster.now >= combo.next_swing_at {
        let swing = combo.next_swing;
        let i = (swing - 1) as usize;
        actions.push(Action::Area(AreaDamage {
            owner: caster.unit.owner,
            center: caster.position,
            radius: SWING_RADIUS,
            amount: SWING_DAMAGE[i] * caster.damage_multiplier,
            kind: DamageKind::Melee,
            facing: (swing < 3).then_some(combo.direction),
            hits_buildings: true,
        }));
        events.push(SimEvent::ComboSwing {
            unit: caster.unit.id,
            swing,
        });

        combo.active_swing = Some(swing);
        combo.active_until = caster.now + SWING_DURATIONS_SECS[i];
        combo.next_swing = swing + 1;
        if swing < 3 {
            combo.next_swing_at = combo.active_until + SWING_PAUSE_SECS;
        } else {
            combo.reset_until = Some(combo.active_until + COMBO_RESET_SECS);
        }
    }

    let finished = combo.next_swing > 3
        && combo.active_swing.is_none()
        && combo.reset_until.is_some_and(|t| caster.now >= t);
    *slot = if finished { None } else { Some(combo) };
}
