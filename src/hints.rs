//! Reward-hint synthesis: coarse numeric/boolean signals for downstream
//! reward shaping. Intentionally approximate — a heuristic, not a
//! card-economy simulator.

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityType, ParsedAbility};
use crate::effect::{Amount, EffectAction, TargetClass};
use crate::cost::CostComponent;
use crate::trigger::TriggerEvent;
use crate::types::{CardType, TypeLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardHints {
    /// True when some spell/triggered/activated ability resolves an
    /// unconditional effect with no delay.
    pub immediate_impact: bool,
    /// True for permanents whose payoff accrues over turns.
    pub delayed_impact: bool,
    /// True when an effect hits every player alike.
    pub symmetrical: bool,
    /// Net cards gained (+) or spent beyond one-for-one (−).
    pub card_advantage: i32,
}

pub fn synthesize(abilities: &[ParsedAbility], type_line: &TypeLine) -> RewardHints {
    RewardHints {
        immediate_impact: abilities.iter().any(|ability| {
            matches!(
                ability.ability_type,
                AbilityType::Spell | AbilityType::Triggered | AbilityType::Activated
            ) && ability.has_unconditional_effect()
        }),
        delayed_impact: type_line.has(CardType::Enchantment)
            || type_line.has(CardType::Artifact)
            || abilities.iter().any(|ability| {
                ability.trigger.as_ref().is_some_and(|trigger| {
                    matches!(
                        trigger.event,
                        TriggerEvent::BeginningOfUpkeep
                            | TriggerEvent::BeginningOfEndStep
                            | TriggerEvent::BeginningOfCombat
                    )
                })
            }),
        symmetrical: abilities.iter().any(|ability| {
            ability
                .effects
                .iter()
                .any(|effect| effect.target == TargetClass::EachPlayer)
        }),
        card_advantage: card_advantage(abilities),
    }
}

/// Signed card-count delta. Draws count positive; self-inflicted card
/// loss (discard/sacrifice costs, or effects aimed at you) counts
/// negative. Tokens and mana are not cards; searches are card-neutral.
fn card_advantage(abilities: &[ParsedAbility]) -> i32 {
    let mut delta = 0i32;
    for ability in abilities {
        for component in &ability.cost {
            match component {
                CostComponent::Discard(_) | CostComponent::Sacrifice(_) => delta -= 1,
                _ => {}
            }
        }
        for effect in &ability.effects {
            let count = match &effect.magnitude {
                Some(Amount::Fixed(n)) => *n as i32,
                Some(Amount::Variable(_)) | None => 1,
            };
            match effect.action {
                EffectAction::DrawCard if effect.target == TargetClass::You => {
                    delta += count;
                }
                EffectAction::Discard | EffectAction::Sacrifice
                    if effect.target == TargetClass::You =>
                {
                    delta -= count;
                }
                _ => {}
            }
        }
    }
    delta
}
