//! Ability assembly: groups classified clauses into complete abilities
//! with cost / trigger / effect linkage.
//!
//! The grouping is a strictly left-to-right single pass — no backtracking,
//! so termination and determinism come for free. An ability's confidence
//! is the minimum of its component confidences (weakest link).

use serde::{Deserialize, Serialize};

use crate::clause::{Clause, ClauseRole, keyword_entries};
use crate::cost::{self, CostComponent};
use crate::effect::{self, EffectAction, EffectDescriptor, TargetClass};
use crate::trigger::{self, TriggerCondition, TriggerEvent};

/// Cap for a clause no pattern recognized.
pub const UNCLASSIFIED_CONFIDENCE_CAP: f64 = 0.3;
/// Cap for an assembled ability with a cost or trigger but no effects.
pub const INCONSISTENT_CONFIDENCE_CAP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityType {
    Static,
    Triggered,
    Activated,
    Keyword,
    Spell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAbility {
    pub ability_type: AbilityType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cost: Vec<CostComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerCondition>,
    pub effects: Vec<EffectDescriptor>,
    /// Verbatim source text, retained even when nothing parsed.
    pub source_text: String,
    pub parse_confidence: f64,
}

impl ParsedAbility {
    /// True when any effect carries no condition.
    pub fn has_unconditional_effect(&self) -> bool {
        self.effects.iter().any(|effect| effect.condition.is_none())
    }
}

/// Assembles classified clauses into ordered abilities. Order matches
/// source-text order; every clause ends up in some ability's
/// `source_text` (no information loss).
pub fn assemble_abilities(clauses: &[Clause]) -> Vec<ParsedAbility> {
    let mut abilities: Vec<ParsedAbility> = Vec::new();
    // Source line of the ability a continuation clause may attach to.
    let mut attachable_line: Option<usize> = None;

    for clause in clauses {
        match clause.role {
            ClauseRole::Keyword => {
                abilities.extend(assemble_keywords(clause));
                attachable_line = None;
            }
            ClauseRole::Activated => {
                abilities.push(assemble_activated(clause));
                attachable_line = Some(clause.line);
            }
            ClauseRole::Triggered => {
                abilities.push(assemble_triggered(clause));
                attachable_line = Some(clause.line);
            }
            ClauseRole::SpellEffect | ClauseRole::Static | ClauseRole::Unclassified => {
                let extraction = effect::extract_effects(&clause.text);
                let mut confidence = extraction.confidence;
                if clause.role == ClauseRole::Unclassified {
                    confidence = confidence.min(UNCLASSIFIED_CONFIDENCE_CAP);
                }

                // A continuation sentence on the same oracle line extends
                // the preceding activated/triggered ability.
                if attachable_line == Some(clause.line)
                    && let Some(previous) = abilities.last_mut()
                    && matches!(
                        previous.ability_type,
                        AbilityType::Activated | AbilityType::Triggered
                    )
                {
                    previous.effects.extend(extraction.effects);
                    previous.source_text.push_str(". ");
                    previous.source_text.push_str(&clause.source);
                    previous.parse_confidence =
                        clamp(previous.parse_confidence.min(confidence));
                    continue;
                }

                let ability_type = if clause.role == ClauseRole::SpellEffect {
                    AbilityType::Spell
                } else {
                    AbilityType::Static
                };
                let effects = if clause.role == ClauseRole::Unclassified {
                    Vec::new()
                } else {
                    extraction.effects
                };
                abilities.push(ParsedAbility {
                    ability_type,
                    cost: Vec::new(),
                    trigger: None,
                    effects,
                    source_text: clause.source.clone(),
                    parse_confidence: clamp(confidence),
                });
                attachable_line = None;
            }
        }
    }

    abilities
}

fn assemble_keywords(clause: &Clause) -> Vec<ParsedAbility> {
    let entries = match keyword_entries(&clause.text) {
        Some(entries) => entries,
        None => vec![clause.text.clone()],
    };
    // Split the source line the same way so each keyword keeps its own
    // verbatim text.
    let sources: Vec<&str> = clause
        .source
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ParsedAbility {
            ability_type: AbilityType::Keyword,
            cost: Vec::new(),
            trigger: None,
            effects: vec![EffectDescriptor {
                action: EffectAction::GrantKeyword,
                target: TargetClass::SourceSelf,
                magnitude: None,
                condition: None,
            }],
            source_text: sources
                .get(index)
                .map(|source| source.to_string())
                .unwrap_or_else(|| entry.clone()),
            parse_confidence: 1.0,
        })
        .collect()
}

fn assemble_activated(clause: &Clause) -> ParsedAbility {
    let (left, right) = clause
        .text
        .split_once(':')
        .unwrap_or((clause.text.as_str(), ""));
    let parsed_cost = cost::parse_cost_text(left);
    let extraction = effect::extract_effects(right.trim());

    let mut confidence = parsed_cost.confidence.min(extraction.confidence);
    if extraction.effects.is_empty() && !parsed_cost.components.is_empty() {
        confidence = confidence.min(INCONSISTENT_CONFIDENCE_CAP);
    }

    ParsedAbility {
        ability_type: AbilityType::Activated,
        cost: parsed_cost.components,
        trigger: None,
        effects: extraction.effects,
        source_text: clause.source.clone(),
        parse_confidence: clamp(confidence),
    }
}

fn assemble_triggered(clause: &Clause) -> ParsedAbility {
    // "when"/"whenever" drop entirely; "at the beginning of" keeps its
    // phrase so the trigger parser can see which step it names.
    let body = clause
        .text
        .strip_prefix("whenever ")
        .or_else(|| clause.text.strip_prefix("when "))
        .or_else(|| clause.text.strip_prefix("at "))
        .unwrap_or(clause.text.as_str());

    let (trigger_text, effect_text) = match body.split_once(',') {
        Some((trigger_text, effect_text)) => (trigger_text.trim(), effect_text.trim()),
        None => (body.trim(), ""),
    };

    let condition = trigger::parse_trigger_text(trigger_text);
    let trigger_confidence = if condition.event == TriggerEvent::Other {
        trigger::UNRECOGNIZED_TRIGGER_CONFIDENCE
    } else {
        1.0
    };

    let extraction = effect::extract_effects(effect_text);
    let mut confidence = trigger_confidence.min(extraction.confidence);
    if extraction.effects.is_empty() {
        confidence = confidence.min(INCONSISTENT_CONFIDENCE_CAP);
    }

    ParsedAbility {
        ability_type: AbilityType::Triggered,
        cost: Vec::new(),
        trigger: Some(condition),
        effects: extraction.effects,
        source_text: clause.source.clone(),
        parse_confidence: clamp(confidence),
    }
}

fn clamp(confidence: f64) -> f64 {
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::classify;
    use crate::normalize::normalize_oracle_text;

    fn assemble(oracle_text: &str, name: &str, is_spell: bool) -> Vec<ParsedAbility> {
        let normalized = normalize_oracle_text(oracle_text, name);
        let clauses: Vec<Clause> = normalized
            .clauses
            .into_iter()
            .map(|raw| classify(raw, is_spell))
            .collect();
        assemble_abilities(&clauses)
    }

    #[test]
    fn spell_clause_becomes_spell_ability() {
        let abilities = assemble("Deal 3 damage to any target.", "Bolt", true);
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].ability_type, AbilityType::Spell);
        assert_eq!(abilities[0].effects.len(), 1);
        assert_eq!(abilities[0].parse_confidence, 1.0);
    }

    #[test]
    fn activated_ability_links_cost_and_effect() {
        let abilities = assemble("{T}: Add {C}{C}.", "Sol Ring", false);
        assert_eq!(abilities.len(), 1);
        let ability = &abilities[0];
        assert_eq!(ability.ability_type, AbilityType::Activated);
        assert_eq!(ability.cost, vec![CostComponent::Tap]);
        assert_eq!(ability.effects[0].action, EffectAction::AddMana);
    }

    #[test]
    fn triggered_ability_links_trigger_and_effect() {
        let abilities =
            assemble("Whenever you draw a card, draw a card.", "Loop", false);
        assert_eq!(abilities.len(), 1);
        let ability = &abilities[0];
        assert_eq!(ability.ability_type, AbilityType::Triggered);
        assert_eq!(
            ability.trigger.as_ref().unwrap().event,
            TriggerEvent::DrawCard
        );
        assert_eq!(ability.effects[0].action, EffectAction::DrawCard);
    }

    #[test]
    fn keyword_line_yields_one_ability_per_keyword() {
        let abilities = assemble("Flying, vigilance", "Serra Angel", false);
        assert_eq!(abilities.len(), 2);
        assert!(abilities.iter().all(|a| a.ability_type == AbilityType::Keyword));
        assert_eq!(abilities[0].source_text, "Flying");
        assert_eq!(abilities[1].source_text, "vigilance");
    }

    #[test]
    fn trailing_sentence_on_same_line_attaches_to_activated_ability() {
        let abilities = assemble(
            "{T}: Draw a card. Then discard a card.",
            "Looter",
            false,
        );
        assert_eq!(abilities.len(), 1);
        let ability = &abilities[0];
        assert_eq!(ability.ability_type, AbilityType::Activated);
        assert_eq!(ability.effects.len(), 2);
        assert!(ability.source_text.contains("Then discard a card"));
    }

    #[test]
    fn trigger_without_effect_is_flagged_inconsistent() {
        let abilities = assemble("Whenever this attacks, grumble warmly.", "Odd", false);
        assert_eq!(abilities.len(), 1);
        assert!(abilities[0].effects.is_empty());
        assert!(abilities[0].parse_confidence <= INCONSISTENT_CONFIDENCE_CAP);
    }

    #[test]
    fn unclassified_clause_is_kept_with_low_confidence() {
        let abilities = assemble("Blorb the snozzle quickly.", "Weird", false);
        assert_eq!(abilities.len(), 1);
        let ability = &abilities[0];
        assert_eq!(ability.ability_type, AbilityType::Static);
        assert!(ability.effects.is_empty());
        assert!(ability.parse_confidence <= UNCLASSIFIED_CONFIDENCE_CAP);
        assert_eq!(ability.source_text, "Blorb the snozzle quickly");
    }

    #[test]
    fn ability_order_matches_source_order() {
        let abilities = assemble(
            "Flying\nWhenever this attacks, draw a card.\n{T}: Add {G}.",
            "Ordered",
            false,
        );
        let types: Vec<AbilityType> =
            abilities.iter().map(|a| a.ability_type).collect();
        assert_eq!(
            types,
            vec![
                AbilityType::Keyword,
                AbilityType::Triggered,
                AbilityType::Activated
            ]
        );
    }
}
