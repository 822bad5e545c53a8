//! Strategic tagging: fixed rule-based classifiers, one per top-level
//! category, run over the assembled abilities plus card metadata.
//!
//! Each classifier is a pure function; there is no shared accumulator.
//! Tag confidence is the maximum over contributing abilities (one strong
//! signal is enough), discounted when the contributing effect is
//! conditional. Identical paths deduplicate keeping the highest score.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityType, ParsedAbility};
use crate::effect::{EffectAction, EffectDescriptor, TargetClass};
use crate::record::CardRecord;
use crate::types::{CardType, TypeLine};

/// Discount applied when the signal-bearing effect is conditional.
pub const CONDITIONAL_DISCOUNT: f64 = 0.8;
/// Confidence for tags justified by metadata alone (no parsed ability).
pub const METADATA_TAG_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicTag {
    /// Root-first category path, never empty.
    pub path: Vec<String>,
    pub confidence: f64,
}

impl StrategicTag {
    fn new(path: &[&str], confidence: f64) -> Self {
        Self {
            path: path.iter().map(|segment| segment.to_string()).collect(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn root(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategicTags {
    pub hierarchical_tags: Vec<StrategicTag>,
    /// Exactly the set of all path segments across `hierarchical_tags`.
    pub flattened_tags: BTreeSet<String>,
    pub archetype_hints: Vec<String>,
}

/// Read-only view the classifiers share.
struct TagContext<'a> {
    abilities: &'a [ParsedAbility],
    type_line: TypeLine,
    cmc: f64,
    power: Option<i64>,
    has_flash: bool,
}

type CategoryClassifier = fn(&TagContext) -> Vec<StrategicTag>;

/// The fixed taxonomy, one classifier per top-level category.
static CATEGORY_CLASSIFIERS: &[CategoryClassifier] = &[
    classify_interaction,
    classify_tempo,
    classify_value,
    classify_ramp,
    classify_win_condition,
    classify_protection,
];

/// Derives hierarchical and flattened strategic tags plus archetype
/// hints for one card.
pub fn tag_card(abilities: &[ParsedAbility], record: &CardRecord) -> StrategicTags {
    let context = TagContext {
        abilities,
        type_line: record.type_line(),
        cmc: record.cmc,
        power: record.power.as_deref().and_then(|p| p.parse::<i64>().ok()),
        has_flash: has_keyword(abilities, record, "flash"),
    };

    let mut hierarchical_tags: Vec<StrategicTag> = Vec::new();
    for classifier in CATEGORY_CLASSIFIERS {
        for tag in classifier(&context) {
            merge_tag(&mut hierarchical_tags, tag);
        }
    }

    let flattened_tags = hierarchical_tags
        .iter()
        .flat_map(|tag| tag.path.iter().cloned())
        .collect();
    let archetype_hints = archetype_hints(&context, &hierarchical_tags);

    StrategicTags {
        hierarchical_tags,
        flattened_tags,
        archetype_hints,
    }
}

/// Inserts a tag, deduplicating identical paths by keeping the highest
/// confidence. Insertion order is preserved for the survivors.
fn merge_tag(tags: &mut Vec<StrategicTag>, tag: StrategicTag) {
    if let Some(existing) = tags.iter_mut().find(|t| t.path == tag.path) {
        if tag.confidence > existing.confidence {
            existing.confidence = tag.confidence;
        }
        return;
    }
    tags.push(tag);
}

/// Maximum discounted confidence over abilities with a matching effect.
fn effect_signal(
    abilities: &[ParsedAbility],
    matches: impl Fn(&EffectDescriptor) -> bool,
) -> Option<f64> {
    let mut best: Option<f64> = None;
    for ability in abilities {
        for effect in &ability.effects {
            if !matches(effect) {
                continue;
            }
            let mut confidence = ability.parse_confidence;
            if effect.condition.is_some() {
                confidence *= CONDITIONAL_DISCOUNT;
            }
            best = Some(best.map_or(confidence, |b: f64| b.max(confidence)));
        }
    }
    best
}

fn has_keyword(abilities: &[ParsedAbility], record: &CardRecord, keyword: &str) -> bool {
    record
        .keywords
        .iter()
        .any(|k| k.eq_ignore_ascii_case(keyword))
        || abilities.iter().any(|ability| {
            ability.ability_type == AbilityType::Keyword
                && ability.source_text.to_ascii_lowercase().contains(keyword)
        })
}

fn targets_board(target: TargetClass) -> bool {
    matches!(
        target,
        TargetClass::Creature
            | TargetClass::Permanent
            | TargetClass::Land
            | TargetClass::AnyTarget
            | TargetClass::Unspecified
    )
}

fn targets_opponent_hand(target: TargetClass) -> bool {
    matches!(
        target,
        TargetClass::Opponent
            | TargetClass::Player
            | TargetClass::EachOpponent
            | TargetClass::EachPlayer
    )
}

fn classify_interaction(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        matches!(e.action, EffectAction::Destroy | EffectAction::Exile)
            && targets_board(e.target)
    }) {
        tags.push(StrategicTag::new(&["interaction", "removal"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::DealDamage
    }) {
        tags.push(StrategicTag::new(&["interaction", "burn"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::CounterSpell
    }) {
        tags.push(StrategicTag::new(&["interaction", "counter"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::Discard && targets_opponent_hand(e.target)
    }) {
        tags.push(StrategicTag::new(&["interaction", "discard"], confidence));
    }
    tags
}

fn classify_tempo(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::ReturnToHand && targets_board(e.target)
    }) {
        tags.push(StrategicTag::new(&["tempo", "bounce"], confidence));
    }
    if context.cmc <= 2.0 {
        let interaction = classify_interaction(context);
        if let Some(best) = interaction
            .iter()
            .map(|tag| tag.confidence)
            .max_by(|a, b| a.total_cmp(b))
        {
            tags.push(StrategicTag::new(
                &["tempo", "low_cost_interaction"],
                best,
            ));
        }
    }
    tags
}

fn classify_value(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) =
        effect_signal(context.abilities, |e| e.action == EffectAction::DrawCard)
    {
        tags.push(StrategicTag::new(&["value", "card_draw"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::SearchLibrary
    }) {
        tags.push(StrategicTag::new(&["value", "tutoring"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::CreateToken
    }) {
        tags.push(StrategicTag::new(
            &["value", "token_generation"],
            confidence,
        ));
    }
    tags
}

fn classify_ramp(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) =
        effect_signal(context.abilities, |e| e.action == EffectAction::AddMana)
    {
        tags.push(StrategicTag::new(&["ramp", "mana_acceleration"], confidence));
    }
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::SearchLibrary && e.target == TargetClass::Land
    }) {
        tags.push(StrategicTag::new(&["ramp", "land_fetch"], confidence));
    }
    tags
}

fn classify_win_condition(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) =
        effect_signal(context.abilities, |e| e.action == EffectAction::WinGame)
    {
        tags.push(StrategicTag::new(&["win_condition", "combo"], confidence));
    }
    if context.type_line.has(CardType::Creature)
        && context.power.is_some_and(|power| power >= 5)
    {
        tags.push(StrategicTag::new(
            &["win_condition", "finisher"],
            METADATA_TAG_CONFIDENCE,
        ));
    }
    tags
}

fn classify_protection(context: &TagContext) -> Vec<StrategicTag> {
    let mut tags = Vec::new();
    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::PreventDamage
    }) {
        tags.push(StrategicTag::new(&["protection", "prevention"], confidence));
    }

    const RESILIENCE_KEYWORDS: &[&str] =
        &["hexproof", "indestructible", "ward", "protection", "shroud"];
    let resilient = context.abilities.iter().any(|ability| {
        ability.ability_type == AbilityType::Keyword
            && RESILIENCE_KEYWORDS
                .iter()
                .any(|k| ability.source_text.to_ascii_lowercase().starts_with(k))
    });
    if resilient {
        tags.push(StrategicTag::new(&["protection", "resilience"], 1.0));
    }

    if let Some(confidence) = effect_signal(context.abilities, |e| {
        e.action == EffectAction::GrantKeyword && e.target != TargetClass::SourceSelf
    }) {
        tags.push(StrategicTag::new(&["protection", "grants"], confidence));
    }
    tags
}

/// Coarse deck-style labels from aggregate evidence across categories.
fn archetype_hints(context: &TagContext, tags: &[StrategicTag]) -> Vec<String> {
    let root_confidence = |root: &str| -> Option<f64> {
        tags.iter()
            .filter(|tag| tag.root() == root)
            .map(|tag| tag.confidence)
            .max_by(|a, b| a.total_cmp(b))
    };

    let mut hints = Vec::new();
    let mut push = |hint: &str| {
        if !hints.iter().any(|h: &String| h == hint) {
            hints.push(hint.to_string());
        }
    };

    let aggressive = context.type_line.has(CardType::Creature)
        || root_confidence("interaction").is_some();
    if context.cmc <= 2.0 && aggressive {
        push("aggro");
    }
    if root_confidence("interaction").is_some_and(|c| c >= 0.5) || context.cmc >= 6.0 {
        push("control");
    }
    if context.type_line.has(CardType::Instant) || context.has_flash {
        push("tempo");
    }
    if root_confidence("ramp").is_some() {
        push("ramp");
    }
    if root_confidence("win_condition").is_some_and(|c| c >= 0.5) {
        push("combo");
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::assemble_abilities;
    use crate::clause::{Clause, classify};
    use crate::normalize::normalize_oracle_text;

    fn parse(record: &CardRecord) -> Vec<ParsedAbility> {
        let normalized = normalize_oracle_text(&record.oracle_text, &record.name);
        let is_spell = record.type_line().is_spell_only();
        let clauses: Vec<Clause> = normalized
            .clauses
            .into_iter()
            .map(|raw| classify(raw, is_spell))
            .collect();
        assemble_abilities(&clauses)
    }

    fn bolt() -> CardRecord {
        CardRecord {
            name: "Lightning Bolt".to_string(),
            oracle_text: "Lightning Bolt deals 3 damage to any target.".to_string(),
            type_line: "Instant".to_string(),
            cmc: 1.0,
            ..CardRecord::default()
        }
    }

    #[test]
    fn burn_spell_is_tagged_interaction() {
        let record = bolt();
        let abilities = parse(&record);
        let tags = tag_card(&abilities, &record);
        let burn = tags
            .hierarchical_tags
            .iter()
            .find(|tag| tag.path == ["interaction", "burn"])
            .expect("burn tag");
        assert!(burn.confidence >= 0.8);
        assert!(tags.flattened_tags.contains("interaction"));
        assert!(tags.archetype_hints.contains(&"aggro".to_string()));
    }

    #[test]
    fn mana_rock_is_tagged_ramp() {
        let record = CardRecord {
            name: "Sol Ring".to_string(),
            oracle_text: "{T}: Add {C}{C}.".to_string(),
            type_line: "Artifact".to_string(),
            cmc: 1.0,
            ..CardRecord::default()
        };
        let abilities = parse(&record);
        let tags = tag_card(&abilities, &record);
        let ramp = tags
            .hierarchical_tags
            .iter()
            .find(|tag| tag.root() == "ramp")
            .expect("ramp tag");
        assert!(ramp.confidence >= 0.8);
        assert!(tags.archetype_hints.contains(&"ramp".to_string()));
    }

    #[test]
    fn conditional_effect_is_discounted() {
        let record = CardRecord {
            name: "Longshot".to_string(),
            oracle_text:
                "If you control a mountain, Longshot deals 4 damage to any target."
                    .to_string(),
            type_line: "Sorcery".to_string(),
            cmc: 3.0,
            ..CardRecord::default()
        };
        let abilities = parse(&record);
        let tags = tag_card(&abilities, &record);
        let burn = tags
            .hierarchical_tags
            .iter()
            .find(|tag| tag.path == ["interaction", "burn"])
            .expect("burn tag");
        assert!((burn.confidence - CONDITIONAL_DISCOUNT).abs() < 1e-9);
    }

    #[test]
    fn duplicate_paths_keep_highest_confidence() {
        let mut tags = Vec::new();
        merge_tag(&mut tags, StrategicTag::new(&["value", "card_draw"], 0.4));
        merge_tag(&mut tags, StrategicTag::new(&["value", "card_draw"], 0.9));
        merge_tag(&mut tags, StrategicTag::new(&["value", "card_draw"], 0.6));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].confidence, 0.9);
    }

    #[test]
    fn flattened_is_union_of_paths() {
        let record = CardRecord {
            name: "Mixed".to_string(),
            oracle_text: "Destroy target creature. Draw a card.".to_string(),
            type_line: "Sorcery".to_string(),
            cmc: 4.0,
            ..CardRecord::default()
        };
        let abilities = parse(&record);
        let tags = tag_card(&abilities, &record);
        let expected: BTreeSet<String> = tags
            .hierarchical_tags
            .iter()
            .flat_map(|tag| tag.path.iter().cloned())
            .collect();
        assert_eq!(tags.flattened_tags, expected);
        assert!(tags.flattened_tags.contains("removal"));
        assert!(tags.flattened_tags.contains("card_draw"));
    }

    #[test]
    fn no_abilities_yields_metadata_only_tags() {
        let record = CardRecord {
            name: "Vanilla Giant".to_string(),
            type_line: "Creature — Giant".to_string(),
            power: Some("5".to_string()),
            toughness: Some("5".to_string()),
            cmc: 5.0,
            ..CardRecord::default()
        };
        let tags = tag_card(&[], &record);
        assert!(tags
            .hierarchical_tags
            .iter()
            .any(|tag| tag.path == ["win_condition", "finisher"]));
    }
}
