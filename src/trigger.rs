//! Trigger-condition parsing: the text between a trigger keyword and the
//! first comma, reduced to an event type plus an optional qualifier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    EntersBattlefield,
    Dies,
    Attacks,
    Blocks,
    DrawCard,
    CastSpell,
    DealsDamage,
    GainsLife,
    BeginningOfUpkeep,
    BeginningOfEndStep,
    BeginningOfCombat,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub event: TriggerEvent,
    /// Who or what the event is scoped to ("you", "this", "each opponent").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// Verbatim trigger text, for anything the event enum flattens away.
    pub text: String,
}

/// Component confidence for a trigger whose event was not recognized.
pub const UNRECOGNIZED_TRIGGER_CONFIDENCE: f64 = 0.6;

/// Parses trigger text with the leading "when"/"whenever"/"at" keyword
/// already removed. Never fails; unrecognized events become
/// `TriggerEvent::Other`.
pub fn parse_trigger_text(text: &str) -> TriggerCondition {
    let text = text.trim().to_string();
    let words: Vec<&str> = text
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let has = |word: &str| words.iter().any(|w| *w == word);
    let has_phrase = |phrase: &[&str]| words.windows(phrase.len()).any(|w| w == phrase);

    let event = if has_phrase(&["the", "beginning", "of"]) || text.starts_with("the beginning of") {
        if has("upkeep") {
            TriggerEvent::BeginningOfUpkeep
        } else if has_phrase(&["end", "step"]) {
            TriggerEvent::BeginningOfEndStep
        } else if has("combat") {
            TriggerEvent::BeginningOfCombat
        } else {
            TriggerEvent::Other
        }
    } else if has("enters") {
        TriggerEvent::EntersBattlefield
    } else if has("dies") || has_phrase(&["is", "put", "into", "a", "graveyard"]) {
        TriggerEvent::Dies
    } else if has("attacks") || has("attack") {
        TriggerEvent::Attacks
    } else if has("blocks") || has_phrase(&["becomes", "blocked"]) {
        TriggerEvent::Blocks
    } else if has("draw") || has("draws") {
        TriggerEvent::DrawCard
    } else if has("cast") || has("casts") {
        TriggerEvent::CastSpell
    } else if has("damage") {
        TriggerEvent::DealsDamage
    } else if (has("gain") || has("gains")) && has("life") {
        TriggerEvent::GainsLife
    } else {
        TriggerEvent::Other
    };

    let qualifier = parse_qualifier(&words);

    TriggerCondition {
        event,
        qualifier,
        text,
    }
}

/// The subject in front of the event verb, when it is one of the usual
/// short forms.
fn parse_qualifier(words: &[&str]) -> Option<String> {
    match words {
        ["you", ..] => Some("you".to_string()),
        ["this", ..] => Some("this".to_string()),
        ["each", "opponent", ..] => Some("each opponent".to_string()),
        ["each", "player", ..] => Some("each player".to_string()),
        ["an", "opponent", ..] | ["opponent", ..] => Some("an opponent".to_string()),
        ["a", "creature", ..] | ["another", "creature", ..] => Some("a creature".to_string()),
        _ => None,
    }
}
