//! Clause classification: each normalized clause gets a structural role,
//! decided by fixed pattern precedence so the first match wins.

use serde::{Deserialize, Serialize};

use crate::cost;
use crate::effect;
use crate::normalize::RawClause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseRole {
    Triggered,
    Activated,
    Keyword,
    Static,
    SpellEffect,
    Unclassified,
}

/// A classified clause. The role is immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub text: String,
    pub source: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub role: ClauseRole,
}

/// Evergreen and common keyword abilities, lowercase. Parameterized
/// entries ("ward", "protection") match by prefix.
pub static KEYWORD_LEXICON: &[&str] = &[
    "deathtouch",
    "defender",
    "double strike",
    "first strike",
    "flash",
    "flying",
    "haste",
    "hexproof",
    "indestructible",
    "lifelink",
    "menace",
    "reach",
    "trample",
    "vigilance",
    "ward",
    "protection",
    "prowess",
    "shroud",
    "fear",
    "intimidate",
    "flanking",
    "wither",
    "infect",
    "undying",
    "persist",
    "exalted",
    "changeling",
    "devoid",
    "phasing",
    "shadow",
    "horsemanship",
    "storm",
    "convoke",
    "delve",
    "improvise",
    "affinity",
];

/// True when the entry names one lexicon keyword, exactly or as a
/// parameterized prefix ("ward {2}", "protection from red").
fn is_lexicon_entry(entry: &str) -> bool {
    let entry = entry.trim();
    KEYWORD_LEXICON.iter().any(|keyword| {
        entry == *keyword
            || (entry.starts_with(keyword)
                && entry[keyword.len()..].starts_with([' ', '{']))
    })
}

/// True when any lexicon keyword appears as a word in the text. Used by
/// the grant-keyword effect rule.
pub fn contains_lexicon_keyword(text: &str) -> bool {
    text.split(|ch: char| !ch.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .any(|word| KEYWORD_LEXICON.contains(&word))
}

/// Splits a keyword line into its entries, or `None` when any entry
/// falls outside the lexicon.
pub fn keyword_entries(text: &str) -> Option<Vec<String>> {
    let entries: Vec<&str> = text
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.is_empty() || !entries.iter().all(|entry| is_lexicon_entry(entry)) {
        return None;
    }
    Some(entries.into_iter().map(str::to_string).collect())
}

const TRIGGER_OPENERS: &[&str] = &["when ", "whenever ", "at the beginning of "];

/// Static-ability signatures that carry no extractable verb but are
/// clearly continuous effects, not unparseable text.
const STATIC_SIGNATURES: &[&str] = &[
    " get +",
    " get -",
    " gets +",
    " gets -",
    " have ",
    " has ",
    "can't ",
    " can't",
    "enters tapped",
    "enters the battlefield tapped",
    " cost ",
    " costs ",
    "as long as",
    "spend mana as though",
];

/// Assigns a structural role by fixed precedence:
/// triggered, then activated, then keyword, then static/spell-effect,
/// then unclassified. Unclassified clauses are carried, never dropped.
pub fn classify(raw: RawClause, is_spell_card: bool) -> Clause {
    let role = classify_text(&raw.text, is_spell_card);
    Clause {
        text: raw.text,
        source: raw.source,
        start: raw.start,
        end: raw.end,
        line: raw.line,
        role,
    }
}

fn classify_text(text: &str, is_spell_card: bool) -> ClauseRole {
    if TRIGGER_OPENERS
        .iter()
        .any(|opener| text.starts_with(opener))
    {
        return ClauseRole::Triggered;
    }

    if let Some((left, _)) = text.split_once(':') {
        if cost::looks_like_cost(left) {
            return ClauseRole::Activated;
        }
    }

    if keyword_entries(text).is_some() {
        return ClauseRole::Keyword;
    }

    let has_structure = effect::matches_any_rule(text)
        || STATIC_SIGNATURES
            .iter()
            .any(|signature| text.contains(signature));
    if has_structure {
        return if is_spell_card {
            ClauseRole::SpellEffect
        } else {
            ClauseRole::Static
        };
    }

    ClauseRole::Unclassified
}
