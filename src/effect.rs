//! Effect extraction: an ordered table of verb-pattern rules that maps
//! normalized clause text to structured effect descriptors.
//!
//! Rules are evaluated top to bottom; the first structural match per
//! conjunct wins. Unmatched conjuncts never fail the pipeline — they cost
//! confidence and leave the source text intact for the assembled ability.

use serde::{Deserialize, Serialize};

use crate::mana;

/// Confidence subtracted for each conjunct no rule matches.
pub const UNMATCHED_CONJUNCT_PENALTY: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectAction {
    DealDamage,
    DrawCard,
    Destroy,
    Exile,
    CounterSpell,
    ReturnToHand,
    CreateToken,
    GainLife,
    LoseLife,
    SearchLibrary,
    AddMana,
    Discard,
    Sacrifice,
    Mill,
    Scry,
    Tap,
    Untap,
    PreventDamage,
    PumpStats,
    WinGame,
    GrantKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetClass {
    /// The card carrying the ability ("this").
    SourceSelf,
    AnyTarget,
    Creature,
    Permanent,
    Player,
    Opponent,
    EachOpponent,
    EachPlayer,
    You,
    Spell,
    Land,
    Card,
    Unspecified,
}

/// A literal or symbolic magnitude. `Fixed(3)` serializes as `3`,
/// `Variable("X")` as `"X"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Fixed(i64),
    Variable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    If,
    Unless,
    Only,
}

/// A structured-enough predicate: the kind of gate plus its verbatim text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub action: EffectAction,
    pub target: TargetClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl EffectDescriptor {
    fn new(action: EffectAction, target: TargetClass) -> Self {
        Self {
            action,
            target,
            magnitude: None,
            condition: None,
        }
    }

    fn with_magnitude(mut self, magnitude: Option<Amount>) -> Self {
        self.magnitude = magnitude;
        self
    }
}

/// Result of extracting one clause's effect-bearing text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub effects: Vec<EffectDescriptor>,
    pub matched: usize,
    pub unmatched: usize,
    /// 1.0 minus the per-conjunct penalties, floored at 0.0.
    pub confidence: f64,
}

/// One entry of the ordered rule table.
struct EffectRule {
    name: &'static str,
    matcher: fn(&Conjunct) -> Option<EffectDescriptor>,
}

/// A single conjunct, pre-tokenized for the matchers.
struct Conjunct<'a> {
    text: &'a str,
    words: Vec<&'a str>,
}

impl<'a> Conjunct<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            words: text
                .split(|ch: char| !ch.is_ascii_alphanumeric() && ch != '/' && ch != '+' && ch != '-')
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    fn has(&self, word: &str) -> bool {
        self.words.iter().any(|w| *w == word)
    }

    fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| *w == word)
    }

    fn has_phrase(&self, phrase: &[&str]) -> bool {
        self.words.windows(phrase.len()).any(|w| w == phrase)
    }
}

fn trace_enabled() -> bool {
    std::env::var("CARD_IR_PARSER_TRACE")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn trace_rule(rule: &str, conjunct: &str) {
    if trace_enabled() {
        eprintln!("[card-ir-parser] rule={rule} conjunct='{conjunct}'");
    }
}

/// Extracts descriptors from one clause's effect-bearing substring.
/// Never fails: unmatched text only lowers the returned confidence.
pub fn extract_effects(text: &str) -> Extraction {
    let (condition, body) = peel_condition(text);

    let mut extraction = Extraction {
        confidence: 1.0,
        ..Extraction::default()
    };

    for part in split_conjuncts(&body) {
        let part = part
            .trim()
            .trim_start_matches("then ")
            .trim_matches(|ch: char| ch == ',' || ch.is_whitespace());
        if part.is_empty() {
            continue;
        }
        let conjunct = Conjunct::new(part);
        match apply_rules(&conjunct) {
            Some(mut descriptor) => {
                descriptor.condition = condition.clone();
                extraction.effects.push(descriptor);
                extraction.matched += 1;
            }
            None => {
                trace_rule("<unmatched>", part);
                extraction.unmatched += 1;
            }
        }
    }

    extraction.confidence =
        (1.0 - extraction.unmatched as f64 * UNMATCHED_CONJUNCT_PENALTY).max(0.0);
    extraction
}

/// True when at least one rule matches somewhere in the clause. Used by
/// the classifier to tell static text apart from unparseable text.
pub fn matches_any_rule(text: &str) -> bool {
    extract_effects(text).matched > 0
}

fn apply_rules(conjunct: &Conjunct) -> Option<EffectDescriptor> {
    for rule in EFFECT_RULES {
        if let Some(descriptor) = (rule.matcher)(conjunct) {
            trace_rule(rule.name, conjunct.text);
            return Some(descriptor);
        }
    }
    None
}

/// Peels a leading "if <cond>," or trailing "unless <cond>" gate off the
/// clause, returning the predicate and the remaining effect text.
fn peel_condition(text: &str) -> (Option<Condition>, String) {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("if ") {
        if let Some(comma) = rest.find(',') {
            let predicate = rest[..comma].trim().to_string();
            let body = rest[comma + 1..].trim().to_string();
            return (
                Some(Condition {
                    kind: ConditionKind::If,
                    text: predicate,
                }),
                body,
            );
        }
    }

    if let Some(idx) = trimmed.find(" unless ") {
        let body = trimmed[..idx].trim().to_string();
        let predicate = trimmed[idx + " unless ".len()..].trim().to_string();
        return (
            Some(Condition {
                kind: ConditionKind::Unless,
                text: predicate,
            }),
            body,
        );
    }

    (None, trimmed.to_string())
}

/// Verbs that may open an independent conjunct. A separator only splits
/// when what follows starts with one of these (protects "flying and
/// trample" and "creatures you control get +1/+1 and have trample").
const CONJUNCT_VERBS: &[&str] = &[
    "deal", "deals", "draw", "draws", "destroy", "exile", "counter", "return",
    "create", "creates", "gain", "gains", "lose", "loses", "search", "discard",
    "discards", "sacrifice", "sacrifices", "mill", "mills", "scry", "tap",
    "untap", "prevent", "add", "win", "wins",
];

fn split_conjuncts(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;

    'outer: loop {
        for (idx, sep) in separator_positions(rest) {
            let after = rest[idx + sep.len()..].trim_start();
            // The verb may hide behind a short subject ("then", "you",
            // "each opponent"), so look at the first few words.
            let opens_conjunct = after
                .split_whitespace()
                .take(3)
                .any(|word| CONJUNCT_VERBS.contains(&word));
            if opens_conjunct {
                parts.push(rest[..idx].to_string());
                rest = &rest[idx + sep.len()..];
                continue 'outer;
            }
        }
        parts.push(rest.to_string());
        break;
    }

    parts
}

/// Candidate separator occurrences in left-to-right order.
fn separator_positions(text: &str) -> Vec<(usize, &'static str)> {
    let mut positions = Vec::new();
    for sep in [", and ", " and ", ", then ", ", "] {
        let mut from = 0;
        while let Some(found) = text[from..].find(sep) {
            positions.push((from + found, sep));
            from += found + 1;
        }
    }
    positions.sort_by_key(|(idx, _)| *idx);
    positions
}

/// Parses a literal or word number; "a"/"an" count as one, "x" is the
/// cost variable.
fn parse_amount(word: &str) -> Option<Amount> {
    if let Ok(n) = word.parse::<i64>() {
        return Some(Amount::Fixed(n));
    }
    let fixed = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "x" => return Some(Amount::Variable("X".to_string())),
        _ => return None,
    };
    Some(Amount::Fixed(fixed))
}

/// Best-effort target classification from the conjunct's noun phrases.
fn parse_target(conjunct: &Conjunct, default: TargetClass) -> TargetClass {
    if conjunct.has_phrase(&["any", "target"]) {
        return TargetClass::AnyTarget;
    }
    if conjunct.has_phrase(&["each", "opponent"]) {
        return TargetClass::EachOpponent;
    }
    if conjunct.has_phrase(&["each", "player"]) || conjunct.has_phrase(&["all", "players"]) {
        return TargetClass::EachPlayer;
    }
    if let Some(idx) = conjunct.position("target") {
        match conjunct.words.get(idx + 1).copied() {
            Some("creature") => return TargetClass::Creature,
            Some("player") => return TargetClass::Player,
            Some("opponent") => return TargetClass::Opponent,
            Some("permanent") => return TargetClass::Permanent,
            Some("artifact") | Some("enchantment") | Some("planeswalker") => {
                return TargetClass::Permanent;
            }
            Some("land") => return TargetClass::Land,
            Some("spell") => return TargetClass::Spell,
            Some("card") => return TargetClass::Card,
            _ => return TargetClass::Unspecified,
        }
    }
    default
}

// === Rule matchers, in table order ===

fn match_prevent_damage(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"prevent") || !c.has("damage") {
        return None;
    }
    // Articles ("dealt to a creature") are not prevention amounts.
    let magnitude = c
        .words
        .iter()
        .skip(1)
        .find_map(|word| match *word {
            "a" | "an" => None,
            other => parse_amount(other),
        });
    Some(
        EffectDescriptor::new(EffectAction::PreventDamage, parse_target(c, TargetClass::Unspecified))
            .with_magnitude(magnitude),
    )
}

fn match_deal_damage(c: &Conjunct) -> Option<EffectDescriptor> {
    let damage_idx = c.position("damage")?;
    let verbed = c.has("deal") || c.has("deals");
    let amount = damage_idx
        .checked_sub(1)
        .and_then(|idx| parse_amount(c.words[idx]));
    if !verbed && amount.is_none() {
        return None;
    }
    Some(
        EffectDescriptor::new(EffectAction::DealDamage, parse_target(c, TargetClass::AnyTarget))
            .with_magnitude(amount),
    )
}

fn match_counter_spell(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"counter") {
        return None;
    }
    Some(EffectDescriptor::new(
        EffectAction::CounterSpell,
        TargetClass::Spell,
    ))
}

fn match_destroy(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"destroy") {
        return None;
    }
    Some(EffectDescriptor::new(
        EffectAction::Destroy,
        parse_target(c, destroy_class(c)),
    ))
}

fn match_exile(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"exile") {
        return None;
    }
    let default = if c.has("graveyard") {
        TargetClass::Card
    } else {
        destroy_class(c)
    };
    Some(EffectDescriptor::new(EffectAction::Exile, parse_target(c, default)))
}

/// Shared default-target logic for removal verbs without "target".
fn destroy_class(c: &Conjunct) -> TargetClass {
    if c.has("creature") || c.has("creatures") {
        TargetClass::Creature
    } else if c.has("land") || c.has("lands") {
        TargetClass::Land
    } else {
        TargetClass::Permanent
    }
}

fn match_return_to_hand(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"return") || !(c.has("hand") || c.has("hands")) {
        return None;
    }
    let default = if c.has("graveyard") {
        TargetClass::Card
    } else {
        destroy_class(c)
    };
    Some(EffectDescriptor::new(
        EffectAction::ReturnToHand,
        parse_target(c, default),
    ))
}

fn match_draw_card(c: &Conjunct) -> Option<EffectDescriptor> {
    let draw_idx = c.position("draw").or_else(|| c.position("draws"))?;
    if !(c.has("card") || c.has("cards")) {
        return None;
    }
    let amount = c
        .words
        .get(draw_idx + 1)
        .and_then(|word| parse_amount(word))
        .or(Some(Amount::Fixed(1)));
    let default = if c.words.first() == Some(&"target") {
        TargetClass::Player
    } else {
        TargetClass::You
    };
    Some(
        EffectDescriptor::new(EffectAction::DrawCard, parse_target(c, default))
            .with_magnitude(amount),
    )
}

fn match_discard(c: &Conjunct) -> Option<EffectDescriptor> {
    let idx = c.position("discard").or_else(|| c.position("discards"))?;
    let amount = c
        .words
        .get(idx + 1)
        .and_then(|word| parse_amount(word))
        .or(Some(Amount::Fixed(1)));
    Some(
        EffectDescriptor::new(EffectAction::Discard, parse_target(c, TargetClass::You))
            .with_magnitude(amount),
    )
}

fn match_search_library(c: &Conjunct) -> Option<EffectDescriptor> {
    if !c.has("search") || !(c.has("library") || c.has("libraries")) {
        return None;
    }
    let target = if c.has("land") || c.has("plains") || c.has("island")
        || c.has("swamp") || c.has("mountain") || c.has("forest")
    {
        TargetClass::Land
    } else {
        TargetClass::Card
    };
    Some(EffectDescriptor::new(EffectAction::SearchLibrary, target))
}

fn match_create_token(c: &Conjunct) -> Option<EffectDescriptor> {
    if !(c.has("create") || c.has("creates")) || !(c.has("token") || c.has("tokens")) {
        return None;
    }
    let idx = c.position("create").or_else(|| c.position("creates"))?;
    let amount = c
        .words
        .get(idx + 1)
        .and_then(|word| parse_amount(word))
        .or(Some(Amount::Fixed(1)));
    Some(
        EffectDescriptor::new(EffectAction::CreateToken, TargetClass::You)
            .with_magnitude(amount),
    )
}

fn match_gain_life(c: &Conjunct) -> Option<EffectDescriptor> {
    let idx = c.position("gain").or_else(|| c.position("gains"))?;
    if !c.has("life") {
        return None;
    }
    let amount = c.words.get(idx + 1).and_then(|word| parse_amount(word));
    Some(
        EffectDescriptor::new(EffectAction::GainLife, parse_target(c, TargetClass::You))
            .with_magnitude(amount),
    )
}

fn match_lose_life(c: &Conjunct) -> Option<EffectDescriptor> {
    let idx = c.position("lose").or_else(|| c.position("loses"))?;
    if !c.has("life") {
        return None;
    }
    let amount = c.words.get(idx + 1).and_then(|word| parse_amount(word));
    let default = if c.words.first() == Some(&"you") {
        TargetClass::You
    } else {
        TargetClass::Player
    };
    Some(
        EffectDescriptor::new(EffectAction::LoseLife, parse_target(c, default))
            .with_magnitude(amount),
    )
}

fn match_add_mana(c: &Conjunct) -> Option<EffectDescriptor> {
    if c.words.first() != Some(&"add") {
        return None;
    }
    // "add {c}{c}" or "add one mana of any color"
    let magnitude = if let Some(groups) = brace_mana_value(c.text) {
        Some(groups)
    } else if c.has("mana") {
        c.words.iter().skip(1).find_map(|word| parse_amount(word))
    } else {
        return None;
    };
    Some(
        EffectDescriptor::new(EffectAction::AddMana, TargetClass::You)
            .with_magnitude(magnitude),
    )
}

/// Total mana value of the brace groups in an "add {..}" conjunct, or
/// `None` when the text carries no parseable mana braces.
fn brace_mana_value(text: &str) -> Option<Amount> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let cost = mana::ManaCost::parse(&text[start..=end])?;
    if cost.is_empty() {
        return None;
    }
    if cost
        .pips()
        .iter()
        .any(|pip| pip.iter().any(|s| matches!(s, mana::ManaSymbol::X)))
    {
        return Some(Amount::Variable("X".to_string()));
    }
    Some(Amount::Fixed(cost.mana_value() as i64))
}

fn match_sacrifice(c: &Conjunct) -> Option<EffectDescriptor> {
    if !(c.has("sacrifice") || c.has("sacrifices")) {
        return None;
    }
    Some(EffectDescriptor::new(
        EffectAction::Sacrifice,
        parse_target(c, TargetClass::You),
    ))
}

fn match_mill(c: &Conjunct) -> Option<EffectDescriptor> {
    let idx = c.position("mill").or_else(|| c.position("mills"))?;
    let amount = c.words.get(idx + 1).and_then(|word| parse_amount(word));
    Some(
        EffectDescriptor::new(EffectAction::Mill, parse_target(c, TargetClass::You))
            .with_magnitude(amount),
    )
}

fn match_scry(c: &Conjunct) -> Option<EffectDescriptor> {
    let idx = c.position("scry")?;
    let amount = c.words.get(idx + 1).and_then(|word| parse_amount(word));
    Some(
        EffectDescriptor::new(EffectAction::Scry, TargetClass::You)
            .with_magnitude(amount),
    )
}

fn match_tap_untap(c: &Conjunct) -> Option<EffectDescriptor> {
    let action = match c.words.first() {
        Some(&"tap") => EffectAction::Tap,
        Some(&"untap") => EffectAction::Untap,
        _ => return None,
    };
    Some(EffectDescriptor::new(
        action,
        parse_target(c, TargetClass::Permanent),
    ))
}

fn match_win_game(c: &Conjunct) -> Option<EffectDescriptor> {
    if (c.has("win") || c.has("wins")) && c.has_phrase(&["the", "game"]) {
        return Some(EffectDescriptor::new(EffectAction::WinGame, TargetClass::You));
    }
    None
}

fn match_pump(c: &Conjunct) -> Option<EffectDescriptor> {
    if !(c.has("get") || c.has("gets")) {
        return None;
    }
    let stat = c.words.iter().find(|word| {
        word.contains('/')
            && (word.starts_with('+') || word.starts_with('-'))
    })?;
    let power = stat.split('/').next().unwrap_or("");
    let magnitude = power
        .trim_start_matches('+')
        .parse::<i64>()
        .ok()
        .map(Amount::Fixed)
        .or_else(|| {
            power.to_ascii_lowercase().contains('x').then(|| Amount::Variable("X".to_string()))
        });
    let default = if c.words.first() == Some(&"this") {
        TargetClass::SourceSelf
    } else {
        TargetClass::Creature
    };
    Some(
        EffectDescriptor::new(EffectAction::PumpStats, parse_target(c, default))
            .with_magnitude(magnitude),
    )
}

fn match_grant_keyword(c: &Conjunct) -> Option<EffectDescriptor> {
    if !(c.has("have") || c.has("has") || c.has("gain") || c.has("gains")) {
        return None;
    }
    if !crate::clause::contains_lexicon_keyword(c.text) {
        return None;
    }
    let default = if c.words.first() == Some(&"this") {
        TargetClass::SourceSelf
    } else {
        TargetClass::Creature
    };
    Some(EffectDescriptor::new(
        EffectAction::GrantKeyword,
        parse_target(c, default),
    ))
}

/// The ordered pattern-rule table. Read-only, evaluated top to bottom.
/// Specific shapes (prevention, counterspells) sit above the broad verbs
/// that would otherwise shadow them.
static EFFECT_RULES: &[EffectRule] = &[
    EffectRule { name: "prevent_damage", matcher: match_prevent_damage },
    EffectRule { name: "counter_spell", matcher: match_counter_spell },
    EffectRule { name: "deal_damage", matcher: match_deal_damage },
    EffectRule { name: "destroy", matcher: match_destroy },
    EffectRule { name: "exile", matcher: match_exile },
    EffectRule { name: "return_to_hand", matcher: match_return_to_hand },
    EffectRule { name: "draw_card", matcher: match_draw_card },
    EffectRule { name: "discard", matcher: match_discard },
    EffectRule { name: "search_library", matcher: match_search_library },
    EffectRule { name: "create_token", matcher: match_create_token },
    EffectRule { name: "gain_life", matcher: match_gain_life },
    EffectRule { name: "lose_life", matcher: match_lose_life },
    EffectRule { name: "add_mana", matcher: match_add_mana },
    EffectRule { name: "win_game", matcher: match_win_game },
    EffectRule { name: "sacrifice", matcher: match_sacrifice },
    EffectRule { name: "mill", matcher: match_mill },
    EffectRule { name: "scry", matcher: match_scry },
    EffectRule { name: "tap_untap", matcher: match_tap_untap },
    EffectRule { name: "pump", matcher: match_pump },
    EffectRule { name: "grant_keyword", matcher: match_grant_keyword },
];
