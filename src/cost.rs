//! Activation-cost parsing: the text left of a colon separator, split on
//! commas outside braces into an ordered component list.
//!
//! Unparsed fragments are retained as opaque `Other` components with a
//! confidence penalty rather than dropped.

use serde::{Deserialize, Serialize};

use crate::mana::{ManaCost, brace_groups};

/// Confidence subtracted for each cost fragment kept as opaque text.
pub const OPAQUE_COST_PENALTY: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CostComponent {
    /// Mana symbols, kept as the printed brace string.
    Mana(String),
    Tap,
    Untap,
    /// "Sacrifice a creature" — the sacrificed description.
    Sacrifice(String),
    /// "Discard a card" — the discarded description.
    Discard(String),
    PayLife(u32),
    /// "Exile <what> from your graveyard".
    ExileFromGraveyard(String),
    /// Unrecognized fragment, kept verbatim.
    Other(String),
}

/// An ordered cost list plus the confidence of its parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCost {
    pub components: Vec<CostComponent>,
    pub confidence: f64,
}

impl ParsedCost {
    /// True when at least one component was structurally recognized.
    pub fn is_recognized(&self) -> bool {
        self.components
            .iter()
            .any(|component| !matches!(component, CostComponent::Other(_)))
    }
}

/// Parses the cost side of an activated ability. Segments split on
/// commas outside `{...}`; each segment parses independently.
pub fn parse_cost_text(text: &str) -> ParsedCost {
    let mut components = Vec::new();
    let mut opaque = 0usize;

    for segment in split_segments(text) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match parse_segment(segment) {
            Some(parsed) => components.extend(parsed),
            None => {
                components.push(CostComponent::Other(segment.to_string()));
                opaque += 1;
            }
        }
    }

    ParsedCost {
        components,
        confidence: (1.0 - opaque as f64 * OPAQUE_COST_PENALTY).max(0.0),
    }
}

/// True when the text parses as a plausible activation cost — the
/// classifier's colon test.
pub fn looks_like_cost(text: &str) -> bool {
    let parsed = parse_cost_text(text);
    !parsed.components.is_empty() && parsed.is_recognized()
}

fn split_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_braces = false;
    for ch in text.chars() {
        match ch {
            '{' => {
                in_braces = true;
                current.push(ch);
            }
            '}' => {
                in_braces = false;
                current.push(ch);
            }
            ',' if !in_braces => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    segments
}

fn parse_segment(segment: &str) -> Option<Vec<CostComponent>> {
    // Pure brace segments: mana pips mixed with {T}/{Q}.
    if let Some(groups) = brace_groups(segment) {
        if groups.is_empty() {
            return None;
        }
        return parse_symbol_groups(&groups);
    }

    let lower = segment.to_ascii_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    match words.as_slice() {
        ["tap"] | ["t"] => return Some(vec![CostComponent::Tap]),
        ["untap"] | ["q"] => return Some(vec![CostComponent::Untap]),
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix("sacrifice ") {
        return Some(vec![CostComponent::Sacrifice(rest.trim().to_string())]);
    }
    if let Some(rest) = lower.strip_prefix("discard ") {
        return Some(vec![CostComponent::Discard(rest.trim().to_string())]);
    }
    if let Some(rest) = lower.strip_prefix("pay ") {
        let mut parts = rest.split_whitespace();
        let amount = parts.next()?.parse::<u32>().ok()?;
        if parts.next() == Some("life") {
            return Some(vec![CostComponent::PayLife(amount)]);
        }
        return None;
    }
    if lower.starts_with("exile ") && lower.contains("from your graveyard") {
        let what = lower
            .trim_start_matches("exile ")
            .split(" from your graveyard")
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        return Some(vec![CostComponent::ExileFromGraveyard(what)]);
    }

    None
}

/// Turns a run of brace groups into components: contiguous mana pips
/// collapse into one `Mana` entry, `{T}`/`{Q}` stand alone.
fn parse_symbol_groups(groups: &[String]) -> Option<Vec<CostComponent>> {
    let mut components = Vec::new();
    let mut mana_run = String::new();

    let flush = |mana_run: &mut String, components: &mut Vec<CostComponent>| {
        if !mana_run.is_empty() {
            components.push(CostComponent::Mana(std::mem::take(mana_run)));
        }
    };

    for body in groups {
        match body.to_ascii_lowercase().as_str() {
            "t" => {
                flush(&mut mana_run, &mut components);
                components.push(CostComponent::Tap);
            }
            "q" => {
                flush(&mut mana_run, &mut components);
                components.push(CostComponent::Untap);
            }
            _ => {
                let pip = format!("{{{}}}", body.to_ascii_uppercase());
                ManaCost::parse(&pip)?;
                mana_run.push_str(&pip);
            }
        }
    }
    flush(&mut mana_run, &mut components);

    if components.is_empty() {
        return None;
    }
    Some(components)
}
