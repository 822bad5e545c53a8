//! Oracle-text normalization: reminder-text stripping, self-name
//! replacement, whitespace collapse, and clause splitting.
//!
//! Clause order always equals source order, and offsets index into the
//! normalized document text so later stages can refer back to it.

/// A single normalized clause plus its pre-normalization source sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClause {
    /// Lowercased, name-replaced, whitespace-collapsed clause text.
    pub text: String,
    /// The source sentence with original casing (reminder text removed).
    pub source: String,
    /// Byte offset of `text` within the normalized document.
    pub start: usize,
    /// Byte offset one past the end of `text` within the normalized document.
    pub end: usize,
    /// Zero-based source line index; clauses from one oracle line share it.
    pub line: usize,
}

/// The normalized oracle text and its ordered clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub text: String,
    pub clauses: Vec<RawClause>,
}

/// Normalizes raw oracle text into an ordered clause sequence.
///
/// Empty oracle text yields an empty sequence; clauses that trim to
/// nothing are dropped, never retained.
pub fn normalize_oracle_text(oracle_text: &str, card_name: &str) -> NormalizedText {
    let full_name = card_name.trim().to_ascii_lowercase();
    let short_name = full_name
        .split(',')
        .next()
        .unwrap_or(full_name.as_str())
        .trim()
        .to_string();

    let mut doc = String::new();
    let mut clauses = Vec::new();

    for (line_index, raw_line) in oracle_text.lines().enumerate() {
        let stripped = strip_reminder_text(raw_line);
        for sentence in split_sentences(&stripped) {
            let source = collapse_whitespace(&sentence);
            if source.is_empty() {
                continue;
            }
            let mut text = source.to_ascii_lowercase();
            text = replace_self_name(&text, &full_name);
            if short_name != full_name {
                text = replace_self_name(&text, &short_name);
            }

            let start = doc.len();
            doc.push_str(&text);
            let end = doc.len();
            doc.push('\n');

            clauses.push(RawClause {
                text,
                source,
                start,
                end,
                line: line_index,
            });
        }
    }

    NormalizedText { text: doc, clauses }
}

/// Removes balanced-parenthesis reminder spans. Unbalanced closers are
/// tolerated (depth saturates at zero).
fn strip_reminder_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0u32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a line into sentences on periods outside `{...}` braces.
/// The trailing period is not part of the sentence.
fn split_sentences(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_braces = false;

    for ch in line.chars() {
        match ch {
            '{' => {
                in_braces = true;
                current.push(ch);
            }
            '}' => {
                in_braces = false;
                current.push(ch);
            }
            '.' if !in_braces => {
                sentences.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }
    sentences
}

/// Replaces whole-word occurrences of the card's own name with "this",
/// so "Lightning Bolt deals 3 damage" reads "this deals 3 damage".
/// Both `text` and `name` must already be lowercase.
fn replace_self_name(text: &str, name: &str) -> String {
    if name.is_empty() {
        return text.to_string();
    }

    let bytes = text.as_bytes();
    let name_bytes = name.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric();

    let mut out = String::with_capacity(text.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let boundary_before = idx == 0 || !is_word(bytes[idx - 1]);
        let end = idx + name_bytes.len();
        if boundary_before
            && bytes[idx..].starts_with(name_bytes)
            && (end >= bytes.len() || !is_word(bytes[end]))
        {
            out.push_str("this");
            idx = end;
            continue;
        }
        let ch = text[idx..].chars().next().unwrap_or('\0');
        out.push(ch);
        idx += ch.len_utf8().max(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_clauses() {
        let normalized = normalize_oracle_text("", "Some Card");
        assert!(normalized.clauses.is_empty());
        assert!(normalized.text.is_empty());
    }

    #[test]
    fn reminder_text_is_stripped() {
        let normalized = normalize_oracle_text(
            "Flying (This creature can't be blocked except by creatures with flying or reach.)",
            "Wind Drake",
        );
        assert_eq!(normalized.clauses.len(), 1);
        assert_eq!(normalized.clauses[0].text, "flying");
    }

    #[test]
    fn periods_inside_braces_do_not_split() {
        let normalized = normalize_oracle_text("{T}: Add {C}{C}.", "Sol Ring");
        assert_eq!(normalized.clauses.len(), 1);
        assert_eq!(normalized.clauses[0].text, "{t}: add {c}{c}");
    }

    #[test]
    fn card_name_becomes_this() {
        let normalized = normalize_oracle_text(
            "Lightning Bolt deals 3 damage to any target.",
            "Lightning Bolt",
        );
        assert_eq!(
            normalized.clauses[0].text,
            "this deals 3 damage to any target"
        );
        // Source sentence keeps original casing.
        assert_eq!(
            normalized.clauses[0].source,
            "Lightning Bolt deals 3 damage to any target"
        );
    }

    #[test]
    fn short_name_before_comma_is_replaced_too() {
        let normalized = normalize_oracle_text(
            "Whenever Krenko, Mob Boss attacks, create a token.",
            "Krenko, Mob Boss",
        );
        assert!(normalized.clauses[0].text.starts_with("whenever this attacks"));
    }

    #[test]
    fn clause_offsets_index_normalized_document() {
        let normalized =
            normalize_oracle_text("Draw a card.\nDiscard a card.", "Study");
        assert_eq!(normalized.clauses.len(), 2);
        for clause in &normalized.clauses {
            assert_eq!(&normalized.text[clause.start..clause.end], clause.text);
        }
        assert_eq!(normalized.clauses[0].line, 0);
        assert_eq!(normalized.clauses[1].line, 1);
    }

    #[test]
    fn multiple_sentences_on_one_line_keep_order() {
        let normalized =
            normalize_oracle_text("Draw two cards. Then discard a card.", "Divination");
        let texts: Vec<&str> = normalized
            .clauses
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["draw two cards", "then discard a card"]);
        assert_eq!(normalized.clauses[0].line, normalized.clauses[1].line);
    }
}
