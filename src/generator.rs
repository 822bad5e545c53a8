//! The parse-and-tag entry point: raw record in, versioned IR out.
//!
//! Parsing one card is pure, synchronous, and deterministic. The only
//! shared state is the compile-time pattern tables, so batches
//! parallelize trivially across threads with no locking.

use std::fmt;

use crate::ability::{ParsedAbility, assemble_abilities};
use crate::clause::{Clause, classify};
use crate::hints;
use crate::ir::{CardIr, CardMetadata, FormatLegality, GameplayMetadata, IR_VERSION};
use crate::normalize::normalize_oracle_text;
use crate::record::CardRecord;
use crate::tagger;

/// Hard failures. Everything text-level degrades confidence instead of
/// erroring, so this stays small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// The record is missing a required field. The string identifies the
    /// card as well as the input allows.
    MalformedInput(String),
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::MalformedInput(detail) => {
                write!(f, "malformed card record: {detail}")
            }
        }
    }
}

impl std::error::Error for IrError {}

/// Converts one card record into its IR document.
///
/// `legality` comes from the external legality source and passes through
/// untouched. Only a missing card name is an error; empty oracle text,
/// absent power/toughness, and unrecognizable rules text all succeed
/// with degraded confidence.
pub fn convert(record: &CardRecord, legality: FormatLegality) -> Result<CardIr, IrError> {
    if record.name.trim().is_empty() {
        return Err(IrError::MalformedInput(format!(
            "missing name (oracle_id: '{}', scryfall_id: '{}')",
            record.oracle_id, record.scryfall_id
        )));
    }

    let parsed_abilities = parse_abilities(record);
    let strategic_tags = tagger::tag_card(&parsed_abilities, record);
    let reward_hints = hints::synthesize(&parsed_abilities, &record.type_line());

    Ok(CardIr {
        ir_version: IR_VERSION.to_string(),
        card_metadata: CardMetadata::from_record(record),
        parsed_abilities,
        strategic_tags,
        format_legality: legality,
        gameplay_metadata: GameplayMetadata::from_record(record),
        reward_hints,
    })
}

/// Runs the parsing pipeline alone: normalize, classify, assemble.
pub fn parse_abilities(record: &CardRecord) -> Vec<ParsedAbility> {
    let normalized = normalize_oracle_text(&record.oracle_text, &record.name);
    let is_spell_card = record.type_line().is_spell_only();
    let clauses: Vec<Clause> = normalized
        .clauses
        .into_iter()
        .map(|raw| classify(raw, is_spell_card))
        .collect();
    assemble_abilities(&clauses)
}

/// Converts a batch, isolating per-card failures: one malformed record
/// yields one `Err` without disturbing the rest.
pub fn convert_all(
    records: &[CardRecord],
    mut legality_for: impl FnMut(&CardRecord) -> FormatLegality,
) -> Vec<Result<CardIr, IrError>> {
    records
        .iter()
        .map(|record| convert(record, legality_for(record)))
        .collect()
}
