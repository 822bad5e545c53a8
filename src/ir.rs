//! The versioned IR document: pure composition of the pipeline outputs.
//!
//! No parsing or validation happens here — malformed upstream data passes
//! through as-is; the IR registry validates on ingestion. The schema is
//! additive-only across versions: consumers must ignore unknown fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ability::ParsedAbility;
use crate::hints::RewardHints;
use crate::record::CardRecord;
use crate::tagger::StrategicTags;
use crate::types::Supertype;
use crate::zone::{Zone, zones_for};

/// Schema version stamped on every emitted document. Immutable once a
/// document is assembled.
pub const IR_VERSION: &str = "1.0.0";

/// The metadata section: a copy of the relevant input-record fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardMetadata {
    pub name: String,
    pub oracle_id: String,
    pub scryfall_id: String,
    pub mana_cost: String,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: String,
    pub colors: Vec<String>,
    pub color_identity: Vec<String>,
    pub supertypes: Vec<Supertype>,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
}

impl CardMetadata {
    pub fn from_record(record: &CardRecord) -> Self {
        Self {
            name: record.name.clone(),
            oracle_id: record.oracle_id.clone(),
            scryfall_id: record.scryfall_id.clone(),
            mana_cost: record.mana_cost.clone(),
            cmc: record.cmc,
            type_line: record.type_line.clone(),
            oracle_text: record.oracle_text.clone(),
            colors: record.colors().symbols(),
            color_identity: record.color_identity().symbols(),
            supertypes: record.type_line().supertypes,
            keywords: record.keywords.clone(),
            power: record.power.clone(),
            toughness: record.toughness.clone(),
            loyalty: record.loyalty.clone(),
        }
    }
}

/// Per-format legality verdicts, supplied by the external legality
/// source and passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormatLegality {
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
    #[serde(default)]
    pub can_be_commander: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayMetadata {
    pub zones: Vec<Zone>,
    pub enters_tapped: bool,
    pub has_graveyard_abilities: bool,
}

impl GameplayMetadata {
    pub fn from_record(record: &CardRecord) -> Self {
        let oracle = record.oracle_text.to_ascii_lowercase();
        Self {
            zones: zones_for(&record.type_line()),
            enters_tapped: oracle.contains("enters tapped")
                || oracle.contains("enters the battlefield tapped"),
            has_graveyard_abilities: oracle.contains("graveyard")
                && (oracle.contains("activate") || oracle.contains(':')),
        }
    }
}

/// One card's complete Intermediate Representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIr {
    pub ir_version: String,
    pub card_metadata: CardMetadata,
    pub parsed_abilities: Vec<ParsedAbility>,
    pub strategic_tags: StrategicTags,
    pub format_legality: FormatLegality,
    pub gameplay_metadata: GameplayMetadata,
    pub reward_hints: RewardHints,
}

impl CardIr {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_copies_record_fields() {
        let record = CardRecord {
            name: "Serra Angel".to_string(),
            mana_cost: "{3}{W}{W}".to_string(),
            cmc: 5.0,
            type_line: "Creature — Angel".to_string(),
            colors: vec!["W".to_string()],
            power: Some("4".to_string()),
            toughness: Some("4".to_string()),
            ..CardRecord::default()
        };
        let metadata = CardMetadata::from_record(&record);
        assert_eq!(metadata.name, "Serra Angel");
        assert_eq!(metadata.colors, vec!["W"]);
        assert!(metadata.supertypes.is_empty());
        assert_eq!(metadata.power.as_deref(), Some("4"));
    }

    #[test]
    fn graveyard_abilities_detected() {
        let record = CardRecord {
            name: "Recurring".to_string(),
            type_line: "Creature — Zombie".to_string(),
            oracle_text: "{B}, Exile this card from your graveyard: Return it to your hand."
                .to_string(),
            ..CardRecord::default()
        };
        let gameplay = GameplayMetadata::from_record(&record);
        assert!(gameplay.has_graveyard_abilities);
        assert!(!gameplay.enters_tapped);
    }
}
