//! Raw card record as distributed by the upstream card-metadata source.
//!
//! Deserialized straight from upstream JSON; every field except `name` is
//! optional and defaults when absent. The record is read-only input and is
//! never mutated by the pipeline.

use serde::Deserialize;

use crate::color::ColorSet;
use crate::types::TypeLine;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub oracle_id: String,
    #[serde(default, rename = "id")]
    pub scryfall_id: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
}

impl CardRecord {
    pub fn colors(&self) -> ColorSet {
        ColorSet::from_symbols(&self.colors)
    }

    pub fn color_identity(&self) -> ColorSet {
        ColorSet::from_symbols(&self.color_identity)
    }

    pub fn type_line(&self) -> TypeLine {
        TypeLine::parse(&self.type_line)
    }
}
