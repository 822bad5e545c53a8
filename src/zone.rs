use serde::{Deserialize, Serialize};

use crate::types::TypeLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Hand,
    Library,
    Battlefield,
    Graveyard,
    Stack,
    Exile,
}

/// Zones a card of this type can occupy, derived deterministically from
/// the type line. Instants and sorceries never reach the battlefield;
/// lands are played without using the stack.
pub fn zones_for(type_line: &TypeLine) -> Vec<Zone> {
    let mut zones = vec![Zone::Hand, Zone::Library];
    if !type_line.card_types.is_empty() && !type_line.is_spell_only() {
        zones.push(Zone::Battlefield);
    }
    if !type_line.has(crate::types::CardType::Land) {
        zones.push(Zone::Stack);
    }
    zones.push(Zone::Graveyard);
    zones.push(Zone::Exile);
    zones
}
