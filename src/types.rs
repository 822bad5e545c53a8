use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Supertype {
    Basic,
    Legendary,
    Snow,
    World,
}

impl Supertype {
    const ALL: [(Supertype, &'static str); 4] = [
        (Supertype::Basic, "basic"),
        (Supertype::Legendary, "legendary"),
        (Supertype::Snow, "snow"),
        (Supertype::World, "world"),
    ];

    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(supertype, _)| *supertype == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Planeswalker,
    Instant,
    Sorcery,
    Battle,
    Kindred,
}

impl CardType {
    const ALL: [(CardType, &'static str); 9] = [
        (CardType::Land, "land"),
        (CardType::Creature, "creature"),
        (CardType::Artifact, "artifact"),
        (CardType::Enchantment, "enchantment"),
        (CardType::Planeswalker, "planeswalker"),
        (CardType::Instant, "instant"),
        (CardType::Sorcery, "sorcery"),
        (CardType::Battle, "battle"),
        (CardType::Kindred, "kindred"),
    ];

    /// True for types that sit on the battlefield once resolved.
    pub fn is_permanent(self) -> bool {
        !matches!(self, CardType::Instant | CardType::Sorcery)
    }
}

/// Card types and supertypes recognized in a printed type line.
///
/// Everything left of the em dash is scanned word by word; unrecognized
/// words (subtypes, custom markers) are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeLine {
    pub supertypes: Vec<Supertype>,
    pub card_types: Vec<CardType>,
}

impl TypeLine {
    pub fn parse(type_line: &str) -> TypeLine {
        let head = type_line
            .split(['—', '-'])
            .next()
            .unwrap_or(type_line)
            .to_ascii_lowercase();

        let mut supertypes = Vec::new();
        let mut card_types = Vec::new();
        for word in head.split_whitespace() {
            if let Some((supertype, _)) =
                Supertype::ALL.iter().find(|(_, name)| *name == word)
            {
                if !supertypes.contains(supertype) {
                    supertypes.push(*supertype);
                }
                continue;
            }
            // "Tribal" survives in older oracle data under its former name.
            let word = if word == "tribal" { "kindred" } else { word };
            if let Some((card_type, _)) =
                CardType::ALL.iter().find(|(_, name)| *name == word)
            {
                if !card_types.contains(card_type) {
                    card_types.push(*card_type);
                }
            }
        }

        TypeLine {
            supertypes,
            card_types,
        }
    }

    pub fn has(&self, card_type: CardType) -> bool {
        self.card_types.contains(&card_type)
    }

    /// True when the card resolves directly from the stack to a zone
    /// other than the battlefield.
    pub fn is_spell_only(&self) -> bool {
        !self.card_types.is_empty() && self.card_types.iter().all(|t| !t.is_permanent())
    }

    pub fn is_permanent(&self) -> bool {
        self.card_types.iter().any(|t| t.is_permanent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supertypes_and_types() {
        let tl = TypeLine::parse("Legendary Creature — Human Wizard");
        assert_eq!(tl.supertypes, vec![Supertype::Legendary]);
        assert_eq!(tl.card_types, vec![CardType::Creature]);
    }

    #[test]
    fn instant_is_spell_only() {
        let tl = TypeLine::parse("Instant");
        assert!(tl.is_spell_only());
        assert!(!tl.is_permanent());
    }

    #[test]
    fn artifact_creature_is_permanent() {
        let tl = TypeLine::parse("Artifact Creature — Golem");
        assert!(tl.is_permanent());
        assert!(tl.has(CardType::Artifact));
        assert!(tl.has(CardType::Creature));
    }

    #[test]
    fn empty_type_line_parses_to_nothing() {
        let tl = TypeLine::parse("");
        assert!(tl.card_types.is_empty());
        assert!(!tl.is_spell_only());
    }
}
