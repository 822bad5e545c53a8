use crate::color::Color;

/// Atomic mana payment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManaSymbol {
    /// White mana {W}
    White,
    /// Blue mana {U}
    Blue,
    /// Black mana {B}
    Black,
    /// Red mana {R}
    Red,
    /// Green mana {G}
    Green,
    /// Colorless mana {C}
    Colorless,
    /// Generic mana {1}, {2}, etc.
    Generic(u8),
    /// Snow mana {S}
    Snow,
    /// Life payment for Phyrexian pips
    Life(u8),
    /// Variable mana {X}
    X,
}

impl ManaSymbol {
    /// Mana value contribution of this symbol.
    pub fn mana_value(&self) -> u32 {
        match self {
            ManaSymbol::Generic(n) => *n as u32,
            ManaSymbol::Life(_) => 0,
            ManaSymbol::X => 0,
            _ => 1,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            ManaSymbol::White => Some(Color::White),
            ManaSymbol::Blue => Some(Color::Blue),
            ManaSymbol::Black => Some(Color::Black),
            ManaSymbol::Red => Some(Color::Red),
            ManaSymbol::Green => Some(Color::Green),
            _ => None,
        }
    }

    /// Parses the body of one brace group (without the braces), already
    /// case-folded. `"w"` -> White, `"2"` -> Generic(2), etc.
    fn parse_atom(body: &str) -> Option<ManaSymbol> {
        match body {
            "w" => Some(ManaSymbol::White),
            "u" => Some(ManaSymbol::Blue),
            "b" => Some(ManaSymbol::Black),
            "r" => Some(ManaSymbol::Red),
            "g" => Some(ManaSymbol::Green),
            "c" => Some(ManaSymbol::Colorless),
            "s" => Some(ManaSymbol::Snow),
            "x" => Some(ManaSymbol::X),
            _ => body.parse::<u8>().ok().map(ManaSymbol::Generic),
        }
    }
}

/// A mana cost as a sequence of pips, where each pip is a list of
/// alternative payment options.
///
/// The outer vector is a conjunction (all pips must be paid); each inner
/// vector is a disjunction (any one option pays the pip). `{2}{W}{W}` is
/// `[[Generic(2)], [White], [White]]`; hybrid `{W/U}` is `[[White, Blue]]`;
/// phyrexian `{W/P}` is `[[White, Life(2)]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManaCost {
    pips: Vec<Vec<ManaSymbol>>,
}

impl ManaCost {
    pub fn new() -> Self {
        Self { pips: Vec::new() }
    }

    pub fn from_symbols(symbols: Vec<ManaSymbol>) -> Self {
        Self {
            pips: symbols.into_iter().map(|s| vec![s]).collect(),
        }
    }

    pub fn pips(&self) -> &[Vec<ManaSymbol>] {
        &self.pips
    }

    pub fn is_empty(&self) -> bool {
        self.pips.is_empty()
    }

    /// Mana value of this cost. Each pip contributes the maximum value
    /// among its alternatives.
    pub fn mana_value(&self) -> u32 {
        self.pips
            .iter()
            .map(|pip| pip.iter().map(|s| s.mana_value()).max().unwrap_or(0))
            .sum()
    }

    /// Parses a brace-notation cost string such as `{2}{W}{W}` or `{G/U}`.
    ///
    /// Returns `None` when the string contains anything other than mana
    /// brace groups (so callers can tell mana apart from `{T}` and other
    /// non-mana symbols). An empty string parses as the empty cost.
    pub fn parse(text: &str) -> Option<ManaCost> {
        let mut pips = Vec::new();
        for body in brace_groups(text)? {
            pips.push(parse_pip(&body)?);
        }
        Some(ManaCost { pips })
    }
}

fn parse_pip(body: &str) -> Option<Vec<ManaSymbol>> {
    let body = body.to_ascii_lowercase();
    if let Some(atom) = ManaSymbol::parse_atom(&body) {
        return Some(vec![atom]);
    }

    // Hybrid, twobrid, and phyrexian pips: alternatives separated by '/'.
    let mut options = Vec::new();
    for part in body.split('/') {
        match part {
            "p" => options.push(ManaSymbol::Life(2)),
            _ => options.push(ManaSymbol::parse_atom(part)?),
        }
    }
    if options.len() < 2 {
        return None;
    }
    Some(options)
}

/// Splits `{a}{b}{c}` into its group bodies. Returns `None` if the text
/// contains anything outside braces or an unbalanced brace.
pub fn brace_groups(text: &str) -> Option<Vec<String>> {
    let mut groups = Vec::new();
    let mut current: Option<String> = None;

    for ch in text.chars() {
        match ch {
            '{' => {
                if current.is_some() {
                    return None;
                }
                current = Some(String::new());
            }
            '}' => {
                groups.push(current.take()?);
            }
            _ => match current.as_mut() {
                Some(body) => body.push(ch),
                None => {
                    if !ch.is_whitespace() {
                        return None;
                    }
                }
            },
        }
    }

    if current.is_some() {
        return None;
    }
    Some(groups)
}
