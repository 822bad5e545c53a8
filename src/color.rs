use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Parses a single-letter color symbol as used by upstream card data.
    pub fn from_symbol(symbol: &str) -> Option<Color> {
        match symbol.trim() {
            "W" | "w" => Some(Color::White),
            "U" | "u" => Some(Color::Blue),
            "B" | "b" => Some(Color::Black),
            "R" | "r" => Some(Color::Red),
            "G" | "g" => Some(Color::Green),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
        }
    }
}

/// A set of colors represented as bitflags.
///
/// Iteration order is always WUBRG, so derived output is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: Self = Self(0);

    pub const fn new() -> Self {
        Self(0)
    }

    const fn bit(color: Color) -> u8 {
        match color {
            Color::White => 1 << 0,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
        }
    }

    /// Builds a set from upstream symbol strings, ignoring anything unknown.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut set = Self::COLORLESS;
        for symbol in symbols {
            if let Some(color) = Color::from_symbol(symbol.as_ref()) {
                set = set.with(color);
            }
        }
        set
    }

    pub const fn with(self, color: Color) -> Self {
        Self(self.0 | Self::bit(color))
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & Self::bit(color) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Colors in WUBRG order.
    pub fn colors(self) -> Vec<Color> {
        Color::ALL
            .into_iter()
            .filter(|color| self.contains(*color))
            .collect()
    }

    /// Symbol strings in WUBRG order, the form used in the IR document.
    pub fn symbols(self) -> Vec<String> {
        self.colors()
            .into_iter()
            .map(|color| color.symbol().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbols_ignores_unknown_entries() {
        let set = ColorSet::from_symbols(&["R", "G", "Q", ""]);
        assert!(set.contains(Color::Red));
        assert!(set.contains(Color::Green));
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn symbols_are_wubrg_ordered() {
        let set = ColorSet::from_symbols(&["G", "W", "B"]);
        assert_eq!(set.symbols(), vec!["W", "B", "G"]);
    }
}
