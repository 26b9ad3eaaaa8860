use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One member of the codec alphabet.
///
/// Declaration order is the fixed class ordering used by the length
/// fallback in [`classify`] and by the 3-bit codes (Red = `000`,
/// Violet = `110`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolClass {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl SymbolClass {
    pub const ALL: [SymbolClass; 7] = [
        SymbolClass::Red,
        SymbolClass::Orange,
        SymbolClass::Yellow,
        SymbolClass::Green,
        SymbolClass::Blue,
        SymbolClass::Indigo,
        SymbolClass::Violet,
    ];

    /// Position in the fixed class ordering.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wavelength in nanometers.
    pub fn wavelength(self) -> u32 {
        match self {
            SymbolClass::Red => 700,
            SymbolClass::Orange => 620,
            SymbolClass::Yellow => 580,
            SymbolClass::Green => 530,
            SymbolClass::Blue => 470,
            SymbolClass::Indigo => 450,
            SymbolClass::Violet => 400,
        }
    }

    /// Frequency in Hz.
    pub fn frequency(self) -> u64 {
        match self {
            SymbolClass::Red => 428_000_000_000_000,
            SymbolClass::Orange => 484_000_000_000_000,
            SymbolClass::Yellow => 517_000_000_000_000,
            SymbolClass::Green => 566_000_000_000_000,
            SymbolClass::Blue => 638_000_000_000_000,
            SymbolClass::Indigo => 667_000_000_000_000,
            SymbolClass::Violet => 750_000_000_000_000,
        }
    }

    /// 3-bit code as a binary string.
    pub fn code(self) -> &'static str {
        match self {
            SymbolClass::Red => "000",
            SymbolClass::Orange => "001",
            SymbolClass::Yellow => "010",
            SymbolClass::Green => "011",
            SymbolClass::Blue => "100",
            SymbolClass::Indigo => "101",
            SymbolClass::Violet => "110",
        }
    }

    /// Inverse of [`SymbolClass::code`]. The guard code `111` has no class.
    pub fn from_code(code: &str) -> Option<SymbolClass> {
        SymbolClass::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn meaning(self) -> &'static str {
        match self {
            SymbolClass::Red => "Foundation/Security/Survival",
            SymbolClass::Orange => "Creativity/Emotion/Flow",
            SymbolClass::Yellow => "Power/Intelligence/Will",
            SymbolClass::Green => "Love/Healing/Growth",
            SymbolClass::Blue => "Truth/Communication/Expression",
            SymbolClass::Indigo => "Intuition/Vision/Insight",
            SymbolClass::Violet => "Consciousness/Transcendence/Unity",
        }
    }

    /// Glyph used by the light-memory visualization.
    pub fn glyph(self) -> &'static str {
        match self {
            SymbolClass::Red => "🔴",
            SymbolClass::Orange => "🟠",
            SymbolClass::Yellow => "🟡",
            SymbolClass::Green => "🟢",
            SymbolClass::Blue => "🔵",
            SymbolClass::Indigo => "🟣",
            SymbolClass::Violet => "🟪",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SymbolClass::Red => "Red",
            SymbolClass::Orange => "Orange",
            SymbolClass::Yellow => "Yellow",
            SymbolClass::Green => "Green",
            SymbolClass::Blue => "Blue",
            SymbolClass::Indigo => "Indigo",
            SymbolClass::Violet => "Violet",
        }
    }
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SymbolClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolClass::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown symbol class '{s}'"))
    }
}

/// Keyword groups evaluated in order; the first group with a substring hit
/// decides the class. The spiritual tier is checked before the technical
/// tier, so a word such as "powerful" resolves to Yellow, not Orange.
const KEYWORD_RULES: &[(SymbolClass, &[&str])] = &[
    // spiritual tier
    (
        SymbolClass::Violet,
        &["sacred", "divine", "spirit", "soul", "god", "holy", "transcend", "mystical"],
    ),
    (
        SymbolClass::Indigo,
        &["wisdom", "insight", "vision", "see", "perceive", "understand"],
    ),
    (
        SymbolClass::Blue,
        &["truth", "speak", "communicate", "express", "say", "tell"],
    ),
    (
        SymbolClass::Green,
        &["love", "heal", "heart", "grow", "compassion", "care"],
    ),
    (
        SymbolClass::Yellow,
        &["power", "will", "think", "mind", "intelligence", "know"],
    ),
    (
        SymbolClass::Orange,
        &["create", "emotion", "feel", "flow", "passion", "desire"],
    ),
    (
        SymbolClass::Red,
        &["ground", "foundation", "secure", "safe", "survive", "protect"],
    ),
    // technical tier
    (
        SymbolClass::Violet,
        &["quantum", "superposition", "entangle", "coherence"],
    ),
    (
        SymbolClass::Indigo,
        &["neural", "network", "ai", "intelligence"],
    ),
    (
        SymbolClass::Blue,
        &["data", "information", "knowledge", "learn"],
    ),
    (
        SymbolClass::Green,
        &["blockchain", "chain", "link", "connect"],
    ),
    (
        SymbolClass::Yellow,
        &["compute", "process", "calculate", "algorithm"],
    ),
    (SymbolClass::Orange, &["energy", "power", "force", "wave"]),
    (SymbolClass::Red, &["bitcoin", "crypto", "token", "secure"]),
];

/// Class implied by a category hint, if the category is one of the four
/// recognized ones.
pub fn category_class(category: &str) -> Option<SymbolClass> {
    match category {
        "spirituality" => Some(SymbolClass::Violet),
        "technology" => Some(SymbolClass::Blue),
        "science" => Some(SymbolClass::Yellow),
        "philosophy" => Some(SymbolClass::Indigo),
        _ => None,
    }
}

/// Assign a class to a single word token.
///
/// Total: keyword groups first, then the category hint, then
/// `char_count % 7` into the fixed ordering. The word is matched as given;
/// the codec lower-cases tokens before calling this.
pub fn classify(word: &str, category_hint: Option<&str>) -> SymbolClass {
    for (class, keywords) in KEYWORD_RULES {
        if keywords.iter().any(|k| word.contains(k)) {
            return *class;
        }
    }

    if let Some(class) = category_hint.and_then(category_class) {
        return class;
    }

    SymbolClass::ALL[word.chars().count() % SymbolClass::ALL.len()]
}
