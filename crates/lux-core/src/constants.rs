/// Baseline energy before keyword, category and length bonuses
pub const ENERGY_BASE: u32 = 50;

/// Energy added per high-energy keyword hit
pub const ENERGY_PER_KEYWORD: u32 = 10;

/// Cap on the text-length energy bonus (one point per 100 chars)
pub const ENERGY_LENGTH_CAP: u32 = 20;

/// Energy ceiling
pub const ENERGY_MAX: u32 = 100;

/// Baseline coherence before structural bonuses
pub const COHERENCE_BASE: f64 = 0.5;

/// Bonus when the text carries any sentence punctuation
pub const COHERENCE_PUNCTUATION: f64 = 0.2;

/// Bonus when the text splits into more than one sentence
pub const COHERENCE_MULTI_SENTENCE: f64 = 0.1;

/// Bonus when the text length sits strictly inside the well-formed band
pub const COHERENCE_LENGTH: f64 = 0.2;

/// Exclusive character-length band for the coherence length bonus
pub const COHERENCE_LENGTH_BAND: (usize, usize) = (50, 500);

/// Number of dominant classes folded into a meaning summary
pub const MEANING_TOP_N: usize = 3;

/// Separator between meaning strings
pub const MEANING_SEPARATOR: &str = " → ";

/// Minimum hex digits in a photonic code (one 256-bit word)
pub const HEX_WORD_DIGITS: usize = 64;

/// Bits per encoded symbol
pub const BITS_PER_SYMBOL: usize = 3;

/// Guard code, never emitted by the closed symbol alphabet
pub const GUARD_CODE: &str = "111";

/// Symbols rendered by the light-memory visualization
pub const VISUALIZE_SYMBOLS: usize = 20;
