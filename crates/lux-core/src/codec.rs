use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BITS_PER_SYMBOL, COHERENCE_BASE, COHERENCE_LENGTH, COHERENCE_LENGTH_BAND,
    COHERENCE_MULTI_SENTENCE, COHERENCE_PUNCTUATION, ENERGY_BASE, ENERGY_LENGTH_CAP, ENERGY_MAX,
    ENERGY_PER_KEYWORD, GUARD_CODE, HEX_WORD_DIGITS, MEANING_SEPARATOR, MEANING_TOP_N,
};
use crate::symbol::{SymbolClass, classify};
use crate::tokenizer::{has_sentence_punctuation, high_energy_hits, split_sentences, tokenize};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// The encoded form of one text: one symbol per whitespace word, with
/// index-aligned wavelengths and frequencies and three derived summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotonicSequence {
    #[serde(rename = "colors")]
    pub symbols: Vec<SymbolClass>,
    pub wavelengths: Vec<u32>,
    pub frequencies: Vec<u64>,
    pub meaning: String,
    pub energy_level: u8,
    pub coherence: f64,
}

impl PhotonicSequence {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A character other than `0` or `1` in a bit string.
    InvalidBits(char),
    /// Bit string length not a multiple of the symbol width.
    InvalidLength(usize),
    /// The reserved `111` code at the given symbol position.
    GuardCode(usize),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidBits(c) => write!(f, "invalid bit character {c:?}"),
            CodecError::InvalidLength(len) => {
                write!(f, "bit length {len} is not a multiple of {BITS_PER_SYMBOL}")
            }
            CodecError::GuardCode(pos) => write!(f, "guard code {GUARD_CODE} at symbol {pos}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode text into a photonic sequence. Deterministic and total.
pub fn encode(text: &str, category: Option<&str>) -> PhotonicSequence {
    let tokens = tokenize(text);
    let mut symbols = Vec::with_capacity(tokens.len());
    let mut wavelengths = Vec::with_capacity(tokens.len());
    let mut frequencies = Vec::with_capacity(tokens.len());

    for token in &tokens {
        let class = classify(token, category);
        symbols.push(class);
        wavelengths.push(class.wavelength());
        frequencies.push(class.frequency());
    }

    PhotonicSequence {
        meaning: meaning(&symbols),
        energy_level: energy_level(text, category),
        coherence: coherence(text),
        symbols,
        wavelengths,
        frequencies,
    }
}

fn category_energy_bonus(category: Option<&str>) -> u32 {
    match category {
        Some("technology") => 15,
        Some("spirituality") => 20,
        Some("science") => 10,
        _ => 0,
    }
}

/// Lexical intensity on 0..=100. The length bonus is one point per full
/// 100 characters, capped.
pub fn energy_level(text: &str, category: Option<&str>) -> u8 {
    let hits = u32::try_from(high_energy_hits(text)).unwrap_or(u32::MAX);
    let length_bonus = u32::try_from(text.chars().count() / 100)
        .unwrap_or(u32::MAX)
        .min(ENERGY_LENGTH_CAP);

    let energy = ENERGY_BASE
        .saturating_add(hits.saturating_mul(ENERGY_PER_KEYWORD))
        .saturating_add(category_energy_bonus(category))
        .saturating_add(length_bonus)
        .min(ENERGY_MAX);

    energy as u8
}

/// Structural well-formedness on 0.0..=1.0.
pub fn coherence(text: &str) -> f64 {
    let mut score = COHERENCE_BASE;

    if has_sentence_punctuation(text) {
        score += COHERENCE_PUNCTUATION;
    }
    if split_sentences(text).len() > 1 {
        score += COHERENCE_MULTI_SENTENCE;
    }

    let len = text.chars().count();
    let (lo, hi) = COHERENCE_LENGTH_BAND;
    if len > lo && len < hi {
        score += COHERENCE_LENGTH;
    }

    score.clamp(0.0, 1.0)
}

/// Meanings of the most frequent classes, ties broken by first appearance.
pub fn meaning(symbols: &[SymbolClass]) -> String {
    let mut counts: Vec<(SymbolClass, usize)> = Vec::new();
    for &class in symbols {
        match counts.iter_mut().find(|(c, _)| *c == class) {
            Some((_, n)) => *n += 1,
            None => counts.push((class, 1)),
        }
    }

    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .iter()
        .take(MEANING_TOP_N)
        .map(|(class, _)| class.meaning())
        .collect::<Vec<_>>()
        .join(MEANING_SEPARATOR)
}

/// Concatenated 3-bit codes, in sequence order. Depends only on the symbols.
pub fn to_binary(seq: &PhotonicSequence) -> String {
    symbols_to_binary(&seq.symbols)
}

pub fn symbols_to_binary(symbols: &[SymbolClass]) -> String {
    let mut bits = String::with_capacity(symbols.len() * BITS_PER_SYMBOL);
    for class in symbols {
        bits.push_str(class.code());
    }
    bits
}

/// Hex photonic code: the binary string read as an unsigned integer, padded
/// to at least 64 digits and prefixed with `0x`.
///
/// Integers wider than 256 bits are rendered at full width rather than
/// truncated; use [`fits_word256`] to check for the fixed field.
pub fn to_hex(seq: &PhotonicSequence) -> String {
    let digits = bits_to_hex(&to_binary(seq));
    format!("0x{digits:0>width$}", width = HEX_WORD_DIGITS)
}

/// Whether the encoded integer fits a single 256-bit word.
pub fn fits_word256(seq: &PhotonicSequence) -> bool {
    let bits = to_binary(seq);
    bits.trim_start_matches('0').len() <= HEX_WORD_DIGITS * 4
}

/// Hex digits of a bit string's integer value, without leading zeros.
fn bits_to_hex(bits: &str) -> String {
    let significant = bits.trim_start_matches('0');
    if significant.is_empty() {
        return "0".to_string();
    }

    let pad = (4 - significant.len() % 4) % 4;
    let padded = format!("{}{significant}", "0".repeat(pad));

    padded
        .as_bytes()
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0usize, |acc, b| (acc << 1) | usize::from(*b == b'1'));
            HEX_DIGITS[value] as char
        })
        .collect()
}

/// Inverse of [`to_binary`]: recover the symbol classes from a bit string.
pub fn decode_binary(bits: &str) -> Result<Vec<SymbolClass>, CodecError> {
    if let Some(bad) = bits.chars().find(|c| *c != '0' && *c != '1') {
        return Err(CodecError::InvalidBits(bad));
    }
    if bits.len() % BITS_PER_SYMBOL != 0 {
        return Err(CodecError::InvalidLength(bits.len()));
    }

    bits.as_bytes()
        .chunks(BITS_PER_SYMBOL)
        .enumerate()
        .map(|(pos, chunk)| {
            // chunk is ASCII 0/1, checked above
            let code = std::str::from_utf8(chunk).unwrap_or(GUARD_CODE);
            SymbolClass::from_code(code).ok_or(CodecError::GuardCode(pos))
        })
        .collect()
}
