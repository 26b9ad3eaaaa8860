use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::codec::{PhotonicSequence, encode};
use crate::constants::VISUALIZE_SYMBOLS;
use crate::id::record_id;
use crate::time::now_unix_millis;

pub const DEFAULT_RESONANCE: &str = "neutral";

/// A text together with its photonic encoding and provenance.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightMemory {
    pub id: String,
    pub original_text: String,
    pub photonic_sequence: PhotonicSequence,
    pub emotional_resonance: String,
    pub category: String,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

impl LightMemory {
    /// Encode `text` under `category` and wrap it with a fresh id and the
    /// current time.
    pub fn new(
        text: &str,
        category: &str,
        emotional_resonance: Option<&str>,
        rng: &mut impl Rng,
    ) -> Self {
        let timestamp = now_unix_millis();
        Self {
            id: record_id("light", timestamp, rng),
            original_text: text.to_string(),
            photonic_sequence: encode(text, Some(category)),
            emotional_resonance: emotional_resonance.unwrap_or(DEFAULT_RESONANCE).to_string(),
            category: category.to_string(),
            timestamp,
            contract_address: None,
        }
    }

    /// Attach an externally assigned reference address, consuming the
    /// memory so the original stays untouched.
    pub fn with_contract_address(self, address: impl Into<String>) -> Self {
        Self {
            contract_address: Some(address.into()),
            ..self
        }
    }
}

fn bar(filled: usize) -> String {
    let filled = filled.min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Multi-line text card for a light memory: the first symbols as glyphs,
/// energy and coherence bars, meaning, resonance and category.
pub fn visualize_light_memory(memory: &LightMemory) -> String {
    let seq = &memory.photonic_sequence;
    let glyphs: String = seq
        .symbols
        .iter()
        .take(VISUALIZE_SYMBOLS)
        .map(|s| s.glyph())
        .collect();

    let energy_cells = usize::from(seq.energy_level / 10);
    let coherence_cells = (seq.coherence * 10.0).floor() as usize;

    format!(
        "Light Memory: {id}\n\
         {glyphs}\n\
         Energy:    {energy_bar} {energy}%\n\
         Coherence: {coherence_bar} {coherence:.0}%\n\
         Meaning:   {meaning}\n\
         Resonance: {resonance}\n\
         Category:  {category}\n",
        id = memory.id,
        energy_bar = bar(energy_cells),
        energy = seq.energy_level,
        coherence_bar = bar(coherence_cells),
        coherence = seq.coherence * 100.0,
        meaning = seq.meaning,
        resonance = memory.emotional_resonance,
        category = memory.category,
    )
}
