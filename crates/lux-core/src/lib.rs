//! Photonic text codec.
//!
//! Maps text onto a seven-symbol alphabet ("colors"), one symbol per
//! whitespace word, each carrying a fixed wavelength, frequency and 3-bit
//! code. Derives energy, coherence and a meaning summary, and serializes
//! symbol sequences to binary and hex photonic codes.
//!
//! Zero I/O: pure functions with no opinions about transport or persistence.

pub mod codec;
pub mod constants;
pub mod id;
pub mod light;
pub mod symbol;
pub mod time;
pub mod tokenizer;

pub use codec::{
    CodecError, PhotonicSequence, decode_binary, encode, fits_word256, to_binary, to_hex,
};
pub use constants::HEX_WORD_DIGITS;
pub use id::record_id;
pub use light::{LightMemory, visualize_light_memory};
pub use symbol::{SymbolClass, classify};
pub use time::{millis_to_iso8601, now_unix_millis};
pub use tokenizer::{tokenize, word_count};
