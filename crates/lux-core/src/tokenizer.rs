use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]").unwrap());
static HIGH_ENERGY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)breakthrough|discovery|revolution|advanced|quantum|transcend|enlighten")
        .unwrap()
});

/// Tokenize text into lowercase words.
/// Splits on any run of whitespace; punctuation stays attached to its word
/// so the token count always equals the whitespace word count.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of whitespace-delimited words, without allocating tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether the text carries any sentence-ending punctuation.
pub fn has_sentence_punctuation(text: &str) -> bool {
    SENTENCE_PUNCT.is_match(text)
}

/// Split text on `.`, `!` and `?`, dropping blank fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_PUNCT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Count non-overlapping high-energy keyword hits, case-insensitive.
pub fn high_energy_hits(text: &str) -> usize {
    HIGH_ENERGY.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenize() {
        let tokens = tokenize("Hello World");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_punctuation_kept() {
        let tokens = tokenize("Hello, world!");
        assert_eq!(tokens, vec!["hello,", "world!"]);
    }

    #[test]
    fn test_whitespace_collapses() {
        let tokens = tokenize("  a \t\n b   c  ");
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("   \t\n  ").is_empty());
    }

    #[test]
    fn test_sentence_splitting() {
        assert_eq!(split_sentences("First. Second! Third? Fourth.").len(), 4);
        assert_eq!(split_sentences("No punctuation here").len(), 1);
        assert_eq!(split_sentences("...").len(), 0);
        assert_eq!(split_sentences("").len(), 0);
    }

    #[test]
    fn test_has_sentence_punctuation() {
        assert!(has_sentence_punctuation("done."));
        assert!(has_sentence_punctuation("what?"));
        assert!(!has_sentence_punctuation("no marks, only commas"));
    }

    #[test]
    fn test_high_energy_hits() {
        assert_eq!(high_energy_hits("A Quantum breakthrough"), 2);
        assert_eq!(high_energy_hits("QUANTUM quantum Quantum"), 3);
        assert_eq!(high_energy_hits("enlightenment transcendence"), 2);
        assert_eq!(high_energy_hits("plain words"), 0);
    }
}
