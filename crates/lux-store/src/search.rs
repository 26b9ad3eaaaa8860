use crate::entry::MemoryEntry;

/// Default result cap for relevance search.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

const PHRASE_SCORE: f64 = 100.0;
const WORD_SCORE: f64 = 10.0;
const CATEGORY_SCORE: f64 = 50.0;
const IMPORTANCE_DIVISOR: f64 = 10.0;

/// A search hit and its relevance score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMemory<'a> {
    pub entry: &'a MemoryEntry,
    pub score: f64,
}

/// Relevance of one entry to an already lower-cased query.
///
/// Phrase hit in the content, plus one bonus per query word found in the
/// content, plus a category hit, plus a tenth of the importance.
pub fn relevance(entry: &MemoryEntry, query_lower: &str) -> f64 {
    let content = entry.content.to_lowercase();
    let mut score = 0.0;

    if content.contains(query_lower) {
        score += PHRASE_SCORE;
    }

    for word in query_lower.split_whitespace() {
        if content.contains(word) {
            score += WORD_SCORE;
        }
    }

    if entry.category.to_lowercase().contains(query_lower) {
        score += CATEGORY_SCORE;
    }

    score + f64::from(entry.importance) / IMPORTANCE_DIVISOR
}

/// Score every entry, drop zero scores, and return the best `limit` hits.
///
/// Ties keep input order. A blank query or a zero limit yields nothing.
/// The query is matched as given, surrounding whitespace included.
pub fn rank<'a>(
    entries: impl Iterator<Item = &'a MemoryEntry>,
    query: &str,
    limit: usize,
) -> Vec<ScoredMemory<'a>> {
    if query.trim().is_empty() || limit == 0 {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();

    let mut hits: Vec<ScoredMemory<'a>> = entries
        .map(|entry| ScoredMemory {
            entry,
            score: relevance(entry, &query_lower),
        })
        .filter(|hit| hit.score > 0.0)
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    hits
}
