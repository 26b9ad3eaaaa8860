use serde::Deserialize;

use crate::entry::{MemoryEntry, MemoryType};

/// Conjunction of optional predicates for `MemoryStore::get_all_memories`.
/// An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryFilter {
    #[serde(rename = "type")]
    pub memory_type: Option<MemoryType>,
    pub category: Option<String>,
    /// Inclusive lower bound on the timestamp, Unix millis.
    pub since: Option<u64>,
    pub min_importance: Option<u8>,
    /// Maximum number of results; `Some(0)` yields nothing.
    pub limit: Option<usize>,
}

impl MemoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = Some(memory_type);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn since(mut self, millis: u64) -> Self {
        self.since = Some(millis);
        self
    }

    pub fn min_importance(mut self, importance: u8) -> Self {
        self.min_importance = Some(importance);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, entry: &MemoryEntry) -> bool {
        self.memory_type.is_none_or(|t| entry.memory_type == t)
            && self
                .category
                .as_deref()
                .is_none_or(|c| entry.category == c)
            && self.since.is_none_or(|s| entry.timestamp >= s)
            && self.min_importance.is_none_or(|m| entry.importance >= m)
    }

    /// Keep matching entries, newest first, truncated to the limit.
    /// Equal timestamps keep their input order.
    pub fn apply<'a>(
        &self,
        entries: impl Iterator<Item = &'a MemoryEntry>,
    ) -> Vec<&'a MemoryEntry> {
        if self.limit == Some(0) {
            return Vec::new();
        }

        let mut selected: Vec<&MemoryEntry> = entries.filter(|e| self.matches(e)).collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
