use std::collections::BTreeMap;

use serde::Serialize;

use crate::entry::{MemoryEntry, MemoryType};

/// Ledger-side summary of the cache.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Entries carrying a block reference.
    pub total_blocks: usize,
    /// Entries carrying a transaction reference.
    pub total_txs: usize,
    /// Total content size, human formatted.
    pub storage_size: String,
}

/// Aggregate snapshot of the store, recomputed on every request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryIndex {
    pub total_memories: usize,
    pub oldest_memory: Option<u64>,
    pub newest_memory: Option<u64>,
    pub categories: BTreeMap<String, usize>,
    pub by_type: BTreeMap<MemoryType, usize>,
    pub ledger: LedgerSummary,
}

impl MemoryIndex {
    /// Build the snapshot in one pass over the entries.
    pub fn build<'a>(entries: impl Iterator<Item = &'a MemoryEntry>) -> Self {
        let mut total = 0;
        let mut oldest: Option<u64> = None;
        let mut newest: Option<u64> = None;
        let mut categories: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_type: BTreeMap<MemoryType, usize> = BTreeMap::new();
        let mut total_blocks = 0;
        let mut total_txs = 0;
        let mut bytes: u64 = 0;

        for entry in entries {
            total += 1;
            oldest = Some(oldest.map_or(entry.timestamp, |t| t.min(entry.timestamp)));
            newest = Some(newest.map_or(entry.timestamp, |t| t.max(entry.timestamp)));
            *categories.entry(entry.category.clone()).or_default() += 1;
            *by_type.entry(entry.memory_type).or_default() += 1;
            if entry.block_number.is_some() {
                total_blocks += 1;
            }
            if entry.tx_hash.is_some() {
                total_txs += 1;
            }
            bytes += entry.content.len() as u64;
        }

        Self {
            total_memories: total,
            oldest_memory: oldest,
            newest_memory: newest,
            categories,
            by_type,
            ledger: LedgerSummary {
                total_blocks,
                total_txs,
                storage_size: format_storage_size(bytes),
            },
        }
    }
}

/// Human-readable byte count: `B` below 1 KiB, else two decimals in KB/MB/GB
/// (binary multiples).
pub fn format_storage_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::MemoryMetadata;

    fn entry(
        category: &str,
        ts: u64,
        content: &str,
        tx: Option<&str>,
        block: Option<u64>,
    ) -> MemoryEntry {
        MemoryEntry {
            id: format!("mem_{ts}"),
            memory_type: MemoryType::Observation,
            content: content.into(),
            timestamp: ts,
            block_number: block,
            tx_hash: tx.map(String::from),
            category: category.into(),
            importance: 50,
            connections: vec![],
            photonic_code: None,
            content_hash: String::new(),
            metadata: MemoryMetadata::default(),
        }
    }

    #[test]
    fn test_empty_index() {
        let idx = MemoryIndex::build(std::iter::empty());
        assert_eq!(idx.total_memories, 0);
        assert_eq!(idx.oldest_memory, None);
        assert_eq!(idx.newest_memory, None);
        assert!(idx.categories.is_empty());
        assert_eq!(idx.ledger.storage_size, "0 B");
    }

    #[test]
    fn test_counts_and_bounds() {
        let entries = vec![
            entry("a", 300, "xx", Some("0x1"), Some(9)),
            entry("a", 100, "yyy", Some("0x2"), None),
            entry("b", 200, "z", None, None),
        ];
        let idx = MemoryIndex::build(entries.iter());
        assert_eq!(idx.total_memories, 3);
        assert_eq!(idx.categories.get("a"), Some(&2));
        assert_eq!(idx.categories.get("b"), Some(&1));
        assert_eq!(idx.by_type.get(&MemoryType::Observation), Some(&3));
        assert_eq!(idx.oldest_memory, Some(100));
        assert_eq!(idx.newest_memory, Some(300));
        assert_eq!(idx.ledger.total_txs, 2);
        assert_eq!(idx.ledger.total_blocks, 1);
        assert_eq!(idx.ledger.storage_size, "6 B");
    }

    #[test]
    fn test_format_storage_size() {
        assert_eq!(format_storage_size(0), "0 B");
        assert_eq!(format_storage_size(1023), "1023 B");
        assert_eq!(format_storage_size(1024), "1.00 KB");
        assert_eq!(format_storage_size(1536), "1.50 KB");
        assert_eq!(format_storage_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_storage_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_serializes_type_keys() {
        let entries = vec![entry("a", 1, "x", None, None)];
        let json = serde_json::to_value(MemoryIndex::build(entries.iter())).unwrap();
        assert_eq!(json["byType"]["observation"], 1);
        assert_eq!(json["totalMemories"], 1);
        assert_eq!(json["ledger"]["storageSize"], "1 B");
    }
}
