use lux_core::millis_to_iso8601;

use crate::entry::{MemoryEntry, MemoryType};

/// Default number of recent records considered for the context block.
pub const DEFAULT_CONTEXT_LIMIT: usize = 100;

/// Records listed per type subsection.
pub const PER_TYPE_LIMIT: usize = 20;

/// Characters of content shown per record.
pub const CONTENT_PREVIEW_CHARS: usize = 150;

/// Returned instead of an empty block.
pub const NO_MEMORIES: &str = "No previous memories loaded.";

/// First `max` characters of `content`, with `...` when cut.
pub fn preview(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Render newest-first records as a prompt-ready text block, grouped by
/// type in order of first appearance. `total` is the full cache size.
pub fn render_context(recent: &[&MemoryEntry], total: usize) -> String {
    if recent.is_empty() {
        return NO_MEMORIES.to_string();
    }

    let mut groups: Vec<(MemoryType, Vec<&MemoryEntry>)> = Vec::new();
    for entry in recent {
        match groups.iter_mut().find(|(t, _)| *t == entry.memory_type) {
            Some((_, list)) => list.push(entry),
            None => groups.push((entry.memory_type, vec![entry])),
        }
    }

    let mut lines = vec![
        format!("## MEMORY ({} most recent entries)", recent.len()),
        String::new(),
        format!("{total} memories are held in total."),
        String::new(),
    ];

    for (memory_type, entries) in &groups {
        lines.push(format!(
            "### {} ({}):",
            memory_type.as_str().to_uppercase(),
            entries.len()
        ));
        for entry in entries.iter().take(PER_TYPE_LIMIT) {
            lines.push(format!(
                "- [{}] {}: {}",
                millis_to_iso8601(entry.timestamp),
                entry.category,
                preview(&entry.content, CONTENT_PREVIEW_CHARS)
            ));
        }
        lines.push(String::new());
    }

    lines.push("Any of these memories may be referenced in the response.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::MemoryMetadata;

    fn entry(t: MemoryType, ts: u64, content: &str) -> MemoryEntry {
        MemoryEntry {
            id: format!("mem_{ts}"),
            memory_type: t,
            content: content.into(),
            timestamp: ts,
            block_number: None,
            tx_hash: None,
            category: "cat".into(),
            importance: 50,
            connections: vec![],
            photonic_code: None,
            content_hash: String::new(),
            metadata: MemoryMetadata::default(),
        }
    }

    #[test]
    fn test_empty_returns_sentinel() {
        assert_eq!(render_context(&[], 0), NO_MEMORIES);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 150), "short");
        let long = "x".repeat(151);
        assert_eq!(preview(&long, 150), format!("{}...", "x".repeat(150)));
        let exact = "y".repeat(150);
        assert_eq!(preview(&exact, 150), exact);
        // multi-byte characters are never split
        assert_eq!(preview("ééé", 2), "éé...");
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let entries = vec![
            entry(MemoryType::Thought, 3_000, "newest thought"),
            entry(MemoryType::Learning, 2_000, "a lesson"),
            entry(MemoryType::Thought, 1_000, "older thought"),
        ];
        let refs: Vec<&MemoryEntry> = entries.iter().collect();
        let block = render_context(&refs, 10);

        assert!(block.starts_with("## MEMORY (3 most recent entries)"));
        assert!(block.contains("10 memories are held in total."));
        let thought = block.find("### THOUGHT (2):").unwrap();
        let learning = block.find("### LEARNING (1):").unwrap();
        assert!(thought < learning);
        assert!(block.contains("- [1970-01-01T00:00:03.000Z] cat: newest thought"));
    }

    #[test]
    fn test_per_type_cap() {
        let entries: Vec<MemoryEntry> = (0..25)
            .map(|i| entry(MemoryType::Observation, 100 - i, &format!("obs {i}")))
            .collect();
        let refs: Vec<&MemoryEntry> = entries.iter().collect();
        let block = render_context(&refs, 25);
        assert!(block.contains("### OBSERVATION (25):"));
        assert_eq!(block.matches("] cat: obs").count(), PER_TYPE_LIMIT);
    }
}
