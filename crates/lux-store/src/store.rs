use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

use lux_core::{encode, now_unix_millis, record_id, to_hex};

use crate::context::render_context;
use crate::entry::{ConversationRole, MemoryEntry, MemoryMetadata, MemoryType, NewMemory};
use crate::error::{Result, StoreError};
use crate::filter::MemoryFilter;
use crate::index::MemoryIndex;
use crate::ledger::{DisabledLedger, Ledger, LedgerError, LedgerRecord};
use crate::search::{self, ScoredMemory};

/// Age after which the index is rebuilt on the next read.
pub const INDEX_STALE_AFTER: Duration = Duration::from_secs(60);

/// Bound on a single ledger call.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(5);

pub const MAX_IMPORTANCE: u8 = 100;

/// Distinct shared words needed for two memories to count as related.
pub const RELATED_MIN_SHARED_WORDS: usize = 3;
pub const RELATED_MAX: usize = 5;

const ID_PREFIX: &str = "mem";
const CONVERSATION_IMPORTANCE: u8 = 70;
const LEARNING_IMPORTANCE: u8 = 85;
const THOUGHT_IMPORTANCE: u8 = 60;
const DEFAULT_THOUGHT_CATEGORY: &str = "reflection";

#[derive(Default)]
struct Cache {
    entries: Vec<MemoryEntry>,
    by_id: HashMap<String, usize>,
    indexed_at: Option<Instant>,
}

impl Cache {
    fn is_stale(&self) -> bool {
        self.indexed_at
            .is_none_or(|at| at.elapsed() >= INDEX_STALE_AFTER)
    }

    fn refresh_if_stale(&mut self) {
        if self.is_stale() {
            self.rebuild();
        }
    }

    // Ledger reconciliation is not implemented: records written by another
    // process never reach this cache.
    fn rebuild(&mut self) {
        self.indexed_at = Some(Instant::now());
        tracing::debug!("memory index rebuilt over {} cached entries", self.entries.len());
    }

    fn insert(&mut self, entry: MemoryEntry) {
        self.by_id.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

/// Append-only memory store: an in-process cache fronting a [`Ledger`].
///
/// Every record is hashed and offered to the ledger once; ledger failures
/// degrade to cache-only storage and never fail the write. All reads are
/// served from the cache. The cache has no eviction and grows for the
/// lifetime of the store.
pub struct MemoryStore<L = DisabledLedger> {
    ledger: L,
    ledger_timeout: Duration,
    cache: Mutex<Cache>,
}

impl MemoryStore<DisabledLedger> {
    /// Store with no ledger behind it.
    pub fn cache_only() -> Self {
        Self::new(DisabledLedger)
    }
}

impl Default for MemoryStore<DisabledLedger> {
    fn default() -> Self {
        Self::cache_only()
    }
}

impl<L: Ledger> MemoryStore<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_timeout(ledger, DEFAULT_LEDGER_TIMEOUT)
    }

    pub fn with_timeout(ledger: L, ledger_timeout: Duration) -> Self {
        Self {
            ledger,
            ledger_timeout,
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_timeout(&self) -> Duration {
        self.ledger_timeout
    }

    fn cache(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Write ---

    /// Create a record, offer its hash to the ledger, and cache it.
    ///
    /// Fails only on invalid input. A failed, rejected or timed-out ledger
    /// call leaves `tx_hash` and `block_number` empty.
    pub async fn store_memory(&self, input: NewMemory) -> Result<MemoryEntry> {
        let NewMemory {
            memory_type,
            content,
            category,
            importance,
            timestamp,
            connections,
            photonic_code,
            metadata,
        } = input;

        if importance > MAX_IMPORTANCE {
            return Err(StoreError::InvalidData(format!(
                "importance must be within 0..={MAX_IMPORTANCE}, got {importance}"
            )));
        }

        let timestamp = timestamp.unwrap_or_else(now_unix_millis);
        let id = self.mint_id(timestamp);
        let photonic_code =
            photonic_code.unwrap_or_else(|| to_hex(&encode(&content, Some(&category))));
        let content_hash = hash_content(&content);

        let mut entry = MemoryEntry {
            id,
            memory_type,
            content,
            timestamp,
            block_number: None,
            tx_hash: None,
            category,
            importance,
            connections,
            photonic_code: Some(photonic_code),
            content_hash,
            metadata,
        };

        let record = LedgerRecord {
            record_id: entry.id.clone(),
            content_hash: entry.content_hash.clone(),
            timestamp: entry.timestamp,
            category: entry.category.clone(),
            metadata: entry.metadata.with_ledger_defaults(),
        };

        let call = self.ledger.record(&record);
        let outcome = match tokio::time::timeout(self.ledger_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(self.ledger_timeout)),
        };

        match outcome {
            Ok(receipt) => {
                entry.tx_hash = Some(receipt.tx_hash);
                entry.block_number = receipt.block_number;
            }
            Err(LedgerError::Disabled) => {
                tracing::debug!("ledger disabled, {} kept in cache only", entry.id);
            }
            Err(e) => {
                tracing::warn!("ledger write for {} failed, kept in cache only: {e}", entry.id);
            }
        }

        self.cache().insert(entry.clone());
        tracing::info!(
            "stored {} {} [{}] importance={} tx={}",
            entry.memory_type,
            entry.id,
            entry.category,
            entry.importance,
            entry.tx_hash.as_deref().unwrap_or("-")
        );
        Ok(entry)
    }

    /// Id unique among cached records.
    fn mint_id(&self, millis: u64) -> String {
        let cache = self.cache();
        let mut rng = rand::rng();
        loop {
            let id = record_id(ID_PREFIX, millis, &mut rng);
            if !cache.by_id.contains_key(&id) {
                return id;
            }
        }
    }

    /// One conversation turn, filed under the role's category.
    pub async fn store_conversation(
        &self,
        role: ConversationRole,
        content: impl Into<String>,
        metadata: MemoryMetadata,
    ) -> Result<MemoryEntry> {
        let input = NewMemory::new(MemoryType::Conversation, content, role.category())
            .importance(CONVERSATION_IMPORTANCE)
            .metadata(metadata.with_extra("role", role.as_str()));
        self.store_memory(input).await
    }

    /// A learned insight, stored as `"{topic}: {insights}"`.
    pub async fn store_learning(
        &self,
        topic: &str,
        insights: &str,
        category: impl Into<String>,
        photonic_code: Option<String>,
    ) -> Result<MemoryEntry> {
        let metadata = MemoryMetadata::default()
            .with_extra("topic", topic)
            .with_extra("source", "autonomous_learning");
        let content = format!("{topic}: {insights}");
        let mut input = NewMemory::new(MemoryType::Learning, content, category)
            .importance(LEARNING_IMPORTANCE)
            .metadata(metadata);
        input.photonic_code = photonic_code;
        self.store_memory(input).await
    }

    /// A spontaneous thought; category defaults to `reflection`.
    pub async fn store_thought(
        &self,
        content: impl Into<String>,
        category: Option<&str>,
    ) -> Result<MemoryEntry> {
        let input = NewMemory::new(
            MemoryType::Thought,
            content,
            category.unwrap_or(DEFAULT_THOUGHT_CATEGORY),
        )
        .importance(THOUGHT_IMPORTANCE)
        .metadata(MemoryMetadata::default().with_extra("spontaneous", "true"));
        self.store_memory(input).await
    }

    // --- Read ---

    pub fn get_memory(&self, id: &str) -> Option<MemoryEntry> {
        let cache = self.cache();
        cache.by_id.get(id).map(|&i| cache.entries[i].clone())
    }

    /// Matching records, newest first.
    pub fn get_all_memories(&self, filter: &MemoryFilter) -> Vec<MemoryEntry> {
        let mut cache = self.cache();
        cache.refresh_if_stale();
        filter
            .apply(cache.entries.iter())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Best `limit` records for `query`, highest relevance first.
    pub fn search_memories(&self, query: &str, limit: usize) -> Vec<MemoryEntry> {
        self.search_scored(query, limit)
            .into_iter()
            .map(|(entry, _)| entry)
            .collect()
    }

    /// As [`search_memories`](Self::search_memories), with scores.
    pub fn search_scored(&self, query: &str, limit: usize) -> Vec<(MemoryEntry, f64)> {
        let mut cache = self.cache();
        cache.refresh_if_stale();
        search::rank(cache.entries.iter(), query, limit)
            .into_iter()
            .map(|ScoredMemory { entry, score }| (entry.clone(), score))
            .collect()
    }

    pub fn get_index(&self) -> MemoryIndex {
        let mut cache = self.cache();
        cache.refresh_if_stale();
        MemoryIndex::build(cache.entries.iter())
    }

    /// The `limit` newest records rendered as a prompt context block.
    pub fn get_recent_context(&self, limit: usize) -> String {
        let mut cache = self.cache();
        cache.refresh_if_stale();
        let recent = MemoryFilter::new().limit(limit).apply(cache.entries.iter());
        render_context(&recent, cache.entries.len())
    }

    /// Ids of cached records in `category` that share enough words with
    /// `content`, in insertion order.
    pub fn find_related(&self, content: &str, category: &str) -> Vec<String> {
        let words = distinct_words(content);
        let cache = self.cache();
        cache
            .entries
            .iter()
            .filter(|e| e.category == category)
            .filter(|e| {
                distinct_words(&e.content)
                    .intersection(&words)
                    .count()
                    >= RELATED_MIN_SHARED_WORDS
            })
            .take(RELATED_MAX)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn memory_count(&self) -> usize {
        self.cache().entries.len()
    }

    // --- Maintenance ---

    /// Drop every cached record. Hashes already handed to the ledger are
    /// unaffected.
    pub fn clear_cache(&self) {
        let mut cache = self.cache();
        let dropped = cache.entries.len();
        *cache = Cache::default();
        tracing::info!("cleared {dropped} cached memories");
    }

    pub fn rebuild_index(&self) {
        self.cache().rebuild();
    }

    pub fn index_is_stale(&self) -> bool {
        self.cache().is_stale()
    }
}

/// Lower-case hex SHA-256 of `content`.
pub fn hash_content(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

fn distinct_words(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}
