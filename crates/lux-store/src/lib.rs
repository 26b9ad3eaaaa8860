//! Append-only memory store.
//!
//! Records are hashed, offered to a [`Ledger`] and cached in process.
//! Reads (filtering, relevance search, the aggregate index and the prompt
//! context block) are served from the cache.

pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod filter;
pub mod index;
pub mod ledger;
pub mod search;
pub mod store;

pub use config::LuxConfig;
pub use context::{NO_MEMORIES, render_context};
pub use entry::{ConversationRole, MemoryEntry, MemoryMetadata, MemoryType, NewMemory};
pub use error::{Result, StoreError};
pub use filter::MemoryFilter;
pub use index::{LedgerSummary, MemoryIndex, format_storage_size};
pub use ledger::{
    ConfiguredLedger, DisabledLedger, HttpLedger, Ledger, LedgerError, LedgerReceipt, LedgerRecord,
};
pub use search::DEFAULT_SEARCH_LIMIT;
pub use store::{MemoryStore, hash_content};
