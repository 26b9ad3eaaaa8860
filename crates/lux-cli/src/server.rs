use std::sync::Arc;

use lux_core::{encode, fits_word256, to_binary, to_hex};
use lux_store::{
    ConfiguredLedger, MemoryFilter, MemoryMetadata, MemoryStore, MemoryType, NewMemory, StoreError,
    DEFAULT_SEARCH_LIMIT,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Clone)]
pub struct LuxServer {
    store: Arc<MemoryStore<ConfiguredLedger>>,
    context_limit: usize,
    tool_router: ToolRouter<Self>,
}

impl LuxServer {
    pub fn new(store: MemoryStore<ConfiguredLedger>, context_limit: usize) -> Self {
        Self {
            store: Arc::new(store),
            context_limit,
            tool_router: Self::tool_router(),
        }
    }
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct EncodeRequest {
    /// Text to encode, one symbol per whitespace-separated word
    text: String,
    /// Optional category hint used when no keyword matches a word
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
struct MetadataParams {
    /// Model that produced the memory
    model: Option<String>,
    /// Emotional tone, e.g. "curious"
    emotion: Option<String>,
    /// User the memory concerns
    user: Option<String>,
    /// Free-form situational context
    context: Option<String>,
}

impl From<MetadataParams> for MemoryMetadata {
    fn from(p: MetadataParams) -> Self {
        MemoryMetadata {
            model: p.model,
            emotion: p.emotion,
            user: p.user,
            context: p.context,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct StoreRequest {
    /// One of: conversation, knowledge, learning, thought, observation
    #[serde(rename = "type")]
    memory_type: String,
    /// Memory text
    content: String,
    /// Category tag
    category: String,
    /// 0-100, default 50
    importance: Option<i64>,
    /// Ids of related memories
    connections: Option<Vec<String>>,
    /// Precomputed photonic code; computed from the content when absent
    photonic_code: Option<String>,
    metadata: Option<MetadataParams>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetRequest {
    /// Memory id, as returned by lux_store
    id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MemoriesRequest {
    /// Only this memory type
    #[serde(rename = "type")]
    memory_type: Option<String>,
    /// Only this category (exact match)
    category: Option<String>,
    /// Only memories at or after this Unix time in milliseconds
    since: Option<u64>,
    /// Only memories with at least this importance
    min_importance: Option<i64>,
    /// Maximum results; zero or negative returns nothing
    limit: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchRequest {
    /// Search text; matched as a phrase and word by word
    query: String,
    /// Maximum results, default 50; zero or negative returns nothing
    limit: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RelatedRequest {
    /// Text to compare against stored memories
    content: String,
    /// Only memories in this category are considered
    category: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContextRequest {
    /// Number of recent memories to include; zero or negative returns the empty sentinel
    limit: Option<i64>,
}

/// Caller-supplied limit: absent means `default`, non-positive means none.
fn resolve_limit(raw: Option<i64>, default: usize) -> usize {
    match raw {
        None => default,
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

fn parse_memory_type(raw: &str) -> Result<MemoryType, McpError> {
    raw.parse().map_err(|e: String| McpError::invalid_params(e, None))
}

fn json_result(value: &impl serde::Serialize) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

#[tool_router]
impl LuxServer {
    #[tool(
        description = "Encode text into a photonic sequence: one color symbol per word with wavelengths, frequencies, energy (0-100), coherence (0-1) and a meaning summary, plus the binary and 0x-prefixed hex photonic codes."
    )]
    async fn lux_encode(
        &self,
        Parameters(req): Parameters<EncodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let seq = encode(&req.text, req.category.as_deref());
        let result = serde_json::json!({
            "binary": to_binary(&seq),
            "hex": to_hex(&seq),
            "fitsWord256": fits_word256(&seq),
            "sequence": seq,
        });
        Ok(json_result(&result))
    }

    #[tool(
        description = "Store a memory. Its content hash is offered to the ledger when one is configured; ledger failures keep the memory cache-only and are not errors. Returns the stored entry with its id."
    )]
    async fn lux_store(
        &self,
        Parameters(req): Parameters<StoreRequest>,
    ) -> Result<CallToolResult, McpError> {
        let memory_type = parse_memory_type(&req.memory_type)?;
        let mut input = NewMemory::new(memory_type, req.content, req.category);

        if let Some(importance) = req.importance {
            input.importance = u8::try_from(importance).map_err(|_| {
                McpError::invalid_params(
                    format!("importance must be within 0..=100, got {importance}"),
                    None,
                )
            })?;
        }
        if let Some(connections) = req.connections {
            input.connections = connections;
        }
        input.photonic_code = req.photonic_code;
        input.metadata = req.metadata.unwrap_or_default().into();

        let entry = self.store.store_memory(input).await.map_err(|e| match e {
            StoreError::InvalidData(msg) => McpError::invalid_params(msg, None),
            other => McpError::internal_error(other.to_string(), None),
        })?;
        Ok(json_result(&entry))
    }

    #[tool(description = "Fetch one memory by id.")]
    async fn lux_get(
        &self,
        Parameters(req): Parameters<GetRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.get_memory(&req.id) {
            Some(entry) => Ok(json_result(&entry)),
            None => Err(McpError::invalid_params(
                format!("no memory with id '{}'", req.id),
                None,
            )),
        }
    }

    #[tool(
        description = "List memories newest first, optionally filtered by type, category, minimum timestamp and minimum importance."
    )]
    async fn lux_memories(
        &self,
        Parameters(req): Parameters<MemoriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut filter = MemoryFilter::new();
        if let Some(raw) = &req.memory_type {
            filter = filter.memory_type(parse_memory_type(raw)?);
        }
        if let Some(category) = req.category {
            filter = filter.category(category);
        }
        if let Some(since) = req.since {
            filter = filter.since(since);
        }
        if let Some(min) = req.min_importance {
            filter = filter.min_importance(min.clamp(0, i64::from(u8::MAX)) as u8);
        }
        if req.limit.is_some() {
            filter = filter.limit(resolve_limit(req.limit, usize::MAX));
        }

        let entries = self.store.get_all_memories(&filter);
        Ok(json_result(&serde_json::json!({
            "count": entries.len(),
            "memories": entries,
        })))
    }

    #[tool(
        description = "Search memories by relevance: exact phrase hits rank highest, then individual word hits, category hits and importance."
    )]
    async fn lux_search(
        &self,
        Parameters(req): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let limit = resolve_limit(req.limit, DEFAULT_SEARCH_LIMIT);
        let hits: Vec<serde_json::Value> = self
            .store
            .search_scored(&req.query, limit)
            .into_iter()
            .map(|(entry, score)| serde_json::json!({ "score": score, "memory": entry }))
            .collect();
        Ok(json_result(&serde_json::json!({
            "query": req.query,
            "results": hits,
        })))
    }

    #[tool(
        description = "Ids of up to 5 memories in the same category that share at least 3 words with the given content."
    )]
    async fn lux_related(
        &self,
        Parameters(req): Parameters<RelatedRequest>,
    ) -> Result<CallToolResult, McpError> {
        let ids = self.store.find_related(&req.content, &req.category);
        Ok(json_result(&serde_json::json!({ "related": ids })))
    }

    #[tool(
        description = "Aggregate index: total count, oldest and newest timestamps, counts by category and type, and ledger coverage."
    )]
    async fn lux_index(&self) -> Result<CallToolResult, McpError> {
        Ok(json_result(&self.store.get_index()))
    }

    #[tool(
        description = "Recent memories rendered as a text block grouped by type, ready to prepend to a prompt."
    )]
    async fn lux_context(
        &self,
        Parameters(req): Parameters<ContextRequest>,
    ) -> Result<CallToolResult, McpError> {
        let limit = resolve_limit(req.limit, self.context_limit);
        Ok(CallToolResult::success(vec![Content::text(
            self.store.get_recent_context(limit),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for LuxServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Photonic memory: text is encoded into color symbols and stored as hashed, append-only memories.\n\n\
                 - lux_store records a memory; lux_get, lux_memories and lux_search read them back.\n\
                 - lux_context returns recent memories as a prompt-ready block.\n\
                 - lux_encode encodes text without storing it.\n\
                 - Memories live for the lifetime of the server process; only content hashes reach the ledger."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
