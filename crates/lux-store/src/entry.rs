use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of memory held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Conversation,
    Knowledge,
    Learning,
    Thought,
    Observation,
}

impl MemoryType {
    pub const ALL: [MemoryType; 5] = [
        MemoryType::Conversation,
        MemoryType::Knowledge,
        MemoryType::Learning,
        MemoryType::Thought,
        MemoryType::Observation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryType::Conversation => "conversation",
            MemoryType::Knowledge => "knowledge",
            MemoryType::Learning => "learning",
            MemoryType::Thought => "thought",
            MemoryType::Observation => "observation",
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        MemoryType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "memory type must be one of conversation, knowledge, learning, thought, observation; got '{s}'"
                )
            })
    }
}

/// Provenance attached to a memory. Known keys are typed; anything else
/// goes in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl MemoryMetadata {
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Copy with `emotion` and `model` filled in, as handed to the ledger.
    pub fn with_ledger_defaults(&self) -> Self {
        Self {
            emotion: Some(self.emotion_or_neutral().to_string()),
            model: Some(self.model_or_default().to_string()),
            ..self.clone()
        }
    }

    /// Emotion, defaulting to `neutral`.
    pub fn emotion_or_neutral(&self) -> &str {
        self.emotion.as_deref().unwrap_or("neutral")
    }

    /// Model name, defaulting to `memory-system`.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or("memory-system")
    }
}

/// One persisted unit of the append-only store.
///
/// Only `tx_hash` and `block_number` are ever filled in after construction,
/// and only from a ledger receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    pub content: String,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub category: String,
    pub importance: u8,
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photonic_code: Option<String>,
    /// Lower-case hex SHA-256 of `content`.
    pub content_hash: String,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

/// Caller input to `MemoryStore::store_memory`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMemory {
    pub memory_type: MemoryType,
    pub content: String,
    pub category: String,
    pub importance: u8,
    /// Unix millis; `None` means "now".
    pub timestamp: Option<u64>,
    pub connections: Vec<String>,
    /// Precomputed photonic code; `None` means "encode the content".
    pub photonic_code: Option<String>,
    pub metadata: MemoryMetadata,
}

impl NewMemory {
    pub const DEFAULT_IMPORTANCE: u8 = 50;

    pub fn new(
        memory_type: MemoryType,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            memory_type,
            content: content.into(),
            category: category.into(),
            importance: Self::DEFAULT_IMPORTANCE,
            timestamp: None,
            connections: Vec::new(),
            photonic_code: None,
            metadata: MemoryMetadata::default(),
        }
    }

    pub fn importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn timestamp(mut self, millis: u64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    pub fn connections(mut self, ids: Vec<String>) -> Self {
        self.connections = ids;
        self
    }

    pub fn photonic_code(mut self, code: impl Into<String>) -> Self {
        self.photonic_code = Some(code.into());
        self
    }

    pub fn metadata(mut self, metadata: MemoryMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Speaker of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Assistant,
}

impl ConversationRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ConversationRole::User => "user",
            ConversationRole::Assistant => "assistant",
        }
    }

    /// Category under which messages from this role are filed.
    pub fn category(self) -> &'static str {
        match self {
            ConversationRole::User => "user_input",
            ConversationRole::Assistant => "ai_response",
        }
    }
}

impl FromStr for ConversationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ConversationRole::User),
            "assistant" => Ok(ConversationRole::Assistant),
            other => Err(format!("role must be 'user' or 'assistant', got '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_type_parse() {
        assert_eq!("thought".parse::<MemoryType>(), Ok(MemoryType::Thought));
        assert_eq!("Learning".parse::<MemoryType>(), Ok(MemoryType::Learning));
        assert!("dream".parse::<MemoryType>().is_err());
    }

    #[test]
    fn test_memory_type_display_roundtrip() {
        for t in MemoryType::ALL {
            assert_eq!(t.to_string().parse::<MemoryType>(), Ok(t));
        }
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = MemoryMetadata::default();
        assert_eq!(meta.emotion_or_neutral(), "neutral");
        assert_eq!(meta.model_or_default(), "memory-system");
    }

    #[test]
    fn test_ledger_defaults_keep_supplied_values() {
        let meta = MemoryMetadata {
            emotion: Some("curious".into()),
            ..Default::default()
        }
        .with_extra("topic", "optics");
        let filled = meta.with_ledger_defaults();
        assert_eq!(filled.emotion.as_deref(), Some("curious"));
        assert_eq!(filled.model.as_deref(), Some("memory-system"));
        assert_eq!(filled.extra.get("topic").map(String::as_str), Some("optics"));
    }

    #[test]
    fn test_metadata_skips_empty_fields() {
        let meta = MemoryMetadata {
            user: Some("ada".into()),
            ..Default::default()
        }
        .with_extra("role", "user");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["user"], "ada");
        assert_eq!(json["extra"]["role"], "user");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_new_memory_builder() {
        let input = NewMemory::new(MemoryType::Knowledge, "facts", "science")
            .importance(90)
            .timestamp(1234)
            .connections(vec!["mem_1".into()]);
        assert_eq!(input.importance, 90);
        assert_eq!(input.timestamp, Some(1234));
        assert_eq!(input.connections, vec!["mem_1".to_string()]);
        assert!(input.photonic_code.is_none());
    }

    #[test]
    fn test_role_category() {
        assert_eq!(ConversationRole::User.category(), "user_input");
        assert_eq!(ConversationRole::Assistant.category(), "ai_response");
        assert_eq!("USER".parse::<ConversationRole>(), Ok(ConversationRole::User));
        assert!("system".parse::<ConversationRole>().is_err());
    }
}
