//! Persistence collaborator contract.
//!
//! The store hands each record's content hash to a [`Ledger`] for durable,
//! tamper-evident recording and gets back a receipt. The ledger is never
//! read back; recall is served from the in-process cache.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::entry::MemoryMetadata;

/// What the ledger is asked to record for one memory.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub record_id: String,
    pub content_hash: String,
    pub timestamp: u64,
    pub category: String,
    pub metadata: MemoryMetadata,
}

/// Acknowledgement returned by the ledger.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub tx_hash: String,
    #[serde(default)]
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// No ledger configured; records stay cache-only.
    Disabled,
    /// Transport failure or unreadable response.
    Http(String),
    /// The ledger answered but refused the record.
    Rejected(String),
    /// No answer within the bound.
    Timeout(Duration),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Disabled => write!(f, "ledger disabled"),
            LedgerError::Http(msg) => write!(f, "ledger transport error: {msg}"),
            LedgerError::Rejected(msg) => write!(f, "ledger rejected record: {msg}"),
            LedgerError::Timeout(d) => write!(f, "ledger timed out after {}ms", d.as_millis()),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Durable recorder of content hashes.
pub trait Ledger: Send + Sync {
    fn record(
        &self,
        record: &LedgerRecord,
    ) -> impl Future<Output = Result<LedgerReceipt, LedgerError>> + Send;
}

/// Ledger that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLedger;

impl Ledger for DisabledLedger {
    async fn record(&self, _record: &LedgerRecord) -> Result<LedgerReceipt, LedgerError> {
        Err(LedgerError::Disabled)
    }
}

/// Ledger reached over HTTP: POSTs the record as JSON and expects a
/// `{"txHash": "...", "blockNumber": n}` body back.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    client: Client,
    endpoint: String,
}

impl HttpLedger {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Ledger for HttpLedger {
    async fn record(&self, record: &LedgerRecord) -> Result<LedgerReceipt, LedgerError> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| LedgerError::Http(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected(format!("HTTP {status}: {body}")));
        }

        res.json::<LedgerReceipt>()
            .await
            .map_err(|e| LedgerError::Http(format!("unreadable receipt: {e}")))
    }
}

/// The ledger selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredLedger {
    Http(HttpLedger),
    Disabled(DisabledLedger),
}

impl ConfiguredLedger {
    pub fn describe(&self) -> String {
        match self {
            ConfiguredLedger::Http(l) => format!("http {}", l.endpoint()),
            ConfiguredLedger::Disabled(_) => "disabled".to_string(),
        }
    }
}

impl Ledger for ConfiguredLedger {
    async fn record(&self, record: &LedgerRecord) -> Result<LedgerReceipt, LedgerError> {
        match self {
            ConfiguredLedger::Http(l) => l.record(record).await,
            ConfiguredLedger::Disabled(l) => l.record(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LedgerRecord {
        LedgerRecord {
            record_id: "mem_1_abc".into(),
            content_hash: "00ff".into(),
            timestamp: 42,
            category: "science".into(),
            metadata: MemoryMetadata::default(),
        }
    }

    #[tokio::test]
    async fn test_disabled_ledger_fails() {
        let err = DisabledLedger.record(&record()).await.unwrap_err();
        assert_eq!(err, LedgerError::Disabled);
    }

    #[tokio::test]
    async fn test_http_ledger_unreachable() {
        // port 9 (discard) on localhost is not an HTTP server
        let ledger =
            HttpLedger::new("http://127.0.0.1:9/record", Duration::from_millis(500)).unwrap();
        let err = ledger.record(&record()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Http(_)), "got {err:?}");
    }

    #[test]
    fn test_record_wire_format() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["recordId"], "mem_1_abc");
        assert_eq!(json["contentHash"], "00ff");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn test_receipt_parse() {
        let r: LedgerReceipt =
            serde_json::from_str(r#"{"txHash":"0xdead","blockNumber":7}"#).unwrap();
        assert_eq!(r.tx_hash, "0xdead");
        assert_eq!(r.block_number, Some(7));

        let r: LedgerReceipt = serde_json::from_str(r#"{"txHash":"0xbeef"}"#).unwrap();
        assert_eq!(r.block_number, None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(ConfiguredLedger::Disabled(DisabledLedger).describe(), "disabled");
    }
}
