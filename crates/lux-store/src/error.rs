use std::fmt;

use crate::ledger::LedgerError;

#[derive(Debug)]
pub enum StoreError {
    InvalidData(String),
    Config(String),
    Io(std::io::Error),
    Ledger(LedgerError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Ledger(e) => write!(f, "ledger error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(e: toml::de::Error) -> Self {
        StoreError::Config(e.to_string())
    }
}

impl From<LedgerError> for StoreError {
    fn from(e: LedgerError) -> Self {
        StoreError::Ledger(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
