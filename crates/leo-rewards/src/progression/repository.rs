use serde_json::Value;

use super::domain::StateDocument;

/// Storage abstraction for the whole application state document: loaded on
/// demand as raw JSON (so migration can run first), saved after every
/// transition. Durability, write ordering across devices, and multi-tab
/// conflicts are the host's problem, not the engine's.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<Option<Value>, StoreError>;
    fn save(&self, document: &StateDocument) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state store unavailable: {0}")]
    Unavailable(String),
    #[error("persisted state could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}
