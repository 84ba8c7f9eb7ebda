use chrono::NaiveDate;
use leo_rewards::progression::{StateDocument, StateStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local state store. The persisted shape is the raw JSON document,
/// matching what a file or remote backend would hold.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStateStore {
    document: Arc<Mutex<Option<Value>>>,
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> Result<Option<Value>, StoreError> {
        let guard = self.document.lock().expect("state store mutex poisoned");
        Ok(guard.clone())
    }

    fn save(&self, document: &StateDocument) -> Result<(), StoreError> {
        let value = serde_json::to_value(document)?;
        let mut guard = self.document.lock().expect("state store mutex poisoned");
        *guard = Some(value);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
