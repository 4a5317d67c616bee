//! Append-only activity log.
//!
//! The user-facing record of every operation step: one-line strings in
//! arrival order, never cleared for the lifetime of the process. Entries
//! also go to `tracing` so the same lines show up in service logs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub entry_id: String,
    pub message: String,
    pub timestamp_epoch_ms: u128,
}

#[derive(Clone, Default)]
pub struct ActivityLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, message: impl Into<String>) {
        let entry = LogEntry {
            entry_id: Uuid::new_v4().to_string(),
            message: message.into(),
            timestamp_epoch_ms: epoch_ms().unwrap_or_default(),
        };
        info!("{}", entry.message);
        self.entries.write().await.push(entry);
    }

    pub async fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.read().await.clone()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }
}

fn epoch_ms() -> anyhow::Result<u128> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_keep_arrival_order() {
        let log = ActivityLog::new();
        log.append("first").await;
        log.append("second").await;

        let messages = log.messages().await;
        assert_eq!(messages, vec!["first".to_owned(), "second".to_owned()]);

        let entries = log.snapshot().await;
        assert_ne!(entries[0].entry_id, entries[1].entry_id);
    }
}
