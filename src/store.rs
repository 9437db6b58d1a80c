//! In-Memory Log Store
//!
//! One authoritative, order-consistent log per node. The id counter and the
//! entry vector live behind a single lock so concurrent write handlers can
//! never race id assignment against insertion; this is the only place local
//! log state is mutated.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Sequence id, assigned by the primary
    pub id: u64,
    /// Opaque message content
    pub content: String,
}

impl LogRecord {
    /// Create a new record
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

struct StoreInner {
    entries: Vec<LogRecord>,
    next_id: u64,
}

/// Per-node ordered log of records.
///
/// Entries are kept sorted ascending by id after every mutation. Ids need
/// not be contiguous on arrival; the re-sort is what makes a secondary's
/// log converge to the primary's order despite out-of-order receipt.
pub struct LogStore {
    inner: RwLock<StoreInner>,
}

impl LogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                entries: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Assign the next sequence id and append in one critical section.
    ///
    /// Primary write path: ids start at 0 and are strictly increasing in
    /// acceptance order.
    pub async fn append_next(&self, content: impl Into<String>) -> LogRecord {
        let mut inner = self.inner.write().await;
        let record = LogRecord::new(inner.next_id, content);
        inner.next_id += 1;
        inner.entries.push(record.clone());
        inner.entries.sort_by_key(|r| r.id);
        record
    }

    /// Append a record with an already-assigned id.
    ///
    /// Secondary write path. Duplicate ids are legal and simply coexist.
    pub async fn append(&self, record: LogRecord) {
        let mut inner = self.inner.write().await;
        inner.entries.push(record);
        inner.entries.sort_by_key(|r| r.id);
    }

    /// Snapshot of all contents in id order
    pub async fn snapshot(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner.entries.iter().map(|r| r.content.clone()).collect()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Whether the log is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a snapshot as the GET response body: `"[c1, c2, ...]\n"`
pub fn render(snapshot: &[String]) -> String {
    let mut out = String::from("[");
    for (i, content) in snapshot.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(content);
    }
    out.push_str("]\n");
    out
}
