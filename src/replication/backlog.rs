//! Pending Backlog
//!
//! After a write has responded to its client, its batch may still hold
//! attempts that have not settled. The backlog takes ownership of such
//! batches and discards each one once every attempt has settled, whatever
//! the outcomes were. Settled outcomes are not reported or retried.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::replication::ReplicationBatch;

/// Batches with attempts still in flight after their write responded
pub struct PendingBacklog {
    batches: Mutex<Vec<Arc<ReplicationBatch>>>,
}

impl PendingBacklog {
    /// Create an empty backlog
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Hand a batch over to the backlog
    pub async fn enqueue(&self, batch: Arc<ReplicationBatch>) {
        self.batches.lock().await.push(batch);
    }

    /// Discard every fully settled batch; returns how many were removed.
    ///
    /// Runs once per incoming write, after the write's own response is
    /// determined.
    pub async fn reap(&self) -> usize {
        let mut batches = self.batches.lock().await;
        let before = batches.len();
        batches.retain(|batch| !batch.is_settled());
        let removed = before - batches.len();

        if removed > 0 {
            tracing::debug!(removed, remaining = batches.len(), "Reaped settled replication batches");
        }

        removed
    }

    /// Number of batches still held
    pub async fn len(&self) -> usize {
        self.batches.lock().await.len()
    }

    /// Whether the backlog is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for PendingBacklog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::network::ReplicaTransport;
    use crate::replication::Replicator;
    use crate::store::LogRecord;
    use std::time::Duration;

    struct ScriptedTransport;

    #[async_trait::async_trait]
    impl ReplicaTransport for ScriptedTransport {
        async fn send(&self, endpoint: &str, body: String) -> Result<String> {
            match endpoint {
                "slow" => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                "reject" => Err(Error::Transport("connection refused".into())),
                _ => {
                    let (_, content) = crate::codec::decode(&body);
                    Ok(crate::ack::build_ack(content))
                }
            }
        }
    }

    async fn settled(batch: &ReplicationBatch) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !batch.is_settled() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("batch did not settle");
    }

    #[tokio::test]
    async fn test_reap_removes_settled_mixed_outcomes() {
        let replicator = Replicator::new(
            Arc::new(ScriptedTransport),
            vec!["ack".into(), "reject".into()],
        );
        let batch = replicator.launch(&LogRecord::new(0, "hello"));
        settled(&batch).await;

        let backlog = PendingBacklog::new();
        backlog.enqueue(batch).await;

        assert_eq!(backlog.reap().await, 1);
        assert!(backlog.is_empty().await);
    }

    #[tokio::test]
    async fn test_reap_retains_unsettled() {
        let replicator = Replicator::new(
            Arc::new(ScriptedTransport),
            vec!["ack".into(), "slow".into()],
        );
        let batch = replicator.launch(&LogRecord::new(0, "hello"));

        let backlog = PendingBacklog::new();
        backlog.enqueue(batch).await;

        assert_eq!(backlog.reap().await, 0);
        assert_eq!(backlog.len().await, 1);
    }
}
