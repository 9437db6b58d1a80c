//! Log Coordinator
//!
//! Orchestrates one write or read against the node's log. On the primary a
//! write runs: decode prefix, assign id, append locally, fan out, wait for
//! the write concern, hand the batch to the backlog, reap settled batches,
//! acknowledge. A secondary adopts the wire id, appends, and acknowledges
//! immediately. Malformed input never fails a write; every degradation is a
//! logged fallback to a default.

use std::sync::Arc;

use crate::ack;
use crate::codec;
use crate::config::{ChaosConfig, NodeRole, ReplogConfig};
use crate::error::Result;
use crate::network::ReplicaTransport;
use crate::replication::{await_quorum, PendingBacklog, Replicator};
use crate::store::{render, LogRecord, LogStore};

/// Per-node write/read orchestrator
pub struct LogCoordinator {
    store: Arc<LogStore>,
    replicator: Replicator,
    backlog: PendingBacklog,
    config: ReplogConfig,
}

impl LogCoordinator {
    /// Create a coordinator over the given transport.
    ///
    /// The node's role follows the config: an empty secondary list means
    /// this node never fans out.
    pub fn new(config: ReplogConfig, transport: Arc<dyn ReplicaTransport>) -> Self {
        let replicator = Replicator::new(transport, config.node.secondaries.clone());
        Self {
            store: Arc::new(LogStore::new()),
            replicator,
            backlog: PendingBacklog::new(),
            config,
        }
    }

    /// This node's role
    pub fn role(&self) -> NodeRole {
        self.config.role()
    }

    /// The node's log store
    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Batches still draining in the background
    pub async fn pending_batches(&self) -> usize {
        self.backlog.len().await
    }

    /// Handle a write request body; always returns the ack text for the
    /// appended content.
    ///
    /// The decoded leading number is the requested write concern on the
    /// primary and the assigned id on a secondary.
    pub async fn handle_post(&self, body: &str) -> Result<String> {
        let (leading, content) = codec::decode(body);

        let record = match self.role() {
            NodeRole::Primary => self.store.append_next(content).await,
            NodeRole::Secondary => {
                maybe_delay(&self.config.chaos).await;
                let record = LogRecord::new(leading, content);
                self.store.append(record.clone()).await;
                record
            }
        };

        tracing::info!(id = record.id, content = %record.content, "Message appended");

        if self.role() == NodeRole::Primary {
            let write_concern = self.resolve_write_concern(leading);
            tracing::info!(
                id = record.id,
                hash = ack::content_hash(&record.content),
                write_concern,
                "Replicating with write concern"
            );

            let batch = self.replicator.launch(&record);
            let quorum = await_quorum(
                &batch,
                write_concern,
                self.config.progress_interval(),
                self.config.quorum_timeout(),
            )
            .await;

            // Response is determined either way; leftover attempts drain in
            // the background rather than being abandoned
            self.backlog.enqueue(batch).await;
            quorum?;
        }

        let reaped = self.backlog.reap().await;
        let pending = self.backlog.len().await;
        tracing::debug!(reaped, pending, "Backlog swept");

        Ok(ack::build_ack(&record.content))
    }

    /// Handle a read request: the full log, id-ordered, rendered as a list
    pub async fn handle_get(&self) -> String {
        render(&self.store.snapshot().await)
    }

    /// Clamp a requested write concern to `[1, secondaries + 1]`.
    ///
    /// 0 means the request carried no write concern and defaults to 1 (the
    /// local append suffices). The upper bound counts the local write, so a
    /// cluster of N secondaries accepts at most W = N + 1.
    fn resolve_write_concern(&self, requested: u64) -> usize {
        let total = self.config.total_nodes();

        if requested < 1 {
            return 1;
        }
        if requested as usize > total {
            tracing::warn!(
                requested,
                clamped = total,
                "Write concern exceeds cluster size, clamping"
            );
            return total;
        }
        requested as usize
    }
}

/// Optional random delay on secondary appends, for observing quorum waits
/// under slow replicas. Off by default.
async fn maybe_delay(chaos: &ChaosConfig) {
    if !chaos.enabled {
        return;
    }

    let ms = {
        use rand::Rng;
        rand::thread_rng().gen_range(chaos.delay_min_ms..=chaos.delay_max_ms)
    };
    tracing::info!(delay_ms = ms, "Chaos delay before append");
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::error::Error;
    use crate::network::ReplicaTransport;
    use std::time::Duration;

    /// Transport that always acks
    struct AckingTransport;

    #[async_trait::async_trait]
    impl ReplicaTransport for AckingTransport {
        async fn send(&self, _endpoint: &str, body: String) -> Result<String> {
            let (_, content) = codec::decode(&body);
            Ok(ack::build_ack(content))
        }
    }

    /// Transport that never answers
    struct StalledTransport;

    #[async_trait::async_trait]
    impl ReplicaTransport for StalledTransport {
        async fn send(&self, _endpoint: &str, _body: String) -> Result<String> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn primary_config(secondaries: &[&str]) -> ReplogConfig {
        ReplogConfig {
            node: NodeConfig {
                listen_address: "127.0.0.1:0".into(),
                secondaries: secondaries.iter().map(|s| s.to_string()).collect(),
            },
            ..ReplogConfig::default()
        }
    }

    fn secondary_config() -> ReplogConfig {
        primary_config(&[])
    }

    #[tokio::test]
    async fn test_primary_assigns_sequential_ids() {
        let coordinator =
            LogCoordinator::new(primary_config(&["a", "b"]), Arc::new(AckingTransport));

        for content in ["one", "two", "three"] {
            let reply = coordinator.handle_post(content).await.unwrap();
            assert_eq!(reply, ack::build_ack(content));
        }

        assert_eq!(coordinator.handle_get().await, "[one, two, three]\n");
    }

    #[tokio::test]
    async fn test_primary_ignores_prefix_as_id() {
        let coordinator =
            LogCoordinator::new(primary_config(&["a"]), Arc::new(AckingTransport));

        // "[2]" is a write concern here, not an id; ids still run 0, 1
        coordinator.handle_post("[2]hello").await.unwrap();
        coordinator.handle_post("[2]world").await.unwrap();
        assert_eq!(coordinator.handle_get().await, "[hello, world]\n");
    }

    #[tokio::test]
    async fn test_secondary_adopts_wire_id() {
        let coordinator = LogCoordinator::new(secondary_config(), Arc::new(AckingTransport));

        coordinator.handle_post("[5]late").await.unwrap();
        coordinator.handle_post("[1]early").await.unwrap();

        assert_eq!(coordinator.handle_get().await, "[early, late]\n");
    }

    #[tokio::test]
    async fn test_secondary_without_prefix_defaults_to_id_zero() {
        let coordinator = LogCoordinator::new(secondary_config(), Arc::new(AckingTransport));

        coordinator.handle_post("bare").await.unwrap();
        assert_eq!(coordinator.handle_get().await, "[bare]\n");
    }

    #[tokio::test]
    async fn test_write_concern_clamp() {
        let coordinator =
            LogCoordinator::new(primary_config(&["a", "b", "c"]), Arc::new(AckingTransport));

        assert_eq!(coordinator.resolve_write_concern(0), 1);
        assert_eq!(coordinator.resolve_write_concern(2), 2);
        assert_eq!(coordinator.resolve_write_concern(4), 4);
        assert_eq!(coordinator.resolve_write_concern(9), 4);
    }

    #[tokio::test]
    async fn test_write_with_unreachable_quorum_times_out_when_bounded() {
        let mut config = primary_config(&["a", "b"]);
        config.replication.quorum_timeout_ms = 100;
        config.replication.progress_interval_ms = 20;

        let coordinator = LogCoordinator::new(config, Arc::new(StalledTransport));

        let result = coordinator.handle_post("[3]hello").await;
        assert!(matches!(result, Err(Error::QuorumTimeout { .. })));

        // The local append happened regardless
        assert_eq!(coordinator.handle_get().await, "[hello]\n");
    }

    #[tokio::test]
    async fn test_w1_write_responds_despite_stalled_secondaries() {
        let coordinator =
            LogCoordinator::new(primary_config(&["a", "b"]), Arc::new(StalledTransport));

        // Local write alone satisfies W=1; leftovers go to the backlog
        let reply = coordinator.handle_post("[1]hello").await.unwrap();
        assert_eq!(reply, ack::build_ack("hello"));
        assert_eq!(coordinator.pending_batches().await, 1);
    }

    #[tokio::test]
    async fn test_backlog_drains_once_attempts_settle() {
        let coordinator =
            LogCoordinator::new(primary_config(&["a", "b"]), Arc::new(AckingTransport));

        coordinator.handle_post("[1]first").await.unwrap();
        coordinator.handle_post("[3]second").await.unwrap();

        // Both batches settle shortly after their acks land
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                coordinator.backlog.reap().await;
                if coordinator.pending_batches().await == 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("backlog never drained");
    }

    #[tokio::test]
    async fn test_read_of_empty_log() {
        let coordinator = LogCoordinator::new(secondary_config(), Arc::new(AckingTransport));
        assert_eq!(coordinator.handle_get().await, "[]\n");
    }
}
