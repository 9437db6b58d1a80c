//! Replication Fan-Out
//!
//! Launches one independent task per secondary for a single write. Each
//! attempt settles exactly once, acknowledged or rejected, and is never
//! retried. Acknowledgments bump a watch channel so quorum waiters wake
//! without polling.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::ack;
use crate::codec;
use crate::network::ReplicaTransport;
use crate::store::LogRecord;

/// Outcome of a single replication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Not yet settled
    Pending,
    /// Secondary replied with a matching ack
    Acknowledged,
    /// Ack mismatch or transport failure
    Rejected,
}

const OUTCOME_PENDING: u8 = 0;
const OUTCOME_ACKNOWLEDGED: u8 = 1;
const OUTCOME_REJECTED: u8 = 2;

/// One in-flight replication of a message to one secondary
pub struct ReplicationAttempt {
    target: String,
    outcome: AtomicU8,
}

impl ReplicationAttempt {
    fn new(target: String) -> Self {
        Self {
            target,
            outcome: AtomicU8::new(OUTCOME_PENDING),
        }
    }

    /// Target endpoint of this attempt
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current outcome
    pub fn outcome(&self) -> AttemptOutcome {
        match self.outcome.load(Ordering::Acquire) {
            OUTCOME_ACKNOWLEDGED => AttemptOutcome::Acknowledged,
            OUTCOME_REJECTED => AttemptOutcome::Rejected,
            _ => AttemptOutcome::Pending,
        }
    }

    /// Whether the attempt has settled (either way)
    pub fn is_settled(&self) -> bool {
        self.outcome() != AttemptOutcome::Pending
    }

    /// Transition out of Pending exactly once
    fn settle(&self, acked: bool) {
        let next = if acked {
            OUTCOME_ACKNOWLEDGED
        } else {
            OUTCOME_REJECTED
        };
        let _ = self.outcome.compare_exchange(
            OUTCOME_PENDING,
            next,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// All attempts spawned for one write, plus the live ack counter.
///
/// The counter starts at 1: the local append counts toward the quorum
/// before any fan-out begins.
pub struct ReplicationBatch {
    attempts: Vec<Arc<ReplicationAttempt>>,
    acks: watch::Sender<usize>,
}

impl ReplicationBatch {
    fn new(targets: &[String]) -> Self {
        let attempts = targets
            .iter()
            .map(|t| Arc::new(ReplicationAttempt::new(t.clone())))
            .collect();
        let (acks, _) = watch::channel(1);
        Self { attempts, acks }
    }

    /// Current acknowledgment count (local write included)
    pub fn ack_count(&self) -> usize {
        *self.acks.borrow()
    }

    /// Subscribe to acknowledgment counter updates
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.acks.subscribe()
    }

    /// The per-target attempts of this batch
    pub fn attempts(&self) -> &[Arc<ReplicationAttempt>] {
        &self.attempts
    }

    /// Whether every attempt has settled, regardless of outcome
    pub fn is_settled(&self) -> bool {
        self.attempts.iter().all(|a| a.is_settled())
    }

    fn record_ack(&self) {
        self.acks.send_modify(|count| *count += 1);
    }
}

/// Fans a log record out to all configured secondaries
pub struct Replicator {
    transport: Arc<dyn ReplicaTransport>,
    targets: Vec<String>,
}

impl Replicator {
    /// Create a replicator over the given transport and targets
    pub fn new(transport: Arc<dyn ReplicaTransport>, targets: Vec<String>) -> Self {
        Self { transport, targets }
    }

    /// Configured secondary endpoints
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Launch one concurrent replication attempt per target.
    ///
    /// Returns immediately; attempts run to completion on their own and
    /// report through the batch. Attempts never block each other.
    pub fn launch(&self, record: &LogRecord) -> Arc<ReplicationBatch> {
        let batch = Arc::new(ReplicationBatch::new(&self.targets));

        for attempt in batch.attempts() {
            let attempt = Arc::clone(attempt);
            let batch = Arc::clone(&batch);
            let transport = Arc::clone(&self.transport);
            let body = codec::encode(record.id, &record.content);
            let content = record.content.clone();

            tokio::spawn(async move {
                tracing::debug!(endpoint = attempt.target(), body = %body, "Replicating to secondary");

                let acked = match transport.send(attempt.target(), body).await {
                    Ok(reply) => {
                        let ok = ack::verify_ack(&content, &reply);
                        if !ok {
                            tracing::warn!(
                                endpoint = attempt.target(),
                                reply = %reply,
                                "Secondary reply did not acknowledge message"
                            );
                        }
                        ok
                    }
                    Err(e) => {
                        tracing::warn!(endpoint = attempt.target(), error = %e, "Replication attempt failed");
                        false
                    }
                };

                if acked {
                    batch.record_ack();
                }
                attempt.settle(acked);
            });
        }

        batch
    }
}
