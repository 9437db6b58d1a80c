//! Quorum Wait
//!
//! Blocks one write request until its batch has collected the required
//! acknowledgment count. The wait is event-driven on the batch's watch
//! channel and wakes as soon as the counter crosses the threshold; a
//! periodic progress line is emitted while waiting. Only the issuing
//! request blocks, never the node.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::{Error, Result};
use crate::replication::ReplicationBatch;

/// Wait until `batch.ack_count() >= write_concern`.
///
/// With `timeout: None` this preserves the reference behavior and waits
/// forever; a configured bound turns expiry into
/// [`Error::QuorumTimeout`]. Returns the ack count observed when the
/// quorum was satisfied.
pub async fn await_quorum(
    batch: &ReplicationBatch,
    write_concern: usize,
    progress_interval: Duration,
    timeout: Option<Duration>,
) -> Result<usize> {
    let deadline = timeout.map(|t| Instant::now() + t);

    let mut acks = batch.subscribe();
    let wait = acks.wait_for(|count| *count >= write_concern);
    tokio::pin!(wait);

    let mut ticker = interval_at(Instant::now() + progress_interval, progress_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            observed = &mut wait => {
                let count = *observed
                    .map_err(|_| Error::Replication("acknowledgment counter closed".into()))?;
                tracing::info!(acks = count, required = write_concern, "Write concern satisfied");
                return Ok(count);
            }
            _ = ticker.tick() => {
                tracing::info!(
                    acks = batch.ack_count(),
                    required = write_concern,
                    "Waiting for replication"
                );
            }
            // branch is disabled, and the future never polled, without a deadline
            _ = async { tokio::time::sleep_until(deadline.unwrap()).await }, if deadline.is_some() => {
                return Err(Error::QuorumTimeout {
                    reached: batch.ack_count(),
                    required: write_concern,
                });
            }
        }
    }
}
