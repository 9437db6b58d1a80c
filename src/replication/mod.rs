//! Replication Module
//!
//! Concurrent fan-out of log entries to secondaries, the event-driven
//! quorum wait, and the pending backlog that lets slow replications
//! settle after their originating write has already responded.

mod backlog;
mod fanout;
mod quorum;

pub use backlog::PendingBacklog;
pub use fanout::{AttemptOutcome, ReplicationAttempt, ReplicationBatch, Replicator};
pub use quorum::await_quorum;
