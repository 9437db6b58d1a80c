//! Replog - Quorum-Replicated Append-Only Message Log
//!
//! A primary/secondary replicated append-only log with a tunable per-write
//! quorum ("write concern"). The primary node accepts client writes, assigns
//! each entry a monotonically increasing sequence id, stores it locally, and
//! fans the entry out concurrently to a configured set of secondary nodes.
//! The client response is held back until at least W replicas (the primary
//! itself included) have acknowledged; still-outstanding replication
//! attempts drain in a background backlog without blocking later writes.
//!
//! # Architecture
//!
//! One fixed primary and a static set of secondaries for the process
//! lifetime. A node configured with no secondary endpoints runs in
//! secondary mode: it adopts ids from the wire instead of assigning them
//! and never originates quorum waits.
//!
//! # Features
//!
//! - Monotonic id assignment with an id-sorted in-memory log per node
//! - Per-write write concern, clamped to the cluster size
//! - Concurrent fan-out with per-target success/failure tracking
//! - Event-driven quorum wait with periodic progress logging
//! - Pending backlog that lets slow replications finish in the background
//! - HTTP API for writes and log reads

pub mod ack;
pub mod api;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod network;
pub mod replication;
pub mod store;

pub use config::ReplogConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ReplogConfig;
    pub use crate::coordinator::LogCoordinator;
    pub use crate::error::{Error, Result};
    pub use crate::network::{HttpReplicaClient, ReplicaTransport};
    pub use crate::replication::{AttemptOutcome, PendingBacklog, ReplicationBatch, Replicator};
    pub use crate::store::{LogRecord, LogStore};
}
