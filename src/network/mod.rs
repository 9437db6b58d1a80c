//! Network Module
//!
//! Outbound transport used by the primary to reach secondaries. The
//! replication core only needs "send text to endpoint, get text reply";
//! the trait keeps it swappable for an in-process mock in tests.

mod client;

pub use client::HttpReplicaClient;

use crate::error::Result;

/// Send-and-wait-for-reply capability toward one replica.
///
/// Any failure (connect error, timeout, non-text reply) surfaces as `Err`;
/// the fan-out classifies it the same as an ack mismatch. No retry contract.
#[async_trait::async_trait]
pub trait ReplicaTransport: Send + Sync {
    /// Post `body` to `endpoint` and return the reply text
    async fn send(&self, endpoint: &str, body: String) -> Result<String>;
}
