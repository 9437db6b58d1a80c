//! HTTP Replica Client
//!
//! Outbound HTTP transport for replication traffic.

use std::time::Duration;

use crate::error::Result;
use crate::network::ReplicaTransport;

/// HTTP client for posting replication messages to secondaries
pub struct HttpReplicaClient {
    client: reqwest::Client,
}

impl HttpReplicaClient {
    /// Create a client with the given per-request timeout
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ReplicaTransport for HttpReplicaClient {
    async fn send(&self, endpoint: &str, body: String) -> Result<String> {
        let response = self.client.post(endpoint).body(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(%endpoint, %status, "Replica reply received");
        Ok(text)
    }
}
