//! HTTP delivery for votes.
//!
//! Votes go to the public endpoint; a 403 with a remembered admin key gets
//! exactly one retry against the privileged endpoint with the key attached.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use vote_relay::{TransportError, VoteRecord, VoteTransport};

/// Vote endpoint timeout.
const VOTE_TIMEOUT: Duration = Duration::from_secs(12);

pub struct HttpVoteTransport {
    base_url: String,
    client: reqwest::Client,
    admin_key: Arc<RwLock<Option<String>>>,
}

impl HttpVoteTransport {
    pub fn new(base_url: &str, admin_key: Arc<RwLock<Option<String>>>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            admin_key,
        }
    }

    async fn post(
        &self,
        url: &str,
        record: &VoteRecord,
        admin_key: Option<&str>,
    ) -> Result<u16, TransportError> {
        let mut request = self
            .client
            .post(url)
            .timeout(VOTE_TIMEOUT)
            .json(&json!({
                "id": record.id,
                "vote": record.vote.as_str(),
                "ts": record.ts,
            }));
        if let Some(key) = admin_key {
            request = request.header("x-admin-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl VoteTransport for HttpVoteTransport {
    async fn send(&self, record: &VoteRecord) -> Result<(), TransportError> {
        let public_url = format!("{}/api/thumb/public", self.base_url);
        let status = self.post(&public_url, record, None).await?;
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 403 means the endpoint wants the admin credential; retry once
        // against the privileged endpoint if we remember one.
        if status == 403 {
            let key = self.admin_key.read().await.clone();
            if let Some(key) = key {
                debug!(id = %record.id, "public vote refused, retrying privileged");
                let privileged_url = format!("{}/api/thumb", self.base_url);
                let status = self.post(&privileged_url, record, Some(&key)).await?;
                if (200..300).contains(&status) {
                    return Ok(());
                }
                return Err(TransportError::Status(status));
            }
        }

        Err(TransportError::Status(status))
    }
}
