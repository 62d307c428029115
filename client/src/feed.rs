//! Feed ingestion over the worker API.
//!
//! Both endpoints are timeout-bounded and failure never propagates past this
//! boundary: a failed fetch clears the live flag and leaves the last
//! successfully-loaded lists in place.

use chrono::Utc;
use incident_normalizer::{filter_recent, normalize_all};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::state::AppState;

/// Incidents endpoint timeout.
pub const INCIDENTS_TIMEOUT: Duration = Duration::from_secs(15);
/// Proximity endpoint timeout.
pub const PROXIMITY_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(u16),
}

/// `GET /api/proximity` wraps its records in an object.
#[derive(Debug, Deserialize)]
struct ProximityPayload {
    #[serde(default)]
    incidents: Vec<Value>,
}

pub struct FeedClient {
    base_url: String,
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Raw incident payload from `GET /api/incidents`.
    pub async fn fetch_incidents(&self) -> Result<Vec<Value>, FeedError> {
        let url = format!("{}/api/incidents", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(INCIDENTS_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Raw incident payload from `GET /api/proximity`.
    pub async fn fetch_proximity(&self) -> Result<Vec<Value>, FeedError> {
        let url = format!("{}/api/proximity", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(PROXIMITY_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }
        let payload: ProximityPayload = response.json().await?;
        Ok(payload.incidents)
    }

    /// Fetch both feeds and swap them into state. Any failure marks the feed
    /// not-live and keeps the previous lists untouched; partial results are
    /// never written.
    pub async fn refresh(&self, state: &AppState) {
        let fetched = async {
            let incidents = self.fetch_incidents().await?;
            let proximity = self.fetch_proximity().await?;
            Ok::<_, FeedError>((incidents, proximity))
        }
        .await;

        match fetched {
            Ok((incidents_raw, proximity_raw)) => {
                let now = Utc::now();
                let incidents = filter_recent(normalize_all(incidents_raw), now);
                let proximity = filter_recent(normalize_all(proximity_raw), now);

                let mut feed = state.feed.write().await;
                info!(
                    incidents = incidents.len(),
                    proximity = proximity.len(),
                    "feed refreshed"
                );
                feed.incidents = incidents;
                feed.proximity = proximity;
                feed.live = true;
            }
            Err(err) => {
                warn!(%err, "feed refresh failed, keeping previous data");
                state.feed.write().await.live = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = FeedClient::new("https://feeds.example.test/");
        assert_eq!(client.base_url, "https://feeds.example.test");
    }

    #[test]
    fn test_proximity_payload_shape() {
        let payload: ProximityPayload =
            serde_json::from_str(r#"{"incidents": [{"title": "x"}]}"#).unwrap();
        assert_eq!(payload.incidents.len(), 1);

        // A bare object still deserializes to an empty list.
        let empty: ProximityPayload = serde_json::from_str("{}").unwrap();
        assert!(empty.incidents.is_empty());
    }
}
