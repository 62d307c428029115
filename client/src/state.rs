//! Shared application state.
//!
//! All mutable client state lives in one explicit struct handed around by
//! clone, never in globals. Lists are swapped wholesale under the lock;
//! nothing assumes a snapshot stays valid across an await point.

use incident_normalizer::Incident;
use proximity_alerts::DismissalSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use vote_relay::VoteState;

use crate::storage::PersistedState;

/// Feed data plus the liveness flag.
#[derive(Debug, Default)]
pub struct FeedState {
    /// Normalized, recency-filtered news incidents, newest first.
    pub incidents: Vec<Incident>,
    /// Normalized incidents from the proximity endpoint.
    pub proximity: Vec<Incident>,
    /// Cleared on any fetch failure; refresh loops pause while false.
    pub live: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<RwLock<FeedState>>,
    pub votes: Arc<RwLock<VoteState>>,
    pub dismissed: Arc<RwLock<DismissalSet>>,
    pub admin_key: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            feed: Arc::new(RwLock::new(FeedState::default())),
            votes: Arc::new(RwLock::new(VoteState::from_parts(
                persisted.votes,
                persisted.queue,
            ))),
            dismissed: Arc::new(RwLock::new(DismissalSet::from_ids(persisted.dismissed))),
            admin_key: Arc::new(RwLock::new(persisted.admin_key)),
        }
    }

    /// Snapshot the durable parts for the state file.
    pub async fn to_persisted(&self) -> PersistedState {
        let votes = self.votes.read().await;
        let dismissed = self.dismissed.read().await;
        let admin_key = self.admin_key.read().await;
        PersistedState {
            votes: votes.votes().clone(),
            queue: votes.pending(),
            dismissed: dismissed.ids().to_vec(),
            admin_key: admin_key.clone(),
        }
    }

    /// Incident list the proximity engine evaluates: the dedicated proximity
    /// feed when present, the news feed otherwise.
    pub async fn incidents_for_alerting(&self) -> Vec<Incident> {
        let feed = self.feed.read().await;
        if feed.proximity.is_empty() {
            feed.incidents.clone()
        } else {
            feed.proximity.clone()
        }
    }
}
