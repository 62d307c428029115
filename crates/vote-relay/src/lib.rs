//! Vote Relay Library
//!
//! Lightweight per-incident voting with offline tolerance. A vote is
//! recorded locally first (the local map is authoritative for the UI), then
//! sent; failed sends land in a durable queue that a periodic flush retries
//! until the server acknowledges. Delivery is at-least-once; the local map
//! dedups by last-value-wins.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("server returned status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// One pending delivery. Queue entries are matched for removal by the full
/// `(id, vote, ts)` tuple, never by index, so removal tolerates concurrent
/// enqueues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: String,
    pub vote: VoteValue,
    /// Epoch milliseconds at the moment the vote was cast.
    pub ts: i64,
}

/// Local vote state: the authoritative per-incident map plus the pending
/// delivery queue. Both persist across restarts through the host's store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteState {
    votes: HashMap<String, VoteValue>,
    queue: Vec<VoteRecord>,
}

impl VoteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(votes: HashMap<String, VoteValue>, queue: Vec<VoteRecord>) -> Self {
        Self { votes, queue }
    }

    /// Record a vote locally, latest wins. Returns the delivery record.
    pub fn record_local(&mut self, id: &str, value: VoteValue) -> VoteRecord {
        self.votes.insert(id.to_string(), value);
        VoteRecord {
            id: id.to_string(),
            vote: value,
            ts: Utc::now().timestamp_millis(),
        }
    }

    /// Queue a record for retry. A tuple already present is not duplicated.
    pub fn enqueue(&mut self, record: VoteRecord) {
        if !self.queue.contains(&record) {
            self.queue.push(record);
        }
    }

    /// Snapshot of the pending queue.
    pub fn pending(&self) -> Vec<VoteRecord> {
        self.queue.clone()
    }

    /// Remove one exact `(id, vote, ts)` tuple. Returns whether it was found.
    pub fn acknowledge(&mut self, record: &VoteRecord) -> bool {
        match self.queue.iter().position(|r| r == record) {
            Some(idx) => {
                self.queue.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn vote_for(&self, id: &str) -> Option<VoteValue> {
        self.votes.get(id).copied()
    }

    pub fn votes(&self) -> &HashMap<String, VoteValue> {
        &self.votes
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

/// Delivery seam. The HTTP implementation lives with the client; tests use
/// scripted mocks.
#[async_trait]
pub trait VoteTransport: Send + Sync {
    async fn send(&self, record: &VoteRecord) -> Result<(), TransportError>;
}

/// Outcome of a single vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered,
    Queued,
}

/// Record a vote and attempt immediate delivery; failures are queued. The
/// local map is updated before any network activity, so the UI state is
/// correct regardless of the outcome.
pub async fn submit(
    state: &RwLock<VoteState>,
    transport: &dyn VoteTransport,
    id: &str,
    value: VoteValue,
) -> SubmitOutcome {
    let record = state.write().await.record_local(id, value);

    match transport.send(&record).await {
        Ok(()) => {
            debug!(id, vote = value.as_str(), "vote delivered");
            SubmitOutcome::Delivered
        }
        Err(err) => {
            warn!(id, %err, "vote delivery failed, queueing");
            state.write().await.enqueue(record);
            SubmitOutcome::Queued
        }
    }
}

/// Flush statistics for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub attempted: usize,
    pub delivered: usize,
    pub remaining: usize,
}

/// Retry every queued entry once. Entries are sent from a snapshot while the
/// lock is released; each success removes exactly its own tuple, so a flush
/// racing new enqueues or a slow previous flush cannot corrupt the queue.
/// Safe to call on every timer tick.
pub async fn flush(state: &RwLock<VoteState>, transport: &dyn VoteTransport) -> FlushStats {
    let snapshot = state.read().await.pending();
    let mut stats = FlushStats {
        attempted: snapshot.len(),
        ..Default::default()
    };

    for record in &snapshot {
        match transport.send(record).await {
            Ok(()) => {
                if state.write().await.acknowledge(record) {
                    stats.delivered += 1;
                }
            }
            Err(err) => {
                debug!(id = %record.id, %err, "queued vote still undeliverable");
            }
        }
    }

    stats.remaining = state.read().await.queue_len();
    if stats.attempted > 0 {
        debug!(?stats, "vote queue flush complete");
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted transport: fails while `failures` is positive, then succeeds.
    struct FlakyTransport {
        failures: AtomicUsize,
        sent: Mutex<Vec<VoteRecord>>,
    }

    impl FlakyTransport {
        fn failing(times: usize) -> Self {
            Self {
                failures: AtomicUsize::new(times),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VoteTransport for FlakyTransport {
        async fn send(&self, record: &VoteRecord) -> Result<(), TransportError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(TransportError::Status(502));
            }
            self.sent.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_successful_vote_not_queued() {
        let state = RwLock::new(VoteState::new());
        let transport = FlakyTransport::failing(0);

        let outcome = submit(&state, &transport, "inc-1", VoteValue::Up).await;
        assert_eq!(outcome, SubmitOutcome::Delivered);

        let guard = state.read().await;
        assert_eq!(guard.vote_for("inc-1"), Some(VoteValue::Up));
        assert_eq!(guard.queue_len(), 0);
    }

    #[tokio::test]
    async fn test_failed_vote_recorded_locally_and_queued_once() {
        let state = RwLock::new(VoteState::new());
        let transport = FlakyTransport::failing(1);

        let outcome = submit(&state, &transport, "inc-2", VoteValue::Down).await;
        assert_eq!(outcome, SubmitOutcome::Queued);

        let guard = state.read().await;
        // Local map is authoritative immediately, delivery or not.
        assert_eq!(guard.vote_for("inc-2"), Some(VoteValue::Down));
        assert_eq!(guard.queue_len(), 1);
    }

    #[tokio::test]
    async fn test_flush_removes_delivered_entry_permanently() {
        let state = RwLock::new(VoteState::new());
        let transport = FlakyTransport::failing(1);

        submit(&state, &transport, "inc-3", VoteValue::Up).await;
        assert_eq!(state.read().await.queue_len(), 1);

        let stats = flush(&state, &transport).await;
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.remaining, 0);

        // A second flush has nothing to do; the entry does not reappear.
        let stats = flush(&state, &transport).await;
        assert_eq!(stats.attempted, 0);
        assert_eq!(state.read().await.queue_len(), 0);
    }

    #[tokio::test]
    async fn test_flush_keeps_undelivered_entries() {
        let state = RwLock::new(VoteState::new());
        let transport = FlakyTransport::failing(10);

        submit(&state, &transport, "inc-4", VoteValue::Up).await;
        let stats = flush(&state, &transport).await;
        assert_eq!(stats.delivered, 0);
        assert_eq!(stats.remaining, 1);
    }

    #[tokio::test]
    async fn test_latest_vote_wins_locally() {
        let state = RwLock::new(VoteState::new());
        let transport = FlakyTransport::failing(0);

        submit(&state, &transport, "inc-5", VoteValue::Up).await;
        submit(&state, &transport, "inc-5", VoteValue::Down).await;

        assert_eq!(state.read().await.vote_for("inc-5"), Some(VoteValue::Down));
    }

    #[tokio::test]
    async fn test_acknowledge_matches_exact_tuple() {
        let mut state = VoteState::new();
        let record = state.record_local("inc-6", VoteValue::Up);
        state.enqueue(record.clone());

        let different_ts = VoteRecord {
            ts: record.ts + 1,
            ..record.clone()
        };
        assert!(!state.acknowledge(&different_ts));
        assert_eq!(state.queue_len(), 1);

        assert!(state.acknowledge(&record));
        assert_eq!(state.queue_len(), 0);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = VoteState::new();
        let record = state.record_local("inc-7", VoteValue::Down);
        state.enqueue(record);

        let json = serde_json::to_string(&state).unwrap();
        let back: VoteState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vote_for("inc-7"), Some(VoteValue::Down));
        assert_eq!(back.pending(), state.pending());
    }
}
