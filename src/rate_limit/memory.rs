use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::time::interval;
use tracing::debug;

use super::{AdmissionStore, RateLimitPolicy};
use crate::clock::Clock;
use crate::metrics::RATE_LIMIT_KEYS;

// Client ids come straight from proxy headers, so store a fixed-size digest
type ClientKey = [u8; 32];

fn client_key(client_id: &str) -> ClientKey {
    let mut key = [0u8; 32];
    key.copy_from_slice(&Sha256::digest(client_id.as_bytes()));
    key
}

// Drop timestamps that have left the window. Timestamps are appended in
// arrival order, so expired ones are always at the front.
fn prune(attempts: &mut VecDeque<i64>, now_ms: i64, window_ms: i64) {
    while let Some(&oldest) = attempts.front() {
        if now_ms - oldest < window_ms {
            break;
        }
        attempts.pop_front();
    }
}

// At most `max_attempts` timestamps per client; the entry guard holds the shard lock
// across prune, check and append
pub struct MemoryStore {
    attempts: DashMap<ClientKey, VecDeque<i64>>,
    policy: RateLimitPolicy,
}

impl MemoryStore {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            attempts: DashMap::new(),
            policy,
        }
    }

    pub fn check(&self, client_id: &str, now_ms: i64) -> bool {
        let max = self.policy.max_attempts;
        let mut entry = self
            .attempts
            .entry(client_key(client_id))
            .or_insert_with(|| VecDeque::with_capacity(max));

        prune(&mut entry, now_ms, self.policy.window_ms);

        if entry.len() >= max {
            return false;
        }

        entry.push_back(now_ms);
        true
    }

    // drops clients with nothing left in the window, returns the eviction count
    pub fn sweep(&self, now_ms: i64) -> usize {
        let before = self.attempts.len();
        let window_ms = self.policy.window_ms;
        self.attempts.retain(|_, attempts| {
            prune(attempts, now_ms, window_ms);
            !attempts.is_empty()
        });
        before.saturating_sub(self.attempts.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }

    #[cfg(test)]
    fn recorded(&self, client_id: &str) -> usize {
        self.attempts
            .get(&client_key(client_id))
            .map(|attempts| attempts.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl AdmissionStore for MemoryStore {
    async fn check_and_record(&self, key: &str, now_ms: i64) -> bool {
        self.check(key, now_ms)
    }
}

// Periodic eviction so the table tracks only recently active clients
pub async fn sweeper(store: Arc<MemoryStore>, clock: Arc<dyn Clock>, period: Duration) {
    let mut ticker = interval(period);
    debug!("Rate limit sweeper started (interval: {:?})", period);

    loop {
        ticker.tick().await;
        let evicted = store.sweep(clock.now_ms());
        let tracked = store.tracked_clients();
        RATE_LIMIT_KEYS.set(tracked as f64);
        if evicted > 0 {
            debug!(evicted, tracked, "Swept idle rate limit keys");
        }
    }
}
