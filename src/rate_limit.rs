use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::clock::Clock;
use crate::config::{AdmissionStoreKind, Args};

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
pub const DEFAULT_WINDOW_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: usize,
    pub window_ms: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

// Prune, count and append must be atomic per key. Rejected attempts are not recorded.
#[async_trait]
pub trait AdmissionStore: Send + Sync {
    async fn check_and_record(&self, key: &str, now_ms: i64) -> bool;
}

// Pick the admission store named on the command line
pub async fn build(args: &Args, clock: Arc<dyn Clock>) -> anyhow::Result<Arc<dyn AdmissionStore>> {
    let policy = args.policy();
    info!(
        "Rate limit: {} signups per {} seconds ({:?} store)",
        policy.max_attempts, args.rate_window, args.admission_store
    );

    match args.admission_store {
        AdmissionStoreKind::Memory => {
            let store = Arc::new(MemoryStore::new(policy));
            tokio::spawn(memory::sweeper(store.clone(), clock, args.sweep_period()));
            Ok(store as Arc<dyn AdmissionStore>)
        }
        AdmissionStoreKind::Redis => {
            let store = RedisStore::connect(&args.redis_url, policy).await?;
            Ok(Arc::new(store))
        }
    }
}
