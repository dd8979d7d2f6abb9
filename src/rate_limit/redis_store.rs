use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisResult, Script};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use super::{AdmissionStore, RateLimitPolicy};

const KEY_PREFIX: &str = "giftlist:signup";

// KEYS[1] attempt set, ARGV: now_ms, window_ms, max_attempts, member
// Score is the attempt time; the whole check runs atomically on the server.
const SLIDING_WINDOW: &str = r#"
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', now - window)
if redis.call('ZCARD', KEYS[1]) >= tonumber(ARGV[3]) then
    return 0
end
redis.call('ZADD', KEYS[1], now, ARGV[4])
redis.call('PEXPIRE', KEYS[1], window)
return 1
"#;

// Fixed-length key no matter how large the forwarded header is
fn redis_key(client_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(client_id.as_bytes());
    format!("{}:{:x}", KEY_PREFIX, hasher.finalize())
}

/// Admission store shared by every replica pointed at the same Redis.
pub struct RedisStore {
    conn: ConnectionManager,
    script: Script,
    policy: RateLimitPolicy,
}

impl RedisStore {
    pub async fn connect(url: &str, policy: RateLimitPolicy) -> RedisResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Connected to Redis admission store at {}", url);

        Ok(Self {
            conn,
            script: Script::new(SLIDING_WINDOW),
            policy,
        })
    }

    async fn eval(&self, client_id: &str, now_ms: i64) -> RedisResult<i64> {
        let mut conn = self.conn.clone();
        let member = format!("{}-{}", now_ms, Uuid::new_v4());

        self.script
            .key(redis_key(client_id))
            .arg(now_ms)
            .arg(self.policy.window_ms)
            .arg(self.policy.max_attempts)
            .arg(member)
            .invoke_async(&mut conn)
            .await
    }
}

#[async_trait]
impl AdmissionStore for RedisStore {
    async fn check_and_record(&self, key: &str, now_ms: i64) -> bool {
        match self.eval(key, now_ms).await {
            Ok(admitted) => admitted == 1,
            Err(e) => {
                // fail open: an unreachable store must not block signups
                warn!(error = %e, "Redis admission check failed, admitting request");
                true
            }
        }
    }
}
