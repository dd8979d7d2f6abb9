use std::sync::Arc;

use crate::audit::AuditSink;
use crate::backend::Backend;
use crate::clock::Clock;
use crate::rate_limit::AdmissionStore;

// app's shared state
pub struct AppState {
    pub limiter: Arc<dyn AdmissionStore>, // signup admission, keyed by client id
    pub clock: Arc<dyn Clock>,
    pub audit: AuditSink,
    pub backend: Arc<dyn Backend>,
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::AppState;
    use crate::audit::{AuditEvent, AuditSink};
    use crate::backend::MemoryBackend;
    use crate::clock::ManualClock;
    use crate::models::User;
    use crate::rate_limit::{MemoryStore, RateLimitPolicy};

    // 2025-06-15T12:00:00Z
    pub const START_MS: i64 = 1_749_988_800_000;
    pub const TOKEN: &str = "test-session-token";
    pub const USER_ID: &str = "user-1";

    pub struct Harness {
        pub state: Arc<AppState>,
        pub clock: Arc<ManualClock>,
        pub backend: Arc<MemoryBackend>,
        pub audit_rx: mpsc::Receiver<AuditEvent>,
    }

    pub fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(START_MS));
        let backend = Arc::new(MemoryBackend::new());
        backend.add_session(
            TOKEN,
            User {
                id: USER_ID.to_string(),
                email: Some("parent@example.com".to_string()),
            },
        );
        let (audit, audit_rx) = AuditSink::channel(64);

        let state = Arc::new(AppState {
            limiter: Arc::new(MemoryStore::new(RateLimitPolicy::default())),
            clock: clock.clone(),
            audit,
            backend: backend.clone(),
        });

        Harness {
            state,
            clock,
            backend,
            audit_rx,
        }
    }
}
