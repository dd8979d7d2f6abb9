use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{info, warn};

use crate::metrics::AUDIT_DROPPED;

// One accepted beta signup
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditEvent {
    pub email: String,
    pub client_id: String,
    pub timestamp: DateTime<Utc>,
}

// At-most-once: a full or closed channel drops the event and bumps giftlist_audit_dropped_total
#[derive(Clone)]
pub struct AuditSink {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditSink {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn record(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                AUDIT_DROPPED.inc();
                warn!(client_id = %event.client_id, "Audit buffer full, dropping signup event");
            }
            Err(TrySendError::Closed(event)) => {
                AUDIT_DROPPED.inc();
                warn!(client_id = %event.client_id, "Audit worker gone, dropping signup event");
            }
        }
    }
}

// Background worker -> writes signup events to the log sink one by one
pub async fn audit_worker(mut rx: mpsc::Receiver<AuditEvent>) {
    info!("Audit worker started");

    while let Some(event) = rx.recv().await {
        info!(
            target: "audit",
            email = %event.email,
            client_id = %event.client_id,
            timestamp = %event.timestamp.to_rfc3339(),
            "New beta signup"
        );
    }

    info!("Audit worker stopped");
}
