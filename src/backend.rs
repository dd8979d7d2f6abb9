use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Args, BackendKind};
use crate::models::{FamilySettings, Holiday, Kid, NewFamily, NewKid, User};

pub mod memory;
pub mod supabase;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Service(String),
}

// Every call carries the caller's session token for the backend's row-level rules
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_user(&self, token: &str) -> Result<User, BackendError>;

    async fn find_family_by_slug(&self, token: &str, slug: &str) -> Result<Option<FamilySettings>, BackendError>;

    async fn find_family_by_user(&self, token: &str, user_id: &str) -> Result<Option<FamilySettings>, BackendError>;

    async fn insert_family(&self, token: &str, family: NewFamily) -> Result<FamilySettings, BackendError>;

    async fn insert_kid(&self, token: &str, kid: NewKid) -> Result<Kid, BackendError>;

    async fn insert_holidays(&self, token: &str, holidays: &[Holiday]) -> Result<(), BackendError>;

    async fn list_kids(&self, token: &str, user_id: &str) -> Result<Vec<Kid>, BackendError>;
}

pub fn build(args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    match args.backend {
        BackendKind::Memory => {
            let backend = MemoryBackend::new();
            if let Some(token) = &args.dev_token {
                backend.add_session(
                    token,
                    User {
                        id: "dev-user".to_string(),
                        email: Some("dev@localhost".to_string()),
                    },
                );
                info!("Memory backend accepts the configured dev token");
            }
            Ok(Arc::new(backend))
        }
        BackendKind::Supabase => {
            let url = args
                .supabase_url
                .as_deref()
                .context("--supabase-url is required for the supabase backend")?;
            let anon_key = args
                .supabase_anon_key
                .as_deref()
                .context("--supabase-anon-key is required for the supabase backend")?;
            info!("Using hosted backend at {}", url);
            Ok(Arc::new(SupabaseBackend::new(reqwest::Client::new(), url, anon_key)))
        }
    }
}
