use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::rate_limit::RateLimitPolicy;

// One day
const MAX_RATE_WINDOW_SECS: u64 = 86_400;

// Where signup attempts are counted
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionStoreKind {
    // Per-process map, lost on restart
    Memory,
    // Shared across replicas
    Redis,
}

// Where families, kids and sessions live
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Supabase,
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "giftlist-gateway")]
#[command(about = "Signup intake and family dashboard API for the gift-list app")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "GIFTLIST_PORT", default_value_t = 8080)]
    pub port: u16,

    // Max admitted signups per client per window
    #[arg(long, env = "GIFTLIST_RATE_LIMIT", default_value_t = 5)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(
        long,
        env = "GIFTLIST_RATE_WINDOW",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..=MAX_RATE_WINDOW_SECS)
    )]
    pub rate_window: u64,

    #[arg(long, env = "GIFTLIST_ADMISSION_STORE", value_enum, default_value_t = AdmissionStoreKind::Memory)]
    pub admission_store: AdmissionStoreKind,

    #[arg(long, env = "GIFTLIST_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    // Seconds between sweeps of idle rate-limit keys (memory store only)
    #[arg(long, env = "GIFTLIST_SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    // Pending audit events before new ones are dropped
    #[arg(long, env = "GIFTLIST_AUDIT_BUFFER", default_value_t = 1024)]
    pub audit_buffer: usize,

    #[arg(long, env = "GIFTLIST_BACKEND", value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: Option<String>,

    // Session token accepted by the memory backend, for local runs
    #[arg(long, env = "GIFTLIST_DEV_TOKEN")]
    pub dev_token: Option<String>,
}

impl Args {
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_attempts: self.rate_limit,
            window_ms: i64::try_from(Duration::from_secs(self.rate_window).as_millis()).unwrap_or(i64::MAX),
        }
    }

    // interval() panics on a zero period
    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn audit_capacity(&self) -> usize {
        self.audit_buffer.max(1)
    }
}
