use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref SIGNUP_REQUESTS: Counter =
        register_counter!("giftlist_signup_requests_total", "Total signup submissions").unwrap();
    pub static ref SIGNUPS_ACCEPTED: Counter =
        register_counter!("giftlist_signups_accepted_total", "Signups that passed validation").unwrap();
    pub static ref SIGNUPS_RATE_LIMITED: Counter =
        register_counter!("giftlist_signups_rate_limited_total", "Signups rejected by the rate limiter").unwrap();
    pub static ref SIGNUPS_INVALID: Counter =
        register_counter!("giftlist_signups_invalid_total", "Signups rejected for a missing or malformed email").unwrap();
    pub static ref AUDIT_DROPPED: Counter =
        register_counter!("giftlist_audit_dropped_total", "Signup audit events dropped").unwrap();
    pub static ref SIGNUP_LATENCY: Histogram = register_histogram!(
        "giftlist_signup_latency_seconds",
        "Signup handler latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_KEYS: Gauge =
        register_gauge!("giftlist_rate_limit_keys", "Client identifiers currently tracked by the rate limiter").unwrap();
}
