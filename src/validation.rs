use axum::http::HeaderMap;
use lazy_static::lazy_static;
use regex::Regex;

// Checked in order; the first non-empty value wins
pub const CLIENT_ID_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];
pub const UNKNOWN_CLIENT: &str = "unknown";

// Rate-limit key taken verbatim from proxy headers; not a verified address
pub fn client_id(headers: &HeaderMap) -> String {
    CLIENT_ID_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

lazy_static! {
    // U+FEFF is listed explicitly because regex `\s` does not cover it
    static ref EMAIL: Regex = Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").unwrap();
}

// Permissive shape check, not RFC 5322
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}
