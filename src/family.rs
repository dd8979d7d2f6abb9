use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref EDGE_DASH: Regex = Regex::new(r"^-|-$").unwrap();
}

// Share-link path segment: lower-case ASCII letters and digits joined by single dashes
pub fn generate_slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let dashed = NON_SLUG.replace_all(&lower, "-");
    EDGE_DASH.replace_all(&dashed, "").into_owned()
}
