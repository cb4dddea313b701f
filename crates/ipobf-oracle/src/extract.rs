use regex::Regex;
use std::sync::OnceLock;

fn ipv4_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("IPv4 literal pattern compiles")
    })
}

/// Returns the first dotted-quad shaped token in `text`.
///
/// Only the shape is checked. `999.1.1.1` is returned as-is.
pub fn extract_ipv4(text: &str) -> Option<String> {
    ipv4_literal().find(text).map(|m| m.as_str().to_string())
}
