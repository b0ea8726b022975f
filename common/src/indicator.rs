//! # Indicator Normalization
//!
//! Feed payloads are noisy: mixed case, stray whitespace, comment lines,
//! the occasional garbage token. Everything entering the core goes through
//! [`normalize_line`] first, so snapshots only ever contain clean,
//! comparable indicator strings. Lines that survive are IPv4 literals or
//! domain-shaped names; anything else is dropped silently, since feeds are
//! best-effort input and never a reason to fail a run.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Normalizes a single raw feed line into an indicator.
///
/// Returns `None` for empty lines, `#`-prefixed comments, and tokens that
/// are neither an IPv4 literal nor domain-shaped. Indicators are trimmed
/// and lowercased.
pub fn normalize_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let token = trimmed.to_ascii_lowercase();
    if !is_valid_indicator(&token) {
        return None;
    }
    Some(token)
}

/// Normalizes a whole feed body into a deduplicated indicator set.
pub fn normalize_body(body: &str) -> BTreeSet<String> {
    body.lines().filter_map(normalize_line).collect()
}

fn is_valid_indicator(token: &str) -> bool {
    // Numeric-and-dots tokens must be real IPv4 literals; "300.1.2.3" is
    // not a domain.
    if token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return token.parse::<Ipv4Addr>().is_ok();
    }
    is_domain_shaped(token)
}

fn is_domain_shaped(token: &str) -> bool {
    token.contains('.')
        && !token.starts_with('.')
        && !token.ends_with('.')
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}
