//! Campaign id extraction from free-text campaign labels
//!
//! Ad platform exports name campaigns like `"Holiday Promo (48213)"`. The
//! trailing parenthesized number is the id shared with the revenue feed.

use std::sync::OnceLock;

use regex::Regex;

fn campaign_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([0-9]+)\)").expect("invalid campaign id regex"))
}

/// Extract the campaign id from a label
///
/// Uses the rightmost `(digits)` group. A group whose digits overflow an
/// `i64` is skipped in favor of the next one to the left. Returns `None`
/// when the label carries no id; that is an expected outcome, not an error.
pub fn extract_campaign_id(label: &str) -> Option<i64> {
    let matches: Vec<_> = campaign_id_re().captures_iter(label).collect();

    matches
        .iter()
        .rev()
        .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok()))
}
