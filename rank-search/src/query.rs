//! Search query string construction.
//!
//! Turns [`SearchCriteria`] into GitHub's user-search syntax, e.g.
//! `type:user followers:>=10 (location:"Nepal" OR location:"Kathmandu")`.

use crate::types::SearchCriteria;

/// Build the search query string for `criteria`.
///
/// Locations are quoted so multi-word places stay a single term. Several
/// locations are grouped in parentheses, since `OR` binds looser than the
/// implicit `AND` and would otherwise detach the other qualifiers. The
/// follower clause is omitted when `min_followers` is zero.
pub fn build_query(criteria: &SearchCriteria) -> String {
    let mut parts = vec!["type:user".to_owned()];

    if criteria.min_followers > 0 {
        parts.push(format!("followers:>={}", criteria.min_followers));
    }

    let include: Vec<String> = criteria
        .locations
        .iter()
        .map(|loc| format!("location:{}", quote(loc)))
        .collect();
    match include.len() {
        0 => {}
        1 => parts.extend(include),
        _ => parts.push(format!("({})", include.join(" OR "))),
    }

    for loc in &criteria.exclude_locations {
        parts.push(format!("-location:{}", quote(loc)));
    }

    parts.join(" ")
}

fn quote(term: &str) -> String {
    format!("\"{}\"", term.trim().replace('"', ""))
}
