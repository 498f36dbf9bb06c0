//! Wildcard matching for provider and source names.
//!
//! Supports `*` (any run of characters, including empty) and `?` (any
//! single character). Matching is case-insensitive, and a pattern with
//! no wildcard characters matches only its literal self. Pure functions
//! over strings; expansion over a set of identifiers is done by callers.

/// Whether the string contains wildcard characters.
pub fn is_pattern(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Match `candidate` against `pattern`, case-insensitively.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().flat_map(|c| c.to_lowercase()).collect();
    let candidate: Vec<char> = candidate.chars().flat_map(|c| c.to_lowercase()).collect();
    matches_at(&pattern, &candidate)
}

fn matches_at(pattern: &[char], candidate: &[char]) -> bool {
    match pattern.split_first() {
        None => candidate.is_empty(),
        Some((&'*', rest)) => (0..=candidate.len()).any(|skip| matches_at(rest, &candidate[skip..])),
        Some((&'?', rest)) => !candidate.is_empty() && matches_at(rest, &candidate[1..]),
        Some((ch, rest)) => candidate.first() == Some(ch) && matches_at(rest, &candidate[1..]),
    }
}
