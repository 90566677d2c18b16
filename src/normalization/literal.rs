//! Bracketed list literals as they appear in catalog exports.
//!
//! Tag columns (`genres`, `production_countries`) arrive as collection
//! literals like `['drama', 'comedy']` with either quote style. Parsing is
//! strict: anything that is not a well-formed literal is an error for the
//! caller to escalate, never silently skipped.

use std::collections::BTreeSet;

use itertools::Itertools;

/// Parse a list literal into a set of tags.
///
/// The empty string is accepted as the empty set because consolidated
/// output renders empty collections as empty cells, and re-ingesting our
/// own output must round-trip.
pub fn parse_tag_set(raw: &str) -> Result<BTreeSet<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(BTreeSet::new());
    }
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("not a list literal: {raw:?}"))?;

    let mut tags = BTreeSet::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let quote = match rest.chars().next() {
            Some(q @ ('\'' | '"')) => q,
            Some(other) => return Err(format!("expected quoted element, found {other:?}")),
            None => break,
        };
        let body = &rest[1..];
        let end = body
            .find(quote)
            .ok_or_else(|| format!("unterminated string in list literal: {raw:?}"))?;
        tags.insert(body[..end].to_string());

        rest = body[end + 1..].trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
            if rest.is_empty() {
                return Err(format!("trailing comma in list literal: {raw:?}"));
            }
        } else if !rest.is_empty() {
            return Err(format!("expected comma between elements: {raw:?}"));
        }
    }
    Ok(tags)
}

/// Render a tag set back into the export format. Empty sets become the
/// empty string, not `[]`, matching the consolidated table convention.
pub fn render_tag_set(tags: &BTreeSet<String>) -> String {
    if tags.is_empty() {
        return String::new();
    }
    format!("[{}]", tags.iter().map(|t| format!("'{t}'")).join(", "))
}
