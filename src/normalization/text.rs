//! Name and character normalization for the credits pipeline.
//!
//! Provider exports disagree on hyphenation, casing and accents for the
//! same person ("Beyoncé" vs "beyonce", "Jean-Luc" vs "Jean Luc"), so the
//! dedup key is built from a canonical form: hyphens removed, lowercased,
//! diacritics transliterated to ASCII.

use deunicode::deunicode;

/// Canonical comparison form for a name or character field.
pub fn normalize_name(raw: &str) -> String {
    let without_hyphens: String = raw.chars().filter(|c| *c != '-').collect();
    deunicode(&without_hyphens.to_lowercase())
}
