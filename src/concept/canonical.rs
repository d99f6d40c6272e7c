//! Canonical keys and concept ids
//!
//! A canonical key is the lowercase, underscore-joined ASCII alphanumeric
//! skeleton of a surface. The concept id is a truncated SHA-256 of that key,
//! stable across runs and platforms.

use crate::error::{ConceptError, ConceptResult};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

/// Prefix of every concept id
pub const CONCEPT_ID_PREFIX: &str = "cc_";

/// Hex chars of the digest kept in a concept id
const CONCEPT_ID_HEX_LEN: usize = 16;

const LEADING_DETERMINERS: [&str; 3] = ["a", "an", "the"];

/// Case-fold with the special cases plain lowercasing misses.
fn fold_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        match ch {
            'ß' | 'ẞ' => out.push_str("ss"),
            'ς' => out.push('σ'),
            other => out.push(other),
        }
    }
    out
}

/// Canonicalize a surface into its lexical key.
///
/// NFKC, case-fold, every char outside `[A-Za-z0-9]` becomes a separator,
/// runs of separators collapse, words join with `_`. An empty result is an
/// error.
pub fn canonicalize_surface(text: &str) -> ConceptResult<String> {
    let folded = fold_case(&text.nfkc().collect::<String>());
    let spaced: String = folded
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let key = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    if key.is_empty() {
        return Err(ConceptError::EmptyCanonicalKey {
            surface: text.to_string(),
        });
    }
    Ok(key)
}

/// Stable concept id: `cc_` + first 16 hex chars of SHA-256(canonical)
pub fn concept_id_from_canonical(canonical: &str) -> String {
    let digest = Sha256::digest(canonical.as_bytes());
    let hex = hex::encode(digest);
    format!("{}{}", CONCEPT_ID_PREFIX, &hex[..CONCEPT_ID_HEX_LEN])
}

/// Collapse whitespace, then drop leading articles and leading pure-digit
/// tokens.
pub fn normalize_lifted_surface(text: &str) -> String {
    let mut words: &[&str] = &text.split_whitespace().collect::<Vec<_>>();
    while let Some((first, rest)) = words.split_first() {
        let lower = first.to_lowercase();
        if LEADING_DETERMINERS.contains(&lower.as_str()) {
            words = rest;
        } else {
            break;
        }
    }
    while let Some((first, rest)) = words.split_first() {
        if first.chars().all(|c| c.is_ascii_digit()) {
            words = rest;
        } else {
            break;
        }
    }
    words.join(" ")
}

/// Underscore-separated parts of a canonical, empty parts dropped
pub fn canonical_parts(canonical: &str) -> Vec<&str> {
    canonical.split('_').filter(|p| !p.is_empty()).collect()
}
