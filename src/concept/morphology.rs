//! Tag classes and suffix-rule singularization

use super::canonical::canonical_parts;

/// Fine-grained tags that may head or extend a nominal span
const NOMINAL_TAGS: [&str; 10] = [
    "NN", "NNS", "NNP", "NNPS", "JJ", "JJR", "JJS", "CD", "VBN", "VBG",
];

const ARTICLES: [&str; 3] = ["a", "an", "the"];

pub fn is_nominal_tag(tag: &str) -> bool {
    NOMINAL_TAGS.contains(&tag)
}

/// Singularize one canonical part by suffix rules.
///
/// Parts of three chars or fewer are left alone, as are inherently singular
/// `-ss`, `-us`, `-is` and `-ics` endings.
pub fn singularize_token_part(part: &str) -> String {
    let len = part.chars().count();
    if len <= 3 {
        return part.to_string();
    }
    let lower = part.to_ascii_lowercase();
    if lower.ends_with("ies") && len > 4 {
        return format!("{}y", &part[..part.len() - 3]);
    }
    if ["ches", "shes", "xes", "zes"].iter().any(|s| lower.ends_with(s)) {
        return part[..part.len() - 2].to_string();
    }
    if lower.ends_with("sses") {
        return part[..part.len() - 2].to_string();
    }
    if ["ss", "us", "is", "ics"].iter().any(|s| lower.ends_with(s)) {
        return part.to_string();
    }
    if lower.ends_with('s') {
        return part[..part.len() - 1].to_string();
    }
    part.to_string()
}

/// Singularize every part of a canonical key.
pub fn singularize_canonical(canonical: &str) -> String {
    canonical_parts(canonical)
        .into_iter()
        .map(singularize_token_part)
        .collect::<Vec<_>>()
        .join("_")
}

/// Aliases must not begin with an article.
pub fn should_reject_alias_canonical(canonical: &str) -> bool {
    if canonical.is_empty() {
        return true;
    }
    if ["a_", "an_", "the_"].iter().any(|p| canonical.starts_with(p)) {
        return true;
    }
    let parts = canonical_parts(canonical);
    parts.len() == 2 && ARTICLES.contains(&parts[0])
}
