//! Title-index signal scalars and sparse buckets
//!
//! Keys follow a naming convention: `wiki_*_count` keys carry non-negative
//! integers that add under merge, every other `wiki_*` key is a boolean that
//! ORs under merge.

use crate::error::{ConceptError, ConceptResult};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static COUNT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^wiki_[A-Za-z0-9_]+_count$").unwrap());
static SIGNAL_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^wiki_[A-Za-z0-9_]+$").unwrap());

pub fn is_count_key(key: &str) -> bool {
    COUNT_KEY_RE.is_match(key)
}

pub fn is_signal_key(key: &str) -> bool {
    SIGNAL_KEY_RE.is_match(key)
}

/// One signal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Count(u64),
    Flag(bool),
}

impl SignalValue {
    /// Zero value for a key: `0` for counts, `false` otherwise
    pub fn zero_for(key: &str) -> Self {
        if is_count_key(key) {
            SignalValue::Count(0)
        } else {
            SignalValue::Flag(false)
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            SignalValue::Count(n) => Some(*n),
            SignalValue::Flag(_) => None,
        }
    }

    /// Combine two values of the same key: counts add, flags OR.
    pub fn merged(self, other: SignalValue) -> SignalValue {
        match (self, other) {
            (SignalValue::Count(a), SignalValue::Count(b)) => SignalValue::Count(a.saturating_add(b)),
            (a, b) => SignalValue::Flag(a.truthy() || b.truthy()),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            SignalValue::Count(n) => *n > 0,
            SignalValue::Flag(b) => *b,
        }
    }

    /// Strictly type a raw JSON scalar found under a signal key.
    ///
    /// Counts must be integral and non-negative; a whole-valued float is
    /// accepted because YAML `3.0` and `3` denote the same integer.
    pub fn from_json(key: &str, value: &Value, path: &str) -> ConceptResult<Self> {
        if is_count_key(key) {
            let count = match value {
                Value::Number(n) => n.as_u64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                        .map(|f| f as u64)
                }),
                _ => None,
            };
            return match count {
                Some(n) => Ok(SignalValue::Count(n)),
                None if value.as_i64().is_some_and(|n| n < 0) => Err(ConceptError::contract(format!(
                    "Negative {} at {}; non-negative integer required.",
                    key, path
                ))),
                None => Err(ConceptError::contract(format!(
                    "Non-integer {} at {}; integer required (no coercion).",
                    key, path
                ))),
            };
        }
        match value {
            Value::Bool(b) => Ok(SignalValue::Flag(*b)),
            _ => Err(ConceptError::contract(format!(
                "Invalid {} at {}; expected boolean for non-count wiki signal.",
                key, path
            ))),
        }
    }
}

/// Sparse, key-sorted signal map
pub type SignalBucket = BTreeMap<String, SignalValue>;

/// Merge one value into a bucket under its key.
pub fn merge_signal(bucket: &mut SignalBucket, key: &str, value: SignalValue) {
    match bucket.get_mut(key) {
        Some(existing) => *existing = existing.merged(value),
        None => {
            bucket.insert(key.to_string(), value);
        }
    }
}

/// Recursively visit every `wiki_*` key under `node`, typing its value.
///
/// A matching key's value is both reported and descended into, so a
/// malformed nested object under a signal key fails the typing check
/// rather than being skipped.
pub fn walk_signals<F>(node: &Value, path: &str, on_signal: &mut F) -> ConceptResult<()>
where
    F: FnMut(&str, SignalValue),
{
    match node {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk_signals(item, &format!("{}[{}]", path, i), on_signal)?;
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let next = format!("{}.{}", path, key);
                if is_signal_key(key) {
                    let typed = SignalValue::from_json(key, value, &next)?;
                    on_signal(key, typed);
                }
                walk_signals(value, &next, on_signal)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Signal keys only, sorted (non-signal keys dropped)
pub fn sparse_signals(bucket: Option<&SignalBucket>) -> SignalBucket {
    bucket
        .map(|b| {
            b.iter()
                .filter(|(k, _)| is_signal_key(k))
                .map(|(k, v)| (k.clone(), *v))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_patterns() {
        assert!(is_count_key("wiki_prefix_count"));
        assert!(!is_count_key("wiki_exact_match"));
        assert!(is_signal_key("wiki_exact_match"));
        assert!(!is_signal_key("wikipedia_count"));
        assert!(!is_signal_key("wiki_"));
    }

    #[test]
    fn merge_adds_counts_and_ors_flags() {
        let mut bucket = SignalBucket::new();
        merge_signal(&mut bucket, "wiki_prefix_count", SignalValue::Count(2));
        merge_signal(&mut bucket, "wiki_prefix_count", SignalValue::Count(3));
        merge_signal(&mut bucket, "wiki_exact_match", SignalValue::Flag(false));
        merge_signal(&mut bucket, "wiki_exact_match", SignalValue::Flag(true));
        merge_signal(&mut bucket, "wiki_exact_match", SignalValue::Flag(false));
        assert_eq!(bucket["wiki_prefix_count"], SignalValue::Count(5));
        assert_eq!(bucket["wiki_exact_match"], SignalValue::Flag(true));
    }

    #[test]
    fn walk_collects_nested_signals_with_paths() {
        let node = json!({
            "tokens": [
                { "evidence": { "wiki_prefix_count": 3, "wiki_exact_match": true } },
                { "evidence": { "wiki_prefix_count": 1, "other": "ignored" } },
            ]
        });
        let mut bucket = SignalBucket::new();
        walk_signals(&node, "root", &mut |k, v| merge_signal(&mut bucket, k, v)).unwrap();
        assert_eq!(bucket["wiki_prefix_count"], SignalValue::Count(4));
        assert_eq!(bucket["wiki_exact_match"], SignalValue::Flag(true));
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn string_count_is_rejected_with_path() {
        let node = json!({ "tokens": [{ "evidence": { "wiki_prefix_count": "3" } }] });
        let err = walk_signals(&node, "root", &mut |_, _| {}).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Non-integer wiki_prefix_count at root.tokens[0].evidence.wiki_prefix_count; integer required (no coercion)."
        );
    }

    #[test]
    fn fractional_and_negative_counts_are_rejected() {
        assert!(SignalValue::from_json("wiki_prefix_count", &json!(1.5), "p").is_err());
        let err = SignalValue::from_json("wiki_prefix_count", &json!(-1), "p").unwrap_err();
        assert!(err.to_string().starts_with("Negative wiki_prefix_count"));
        assert_eq!(
            SignalValue::from_json("wiki_prefix_count", &json!(4.0), "p").unwrap(),
            SignalValue::Count(4)
        );
    }

    #[test]
    fn non_boolean_flag_is_rejected() {
        let err = SignalValue::from_json("wiki_exact_match", &json!(1), "p").unwrap_err();
        assert!(err.to_string().contains("expected boolean"));
    }

    #[test]
    fn untagged_serialization_is_plain_scalar() {
        let mut bucket = SignalBucket::new();
        bucket.insert("wiki_b_count".into(), SignalValue::Count(2));
        bucket.insert("wiki_a".into(), SignalValue::Flag(true));
        assert_eq!(
            serde_json::to_string(&bucket).unwrap(),
            r#"{"wiki_a":true,"wiki_b_count":2}"#
        );
    }
}
