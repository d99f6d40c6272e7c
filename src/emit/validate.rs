//! Structural validation of the emitted document
//!
//! Runs over the generic YAML value rather than the typed records, so a
//! persisted artifact read back from disk is checked the same way as a
//! freshly built one: key order, sort order, id integrity and value types.

use super::record::{CANDIDATE_KEYS, EVIDENCE_KEY, OUTPUT_STAGE, TOP_LEVEL_KEYS};
use crate::concept::{concept_id_from_canonical, RoleCounts};
use crate::error::{ConceptError, ConceptResult};
use crate::signals::{is_count_key, is_signal_key};
use serde_yaml::{Mapping, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

fn fail<T>(message: String) -> ConceptResult<T> {
    Err(ConceptError::determinism(message))
}

fn keys(map: &Mapping) -> Vec<&str> {
    map.keys().map(|k| k.as_str().unwrap_or("")).collect()
}

fn field<'v>(map: &'v Mapping, key: &str) -> Option<&'v Value> {
    map.get(key)
}

/// First ordering violation in a list that must be strictly ascending
enum OrderFault<'a> {
    Unsorted,
    Duplicate(&'a str),
}

fn order_fault<'a>(items: &[&'a str]) -> Option<OrderFault<'a>> {
    items.windows(2).find_map(|w| match w[0].cmp(w[1]) {
        Ordering::Less => None,
        Ordering::Equal => Some(OrderFault::Duplicate(w[1])),
        Ordering::Greater => Some(OrderFault::Unsorted),
    })
}

/// Non-negative integer, tolerating a whole-valued float
fn is_non_negative_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.as_u64().is_some() || n.as_f64().is_some_and(|f| f.is_finite() && f >= 0.0 && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Check a signal map: sorted keys, `wiki_*` names, typed values.
fn validate_signal_map(canonical: &str, field_name: &str, value: Option<&Value>) -> ConceptResult<()> {
    let Some(Value::Mapping(map)) = value else {
        return fail(format!("Candidate {} {} must be object.", canonical, field_name));
    };
    if order_fault(&keys(map)).is_some() {
        return fail(format!("Candidate {} {} keys must be sorted.", canonical, field_name));
    }
    for (key, value) in map {
        let key = key.as_str().unwrap_or("");
        if !is_signal_key(key) {
            return fail(format!("Candidate {} has invalid {} key: {}", canonical, field_name, key));
        }
        if is_count_key(key) {
            if !is_non_negative_integer(value) {
                return fail(format!(
                    "Candidate {} {}.{} must be non-negative integer.",
                    canonical, field_name, key
                ));
            }
        } else if !value.is_bool() {
            return fail(format!("Candidate {} {}.{} must be boolean.", canonical, field_name, key));
        }
    }
    Ok(())
}

fn validate_evidence(canonical: &str, value: Option<&Value>) -> ConceptResult<()> {
    let Some(Value::Mapping(evidence)) = value else {
        return fail(format!("Candidate {} {} must be object.", canonical, EVIDENCE_KEY));
    };
    let policy = field(evidence, "wikipedia_title_index_policy").and_then(Value::as_str);
    if !policy.is_some_and(|p| !p.is_empty()) {
        return fail(format!(
            "Candidate {} {}.wikipedia_title_index_policy must be non-empty string.",
            canonical, EVIDENCE_KEY
        ));
    }
    let Some(Value::Sequence(contributions)) = field(evidence, "mention_contributions") else {
        return fail(format!(
            "Candidate {} {}.mention_contributions must be array.",
            canonical, EVIDENCE_KEY
        ));
    };

    let mut previous: Option<&str> = None;
    for contribution in contributions {
        let Value::Mapping(contribution) = contribution else {
            return fail(format!("Candidate {} mention contribution must be object.", canonical));
        };
        let mention_id = match field(contribution, "mention_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id,
            _ => {
                return fail(format!(
                    "Candidate {} mention contribution mention_id invalid.",
                    canonical
                ))
            }
        };
        match previous.map(|p| p.cmp(mention_id)) {
            Some(Ordering::Greater) => {
                return fail(format!(
                    "Candidate {} {} mention_contributions must be sorted by mention_id.",
                    canonical, EVIDENCE_KEY
                ))
            }
            Some(Ordering::Equal) => {
                return fail(format!(
                    "Candidate {} {} has duplicate mention contribution: {}",
                    canonical, EVIDENCE_KEY, mention_id
                ))
            }
            _ => {}
        }
        previous = Some(mention_id);
        for name in ["assertion_signals", "lexicon_signals", "selected_signals"] {
            validate_signal_map(canonical, name, field(contribution, name))?;
        }
    }
    Ok(())
}

fn validate_candidate<'v>(
    index: usize,
    value: &'v Value,
    previous: Option<&str>,
    ids: &mut HashMap<String, String>,
) -> ConceptResult<&'v str> {
    let Value::Mapping(c) = value else {
        return fail(format!("Candidate {} key order mismatch.", index));
    };
    let has_evidence = field(c, EVIDENCE_KEY).is_some();
    let mut expected: Vec<&str> = CANDIDATE_KEYS.to_vec();
    if has_evidence {
        expected.push(EVIDENCE_KEY);
    }
    if keys(c) != expected {
        return fail(format!("Candidate {} key order mismatch.", index));
    }

    let canonical = match field(c, "canonical").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s,
        _ => return fail(format!("Candidate {} canonical missing.", index)),
    };
    match previous.map(|p| p.cmp(canonical)) {
        Some(Ordering::Greater) => {
            return fail(format!("Candidates not sorted by canonical at index {}.", index))
        }
        Some(Ordering::Equal) => {
            return fail(format!("Duplicate candidate {} at index {}.", canonical, index))
        }
        _ => {}
    }

    let concept_id = field(c, "concept_id").and_then(Value::as_str).unwrap_or("");
    if concept_id != concept_id_from_canonical(canonical) {
        return fail(format!(
            "Candidate {} concept_id mismatch for canonical {}.",
            index, canonical
        ));
    }
    if ids.get(concept_id).is_some_and(|existing| existing != canonical) {
        return fail(format!(
            "Collision in output: {} maps to multiple canonicals.",
            concept_id
        ));
    }
    ids.insert(concept_id.to_string(), canonical.to_string());

    for name in ["surfaces", "mention_ids", "assertion_ids"] {
        let Some(Value::Sequence(items)) = field(c, name) else {
            return fail(format!("Candidate {} {} must be array.", canonical, name));
        };
        let items: Vec<&str> = items.iter().map(|v| v.as_str().unwrap_or("")).collect();
        match order_fault(&items) {
            Some(OrderFault::Unsorted) => {
                return fail(format!("Candidate {} {} must be sorted.", canonical, name))
            }
            Some(OrderFault::Duplicate(item)) => {
                return fail(format!("Candidate {} {} has duplicate entry: {}", canonical, name, item))
            }
            None => {}
        }
    }

    let Some(Value::Mapping(roles)) = field(c, "roles") else {
        return fail(format!("Candidate {} roles must be object.", canonical));
    };
    if keys(roles) != RoleCounts::KEYS {
        return fail(format!("Candidate {} role keys mismatch.", canonical));
    }
    for key in RoleCounts::KEYS {
        if !field(roles, key).is_some_and(is_non_negative_integer) {
            return fail(format!(
                "Candidate {} roles.{} must be non-negative integer.",
                canonical, key
            ));
        }
    }

    validate_signal_map(canonical, "wikipedia_title_index", field(c, "wikipedia_title_index"))?;
    if has_evidence {
        validate_evidence(canonical, field(c, EVIDENCE_KEY))?;
    }
    Ok(canonical)
}

/// Validate an emitted concept candidates document.
pub fn validate_output(value: &Value) -> ConceptResult<()> {
    let Value::Mapping(top) = value else {
        return fail("Top-level key order mismatch.".to_string());
    };
    if keys(top) != TOP_LEVEL_KEYS {
        return fail("Top-level key order mismatch.".to_string());
    }
    if field(top, "stage").and_then(Value::as_str) != Some(OUTPUT_STAGE) {
        return fail(format!("Output stage must be {}.", OUTPUT_STAGE));
    }
    let Some(Value::Sequence(candidates)) = field(top, "concept_candidates") else {
        return fail("concept_candidates must be an array.".to_string());
    };

    let mut ids = HashMap::new();
    let mut previous: Option<&str> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        previous = Some(validate_candidate(i, candidate, previous, &mut ids)?);
    }
    Ok(())
}
