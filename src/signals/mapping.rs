//! Per-mention evidence maps built once per document
//!
//! Two independent sources feed a mention's bucket: assertion-carried
//! `evidence.wiki_signals.mention_evidence[]` and the upstream lexicon's
//! `provenance.lexicon_evidence`. The evidence policy picks between them.

use super::bucket::{is_count_key, merge_signal, walk_signals, SignalBucket};
use crate::config::EvidencePolicy;
use crate::error::{ConceptError, ConceptResult};
use crate::step12::Step12Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Which sources held evidence for a mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    AssertionAndLexicon,
    Assertion,
    LexiconFallback,
    None,
}

/// Signal keys and per-mention buckets for one document
#[derive(Debug, Clone, Default)]
pub struct EvidenceMaps {
    signal_keys: Vec<String>,
    count_keys: Vec<String>,
    assertion: HashMap<String, SignalBucket>,
    lexicon: HashMap<String, SignalBucket>,
}

fn mention_evidence(evidence: Option<&Value>) -> &[Value] {
    evidence
        .and_then(|e| e.get("wiki_signals"))
        .and_then(|w| w.get("mention_evidence"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn entry_path(ai: usize, mi: usize) -> String {
    format!(
        "assertions[{}].evidence.wiki_signals.mention_evidence[{}].evidence",
        ai, mi
    )
}

impl EvidenceMaps {
    /// Walk the document's evidence. Fails on mistyped signals or when no
    /// `wiki_*` key exists anywhere.
    pub fn build(doc: &Step12Document) -> ConceptResult<Self> {
        let signal_keys = collect_signal_keys(doc)?;
        let count_keys = signal_keys.iter().filter(|k| is_count_key(k)).cloned().collect();
        Ok(Self {
            signal_keys,
            count_keys,
            assertion: build_assertion_map(doc)?,
            lexicon: build_lexicon_map(doc)?,
        })
    }

    /// Union of signal keys, sorted
    pub fn signal_keys(&self) -> &[String] {
        &self.signal_keys
    }

    pub fn count_keys(&self) -> &[String] {
        &self.count_keys
    }

    pub fn assertion_bucket(&self, mention_id: &str) -> Option<&SignalBucket> {
        self.assertion.get(mention_id)
    }

    pub fn lexicon_bucket(&self, mention_id: &str) -> Option<&SignalBucket> {
        self.lexicon.get(mention_id)
    }

    /// Bucket chosen by policy. A present assertion bucket wins even when it
    /// holds no signals.
    pub fn select(&self, mention_id: &str, policy: EvidencePolicy) -> Option<&SignalBucket> {
        let assertion = self.assertion_bucket(mention_id);
        match policy {
            EvidencePolicy::AssertionOnly => assertion,
            EvidencePolicy::AssertionThenLexiconFallback => {
                assertion.or_else(|| self.lexicon_bucket(mention_id))
            }
        }
    }

    /// Sum of union count keys in the selected bucket
    pub fn count_total(&self, mention_id: &str, policy: EvidencePolicy) -> u64 {
        let Some(bucket) = self.select(mention_id, policy) else {
            return 0;
        };
        self.count_keys
            .iter()
            .filter_map(|k| bucket.get(k).and_then(|v| v.as_count()))
            .fold(0u64, u64::saturating_add)
    }

    pub fn contribution_source(&self, mention_id: &str) -> ContributionSource {
        match (self.assertion_bucket(mention_id), self.lexicon_bucket(mention_id)) {
            (Some(_), Some(_)) => ContributionSource::AssertionAndLexicon,
            (Some(_), None) => ContributionSource::Assertion,
            (None, Some(_)) => ContributionSource::LexiconFallback,
            (None, None) => ContributionSource::None,
        }
    }
}

fn collect_signal_keys(doc: &Step12Document) -> ConceptResult<Vec<String>> {
    let mut keys = BTreeSet::new();
    for (ai, assertion) in doc.assertions().iter().enumerate() {
        for (mi, entry) in mention_evidence(assertion.evidence.as_ref()).iter().enumerate() {
            if let Some(evidence) = entry.get("evidence") {
                walk_signals(evidence, &entry_path(ai, mi), &mut |k, _| {
                    keys.insert(k.to_string());
                })?;
            }
        }
    }
    if let Some(global) = doc.wiki_title_evidence.as_ref() {
        walk_signals(global, "wiki_title_evidence", &mut |k, _| {
            keys.insert(k.to_string());
        })?;
    }
    if keys.is_empty() {
        return Err(ConceptError::contract(
            "Wikipedia title index signal union is empty; at least one upstream wiki_* key is required.",
        ));
    }
    Ok(keys.into_iter().collect())
}

fn build_assertion_map(doc: &Step12Document) -> ConceptResult<HashMap<String, SignalBucket>> {
    let mut map: HashMap<String, SignalBucket> = HashMap::new();
    for (ai, assertion) in doc.assertions().iter().enumerate() {
        for (mi, entry) in mention_evidence(assertion.evidence.as_ref()).iter().enumerate() {
            let mention_id = entry.get("mention_id").and_then(Value::as_str).unwrap_or("");
            if mention_id.is_empty() {
                continue;
            }
            let bucket = map.entry(mention_id.to_string()).or_default();
            if let Some(evidence) = entry.get("evidence") {
                walk_signals(evidence, &entry_path(ai, mi), &mut |k, v| merge_signal(bucket, k, v))?;
            }
        }
    }
    Ok(map)
}

fn build_lexicon_map(doc: &Step12Document) -> ConceptResult<HashMap<String, SignalBucket>> {
    let mut map = HashMap::new();
    for (mi, mention) in doc.mentions().iter().enumerate() {
        if mention.id.is_empty() {
            continue;
        }
        let evidence = mention
            .provenance
            .as_ref()
            .and_then(|p| p.lexicon_evidence.as_ref())
            .filter(|v| !v.is_null());
        let Some(evidence) = evidence else {
            continue;
        };
        let mut bucket = SignalBucket::new();
        let path = format!("mentions[{}].provenance.lexicon_evidence", mi);
        walk_signals(evidence, &path, &mut |k, v| merge_signal(&mut bucket, k, v))?;
        if !bucket.is_empty() {
            map.insert(mention.id.clone(), bucket);
        }
    }
    Ok(map)
}
