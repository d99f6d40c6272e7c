//! Per-candidate metrics for the extended filter
//!
//! Computed once, after promotion and before any suppression, over every
//! candidate in the table. Suppression and containment read this snapshot
//! only; candidates removed along the way still serve as host metrics.

use crate::concept::{canonical_parts, is_nominal_tag, Candidate};
use crate::diagnostics::PolicyMetrics;
use crate::error::ConceptResult;
use crate::passes::GenerationState;
use regex_lite::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static PUNCTUATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9 ]").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CandidateMetrics {
    pub parts: usize,
    pub role_total: u64,
    pub core_role_total: u64,
    pub assertion_count: u64,
    pub mention_count: u64,
    pub avg_wikipedia_count: f64,
    pub non_nominal_share: f64,
    pub participial_fragment_share: f64,
    pub participial_chunk_reduction_share: f64,
    pub two_token_participial_share: f64,
    pub short_symbolic_share: f64,
    pub punctuated_share: f64,
}

impl CandidateMetrics {
    /// The subset recorded in the decision trace
    pub fn to_policy_metrics(&self) -> PolicyMetrics {
        PolicyMetrics::new(
            self.role_total,
            self.assertion_count,
            self.mention_count,
            self.avg_wikipedia_count,
            self.non_nominal_share,
        )
    }
}

/// Metrics by canonical plus the mention → canonicals map at snapshot time
#[derive(Debug, Default)]
pub struct MetricsSnapshot {
    pub metrics: BTreeMap<String, CandidateMetrics>,
    pub canonicals_by_mention: BTreeMap<String, BTreeSet<String>>,
}

impl MetricsSnapshot {
    pub fn get(&self, canonical: &str) -> Option<&CandidateMetrics> {
        self.metrics.get(canonical)
    }

    pub fn canonicals_for(&self, mention_id: &str) -> impl Iterator<Item = &str> {
        self.canonicals_by_mention
            .get(mention_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

#[derive(Default)]
struct Tally {
    wiki_total: u64,
    non_nominal: u64,
    participial_fragment: u64,
    chunk_reduction: u64,
    two_token: u64,
    short_symbolic: u64,
    punctuated: u64,
}

fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn measure(state: &mut GenerationState<'_>, candidate: &Candidate) -> ConceptResult<CandidateMetrics> {
    let index = state.index;
    let whitelist = state.verb_whitelist();
    let canonical = candidate.canonical.as_str();
    let short_symbolic_key = canonical.len() <= 3 && canonical.contains('_');
    let mut tally = Tally::default();

    for mention_id in &candidate.mention_ids {
        tally.wiki_total += state.evidence.count_total(mention_id, state.options.evidence_policy);
        let Some(mention) = index.mention(mention_id) else {
            tally.non_nominal += 1;
            continue;
        };
        let head = index.head_token(mention);
        let (tag, coarse) = head.map(|t| (t.tag(), t.coarse())).unwrap_or(("", ""));
        if !(is_nominal_tag(tag) || matches!(coarse, "NOUN" | "PROPN" | "ADJ")) {
            tally.non_nominal += 1;
        }

        let single = mention.token_count() == 1;
        let from_token_source = matches!(mention.source_kind(), "token_fallback" | "token_shadow");
        let participial = matches!(tag, "VBN" | "VBG" | "VBD");
        if single && participial && from_token_source {
            tally.participial_fragment += 1;
        }
        if single && from_token_source && short_symbolic_key {
            tally.short_symbolic += 1;
        }

        let info = state.lifts.get(mention_id, index, whitelist)?;
        let normalized_raw = info.map(|i| i.normalized_raw.as_str()).unwrap_or("");
        let lifted = info.map(|i| i.lifted.as_str()).unwrap_or("");
        let raw_parts = normalized_raw.split_whitespace().count();
        let lifted_words: Vec<&str> = lifted.split_whitespace().collect();

        if mention.is_phrase() && participial && raw_parts >= 2 && lifted_words.len() == 1 {
            tally.chunk_reduction += 1;
        }
        if lifted_words.len() == 2 {
            let ordered = index.ordered_tokens(mention);
            let first_lifted = lifted_words[0].to_lowercase();
            let lead = ordered
                .iter()
                .find(|t| t.lower() == first_lifted)
                .or_else(|| ordered.first());
            let gerund_lead = lead.is_some_and(|t| t.tag() == "VBG" && t.coarse() == "VERB");
            if gerund_lead || tag == "VBG" {
                tally.two_token += 1;
            }
        }
        if single && PUNCTUATED_RE.is_match(normalized_raw) {
            tally.punctuated += 1;
        }
    }

    let mentions = candidate.mention_ids.len() as u64;
    Ok(CandidateMetrics {
        parts: canonical_parts(canonical).len(),
        role_total: candidate.roles.total(),
        core_role_total: candidate.roles.core_total(),
        assertion_count: candidate.assertion_ids.len() as u64,
        mention_count: mentions,
        avg_wikipedia_count: share(tally.wiki_total, mentions),
        non_nominal_share: share(tally.non_nominal, mentions),
        participial_fragment_share: share(tally.participial_fragment, mentions),
        participial_chunk_reduction_share: share(tally.chunk_reduction, mentions),
        two_token_participial_share: share(tally.two_token, mentions),
        short_symbolic_share: share(tally.short_symbolic, mentions),
        punctuated_share: share(tally.punctuated, mentions),
    })
}

/// Snapshot metrics for every live candidate.
pub fn snapshot(state: &mut GenerationState<'_>) -> ConceptResult<MetricsSnapshot> {
    let candidates: Vec<Candidate> = state.table.iter().cloned().collect();
    let mut snapshot = MetricsSnapshot::default();
    for candidate in &candidates {
        for mention_id in &candidate.mention_ids {
            snapshot
                .canonicals_by_mention
                .entry(mention_id.clone())
                .or_default()
                .insert(candidate.canonical.clone());
        }
        let metrics = measure(state, candidate)?;
        snapshot.metrics.insert(candidate.canonical.clone(), metrics);
    }
    Ok(snapshot)
}
