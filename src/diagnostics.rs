//! Decision trace, run statistics and the optional sidecars
//!
//! The trace records which pass produced or touched each canonical and which
//! extended-policy rule fired on it. It never feeds back into generation.

use crate::config::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Round to three decimals; non-finite values become 0.
pub fn round3(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 1000.0).round() / 1000.0
}

/// Metrics snapshot attached to a policy decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyMetrics {
    pub role_total: u64,
    pub assertion_count: u64,
    pub mention_count: u64,
    pub avg_wikipedia_count: f64,
    pub non_nominal_share: f64,
}

impl PolicyMetrics {
    pub fn new(role_total: u64, assertion_count: u64, mention_count: u64, avg: f64, non_nominal_share: f64) -> Self {
        Self {
            role_total,
            assertion_count,
            mention_count,
            avg_wikipedia_count: round3(avg),
            non_nominal_share: round3(non_nominal_share),
        }
    }
}

/// Policy hits for one canonical; metrics are those of the latest hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub policy_hits: BTreeSet<String>,
    pub metrics: PolicyMetrics,
}

/// Source tags and policy hits gathered while the passes run
#[derive(Debug, Clone, Default)]
pub struct DecisionTrace {
    sources: BTreeMap<String, BTreeSet<String>>,
    policy: BTreeMap<String, PolicyEntry>,
}

impl DecisionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_source(&mut self, canonical: &str, tag: &str) {
        self.sources
            .entry(canonical.to_string())
            .or_default()
            .insert(tag.to_string());
    }

    pub fn mark_policy(&mut self, canonical: &str, tag: &str, metrics: PolicyMetrics) {
        let entry = self.policy.entry(canonical.to_string()).or_default();
        entry.policy_hits.insert(tag.to_string());
        entry.metrics = metrics;
    }

    pub fn sources(&self, canonical: &str) -> Option<&BTreeSet<String>> {
        self.sources.get(canonical)
    }

    pub fn policy(&self, canonical: &str) -> Option<&PolicyEntry> {
        self.policy.get(canonical)
    }
}

/// Wall-clock milliseconds per phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub role_lifting: u64,
    /// Includes the extended filter when it runs
    pub supplemental_lifting: u64,
    pub extended_filter: u64,
    pub prune: u64,
    pub alias_and_legacy: u64,
    pub emit: u64,
    pub total: u64,
}

/// Per-pass counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub mode: String,
    pub mentions_total: u64,
    pub assertions_total: u64,
    pub role_mentions_scanned: u64,
    pub role_candidates_lifted: u64,
    pub supplemental_mentions_scanned: u64,
    pub supplemental_candidates_lifted: u64,
    pub extended_suppressed_candidates: u64,
    pub extended_suppressed_low_wikipedia_count_unlinked: u64,
    pub extended_suppressed_non_nominal_bias: u64,
    pub extended_suppressed_contained_by_stronger_host: u64,
    pub extended_promoted_unlinked_finite_verb: u64,
    pub extended_suppressed_participial_fragment: u64,
    pub extended_suppressed_participial_chunk_reduction: u64,
    pub extended_suppressed_two_token_participial_lift: u64,
    pub extended_suppressed_short_symbolic_token: u64,
    pub extended_merged_into_stronger_host: u64,
    pub pruned_candidates: u64,
    pub alias_merges: u64,
    pub legacy_merges: u64,
    pub phase_ms: PhaseTimings,
}

/// Diagnostics sidecar document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub source_by_canonical: BTreeMap<String, BTreeSet<String>>,
    pub policy_by_canonical: BTreeMap<String, PolicyEntry>,
    pub stats: GenerationStats,
}

impl Diagnostics {
    pub fn from_trace(trace: DecisionTrace, stats: GenerationStats) -> Self {
        let mut source_by_canonical = trace.sources;
        for tags in source_by_canonical.values_mut() {
            tags.retain(|t| !t.is_empty());
        }
        let mut policy_by_canonical = trace.policy;
        for entry in policy_by_canonical.values_mut() {
            entry.policy_hits.retain(|t| !t.is_empty());
        }
        Self {
            source_by_canonical,
            policy_by_canonical,
            stats,
        }
    }
}

/// How the output was produced
pub const PERSISTED_STEP12_MODE: &str = "persisted_step12";

/// Run metadata written next to a persisted artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaSidecar {
    pub mode: String,
    pub seed_id: String,
    pub options: GenerationOptions,
}

impl MetaSidecar {
    /// Options are recorded as they took effect.
    pub fn new(seed_id: &str, options: &GenerationOptions) -> Self {
        let mut options = options.clone();
        options.enable_recovery_synthesis = options.effective_recovery_synthesis();
        Self {
            mode: PERSISTED_STEP12_MODE.to_string(),
            seed_id: seed_id.to_string(),
            options,
        }
    }
}
