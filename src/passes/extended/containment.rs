//! Containment resolution
//!
//! An unlinked multi-part candidate whose every mention sits inside a
//! broader, stronger host candidate does not survive on its own. It merges
//! into the best such host when one clears the evidence ratio, otherwise it
//! is dropped.

use super::metrics::{CandidateMetrics, MetricsSnapshot};
use crate::concept::{CandidateTable, Candidate};
use crate::diagnostics::round3;
use crate::step12::DocumentIndex;
use std::cmp::Ordering;

pub const MERGE_TAG: &str = "merge_into_stronger_host";
pub const SUPPRESS_TAG: &str = "suppress_contained_stronger_host";

/// Outcome for a contained candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Containment {
    MergeInto(String),
    Suppress,
}

/// Live host canonicals of a mention's containing mentions, excluding the
/// candidate itself
fn host_canonicals<'s>(
    mention_id: &str,
    canonical: &str,
    index: &DocumentIndex<'_>,
    snapshot: &'s MetricsSnapshot,
    table: &CandidateTable,
) -> Vec<(String, &'s CandidateMetrics)> {
    let mut hosts = Vec::new();
    for host_mention in index.containing_mentions(mention_id) {
        for host in snapshot.canonicals_for(host_mention) {
            if host == canonical || !table.contains(host) {
                continue;
            }
            if let Some(metrics) = snapshot.get(host) {
                hosts.push((host.to_string(), metrics));
            }
        }
    }
    hosts
}

fn span_len(index: &DocumentIndex<'_>, mention_id: &str) -> Option<i64> {
    index
        .mention(mention_id)
        .and_then(|m| m.span)
        .map(|s| s.len())
}

/// Every mention has a broader and stronger live host.
fn all_mentions_contained(
    candidate: &Candidate,
    metrics: &CandidateMetrics,
    index: &DocumentIndex<'_>,
    snapshot: &MetricsSnapshot,
    table: &CandidateTable,
) -> bool {
    candidate.mention_ids.iter().all(|mention_id| {
        let mention_len = span_len(index, mention_id);
        index.containing_mentions(mention_id).iter().any(|host_mention| {
            let host_len = span_len(index, host_mention);
            snapshot.canonicals_for(host_mention).any(|host| {
                if host == candidate.canonical || !table.contains(host) {
                    return false;
                }
                let Some(host_metrics) = snapshot.get(host) else {
                    return false;
                };
                let broader = host_metrics.parts > metrics.parts
                    || matches!((host_len, mention_len), (Some(h), Some(m)) if h > m);
                let stronger =
                    host_metrics.role_total > 0 || host_metrics.avg_wikipedia_count >= metrics.avg_wikipedia_count;
                broader && stronger
            })
        })
    })
}

/// Host preference: more role usage, then higher average, then more
/// parts, then the lexicographically smaller key.
fn compare_hosts(a: (&str, &CandidateMetrics), b: (&str, &CandidateMetrics)) -> Ordering {
    a.1.role_total
        .cmp(&b.1.role_total)
        .then_with(|| {
            round3(a.1.avg_wikipedia_count)
                .partial_cmp(&round3(b.1.avg_wikipedia_count))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.1.parts.cmp(&b.1.parts))
        .then_with(|| b.0.cmp(a.0))
}

fn best_merge_host(
    candidate: &Candidate,
    metrics: &CandidateMetrics,
    min_ratio: f64,
    index: &DocumentIndex<'_>,
    snapshot: &MetricsSnapshot,
    table: &CandidateTable,
) -> Option<String> {
    let mut best: Option<(String, CandidateMetrics)> = None;
    for mention_id in &candidate.mention_ids {
        for (host, host_metrics) in host_canonicals(mention_id, &candidate.canonical, index, snapshot, table) {
            if host_metrics.parts <= metrics.parts {
                continue;
            }
            let ratio = if metrics.avg_wikipedia_count > 0.0 {
                host_metrics.avg_wikipedia_count / metrics.avg_wikipedia_count
            } else {
                f64::INFINITY
            };
            if ratio < min_ratio {
                continue;
            }
            let better = match &best {
                None => true,
                Some((best_key, best_metrics)) => {
                    compare_hosts((&host, host_metrics), (best_key, best_metrics)) == Ordering::Greater
                }
            };
            if better {
                best = Some((host, *host_metrics));
            }
        }
    }
    best.map(|(host, _)| host)
}

/// Decide the fate of one candidate that passed the suppression rules.
///
/// Returns `None` when the candidate stays: it has role or assertion
/// evidence, is a single part, or some mention lacks a qualifying host.
pub fn resolve(
    candidate: &Candidate,
    metrics: &CandidateMetrics,
    min_ratio: f64,
    index: &DocumentIndex<'_>,
    snapshot: &MetricsSnapshot,
    table: &CandidateTable,
) -> Option<Containment> {
    if metrics.role_total > 0 || metrics.assertion_count > 0 || metrics.parts < 2 {
        return None;
    }
    if !all_mentions_contained(candidate, metrics, index, snapshot, table) {
        return None;
    }
    match best_merge_host(candidate, metrics, min_ratio, index, snapshot, table) {
        Some(host) if table.contains(&host) => Some(Containment::MergeInto(host)),
        _ => Some(Containment::Suppress),
    }
}
