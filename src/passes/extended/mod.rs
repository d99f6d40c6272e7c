//! Extended policy engine
//!
//! Runs after supplemental lifting when the mode is `extended`: verb
//! promotion first, then one metrics snapshot, then a single sorted sweep
//! applying the suppression rules and containment resolution.

pub mod containment;
pub mod metrics;
pub mod promotion;
pub mod suppression;

use super::GenerationState;
use crate::error::ConceptResult;
use containment::Containment;
use suppression::Suppression;
use tracing::debug;

pub fn run(state: &mut GenerationState<'_>) -> ConceptResult<()> {
    let promoted_linked = promotion::promote_role_linked_verbs(state)?;
    let promoted_unlinked = promotion::promote_unlinked_finite_verbs(state)?;
    let snapshot = metrics::snapshot(state)?;
    let options = state.options;
    let thresholds = &options.thresholds;

    for canonical in state.table.sorted_canonicals() {
        let Some(candidate) = state.table.get(&canonical) else {
            continue;
        };
        let Some(metrics) = snapshot.get(&canonical) else {
            continue;
        };
        if metrics.mention_count == 0 {
            continue;
        }

        if let Some(rule) = Suppression::first_match(&canonical, metrics, thresholds) {
            state.trace.mark_policy(&canonical, rule.tag(), metrics.to_policy_metrics());
            state.table.remove(&canonical);
            rule.count(&mut state.stats);
            continue;
        }

        let outcome = containment::resolve(
            candidate,
            metrics,
            thresholds.merge_host_min_ratio,
            state.index,
            &snapshot,
            &state.table,
        );
        match outcome {
            Some(Containment::MergeInto(host)) => {
                state.table.merge(&host, &canonical);
                state
                    .trace
                    .mark_policy(&canonical, containment::MERGE_TAG, metrics.to_policy_metrics());
                state.table.remove(&canonical);
                state.stats.extended_suppressed_candidates += 1;
                state.stats.extended_merged_into_stronger_host += 1;
            }
            Some(Containment::Suppress) => {
                state
                    .trace
                    .mark_policy(&canonical, containment::SUPPRESS_TAG, metrics.to_policy_metrics());
                state.table.remove(&canonical);
                state.stats.extended_suppressed_candidates += 1;
                state.stats.extended_suppressed_contained_by_stronger_host += 1;
            }
            None => {}
        }
    }

    debug!(
        promoted_linked,
        promoted_unlinked,
        suppressed = state.stats.extended_suppressed_candidates,
        merged = state.stats.extended_merged_into_stronger_host,
        candidates = state.table.len(),
        "extended filter complete"
    );
    Ok(())
}
