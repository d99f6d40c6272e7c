//! Alias synthesis
//!
//! Plural keys feed their singular form, and multi-part keys feed their
//! trailing one- and two-part tails. Sources always stay in the table.

use super::legacy;
use super::GenerationState;
use crate::concept::{canonical_parts, should_reject_alias_canonical, singularize_canonical, CandidateTable};
use crate::diagnostics::DecisionTrace;
use tracing::debug;

pub const SOURCE_TAG: &str = "alias";

/// Alias targets derived from a canonical's parts, in merge order
fn tail_targets(parts: &[&str], legacy_enabled: bool) -> Vec<String> {
    let mut targets = Vec::new();
    let n = parts.len();
    if n >= 3 {
        targets.push(format!("{}_{}", parts[n - 2], parts[n - 1]));
    }
    if n >= 2 {
        targets.push(parts[n - 1].to_string());
    }
    if legacy_enabled {
        if let Some(acronym) = legacy::acronym_alias_target(parts) {
            targets.push(acronym.to_string());
        }
    }
    targets
}

/// Run both alias loops. Returns the number of merges performed.
pub fn synthesize(table: &mut CandidateTable, trace: &mut DecisionTrace, legacy_enabled: bool) -> usize {
    let mut merges = 0;

    for canonical in table.canonicals() {
        let singular = singularize_canonical(&canonical);
        if singular.is_empty() || singular == canonical || !table.contains(&canonical) {
            continue;
        }
        table.ensure(&singular);
        if table.merge(&singular, &canonical) {
            merges += 1;
        }
        trace.mark_source(&singular, SOURCE_TAG);
    }

    for canonical in table.canonicals() {
        let parts = canonical_parts(&canonical);
        for target in tail_targets(&parts, legacy_enabled) {
            if should_reject_alias_canonical(&target) {
                continue;
            }
            table.ensure(&target);
            if table.merge(&target, &canonical) {
                merges += 1;
            }
            trace.mark_source(&target, SOURCE_TAG);
        }
    }
    merges
}

/// Alias synthesis, then the legacy rule table when enabled.
pub fn run(state: &mut GenerationState<'_>) {
    let options = state.options;
    let merges = synthesize(&mut state.table, &mut state.trace, options.enable_legacy_enrichment);
    state.stats.alias_merges += merges as u64;
    if options.enable_legacy_enrichment {
        let applied = legacy::apply(
            &mut state.table,
            &mut state.trace,
            options.effective_recovery_synthesis(),
        );
        state.stats.legacy_merges += applied as u64;
    }
    debug!(
        alias_merges = state.stats.alias_merges,
        legacy_merges = state.stats.legacy_merges,
        candidates = state.table.len(),
        "alias synthesis complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(keys: &[&str]) -> CandidateTable {
        let mut table = CandidateTable::new();
        for key in keys {
            table.ensure(key).mention_ids.insert(format!("m_{}", key));
        }
        table
    }

    #[test]
    fn plural_feeds_singular() {
        let mut table = table_of(&["policies"]);
        let mut trace = DecisionTrace::new();
        synthesize(&mut table, &mut trace, false);
        assert!(table.get("policy").unwrap().mention_ids.contains("m_policies"));
        assert!(table.contains("policies"));
        assert!(trace.sources("policy").unwrap().contains("alias"));
    }

    #[test]
    fn tails_are_synthesized() {
        let mut table = table_of(&["tenant_scope_role"]);
        let mut trace = DecisionTrace::new();
        synthesize(&mut table, &mut trace, false);
        assert!(table.get("scope_role").unwrap().mention_ids.contains("m_tenant_scope_role"));
        assert!(table.contains("role"));
    }

    #[test]
    fn article_led_tail_is_rejected() {
        let mut table = table_of(&["record_of_the_order"]);
        let mut trace = DecisionTrace::new();
        synthesize(&mut table, &mut trace, false);
        assert!(!table.contains("the_order"));
        assert!(table.contains("order"));
    }

    #[test]
    fn acronym_hook_is_legacy_only() {
        let mut table = table_of(&["abac_policy"]);
        let mut trace = DecisionTrace::new();
        synthesize(&mut table, &mut trace, false);
        assert!(!table.contains("abac"));

        synthesize(&mut table, &mut trace, true);
        assert!(table.get("abac").unwrap().mention_ids.contains("m_abac_policy"));
    }
}
