//! Structural pruning
//!
//! One ordered sweep over the candidates present when pruning starts.
//! Compound membership is tracked incrementally: a dropped compound no
//! longer shields or condemns its components.

use super::legacy;
use super::GenerationState;
use crate::concept::{canonical_parts, CandidateTable};
use crate::step12::DocumentIndex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compound bookkeeping over the initial canonical set
struct PruneState {
    initial: HashSet<String>,
    role_totals: HashMap<String, u64>,
    parts: HashMap<String, Vec<String>>,
    by_component: HashMap<String, HashSet<String>>,
    by_suffix: HashMap<String, HashSet<String>>,
    active: HashSet<String>,
}

impl PruneState {
    fn new(canonicals: &[String], table: &CandidateTable) -> Self {
        let mut state = Self {
            initial: canonicals.iter().cloned().collect(),
            role_totals: HashMap::new(),
            parts: HashMap::new(),
            by_component: HashMap::new(),
            by_suffix: HashMap::new(),
            active: canonicals.iter().cloned().collect(),
        };
        for canonical in canonicals {
            let Some(candidate) = table.get(canonical) else {
                continue;
            };
            state.role_totals.insert(canonical.clone(), candidate.roles.total());
            let parts: Vec<String> = canonical_parts(canonical).into_iter().map(str::to_string).collect();
            if parts.len() >= 2 {
                for part in parts.iter().collect::<HashSet<_>>() {
                    state
                        .by_component
                        .entry(part.clone())
                        .or_default()
                        .insert(canonical.clone());
                }
                for suffix in suffixes(&parts) {
                    state.by_suffix.entry(suffix).or_default().insert(canonical.clone());
                }
            }
            state.parts.insert(canonical.clone(), parts);
        }
        state
    }

    fn role_total(&self, canonical: &str) -> u64 {
        self.role_totals.get(canonical).copied().unwrap_or(0)
    }

    /// Some other live compound uses this canonical as a component.
    fn is_component_of_live_compound(&self, canonical: &str) -> bool {
        self.by_component
            .get(canonical)
            .is_some_and(|set| set.iter().any(|c| c != canonical && self.active.contains(c)))
    }

    /// Some other live compound without role usage ends with this canonical.
    fn has_unlinked_longer_suffix(&self, canonical: &str) -> bool {
        self.by_suffix.get(canonical).is_some_and(|set| {
            set.iter()
                .any(|c| c != canonical && self.active.contains(c) && self.role_total(c) == 0)
        })
    }

    fn deactivate(&mut self, canonical: &str) {
        if !self.active.remove(canonical) {
            return;
        }
        let Some(parts) = self.parts.get(canonical) else {
            return;
        };
        if parts.len() < 2 {
            return;
        }
        for part in parts {
            if let Some(set) = self.by_component.get_mut(part) {
                set.remove(canonical);
                if set.is_empty() {
                    self.by_component.remove(part);
                }
            }
        }
        for suffix in suffixes(parts) {
            if let Some(set) = self.by_suffix.get_mut(&suffix) {
                set.remove(canonical);
                if set.is_empty() {
                    self.by_suffix.remove(&suffix);
                }
            }
        }
    }
}

/// Proper suffixes `parts[i..]` for `i >= 1`, joined
fn suffixes(parts: &[String]) -> Vec<String> {
    (1..parts.len()).map(|i| parts[i..].join("_")).collect()
}

fn should_drop(
    canonical: &str,
    state: &PruneState,
    table: &CandidateTable,
    index: &DocumentIndex<'_>,
    legacy_enabled: bool,
) -> bool {
    if canonical.chars().count() < 2 {
        return true;
    }
    if legacy_enabled && legacy::is_generic_drop(canonical) {
        return true;
    }
    if !canonical.contains('_') && state.initial.contains(&format!("{}s", canonical)) {
        return true;
    }

    let role_total = state.role_total(canonical);
    let candidate = table.get(canonical);
    if role_total == 0 && state.is_component_of_live_compound(canonical) {
        let mention_count = candidate.map(|c| c.mention_ids.len()).unwrap_or(0);
        let plural_aggregate = canonical.ends_with('s') && !canonical.ends_with("ss") && mention_count >= 2;
        let primary_leaf = !canonical.contains('_')
            && candidate.is_some_and(|c| {
                c.mention_ids
                    .iter()
                    .filter_map(|id| index.mention(id))
                    .any(|m| m.is_primary && m.is_token())
            });
        if !plural_aggregate && !primary_leaf {
            return true;
        }
    }

    let parts = canonical_parts(canonical);
    if parts.len() == 2 && table.contains(parts[1]) && state.has_unlinked_longer_suffix(canonical) {
        return true;
    }

    legacy_enabled && canonical.starts_with("generated_") && role_total == 0
}

/// Prune the table in insertion order. Returns the dropped canonicals.
pub fn prune(table: &mut CandidateTable, index: &DocumentIndex<'_>, legacy_enabled: bool) -> Vec<String> {
    let initial = table.canonicals();
    let mut state = PruneState::new(&initial, table);
    let mut dropped = Vec::new();
    for canonical in &initial {
        if !state.active.contains(canonical) {
            continue;
        }
        if should_drop(canonical, &state, table, index, legacy_enabled) {
            table.remove(canonical);
            state.deactivate(canonical);
            dropped.push(canonical.clone());
        }
    }
    dropped
}

pub fn run(state: &mut GenerationState<'_>) {
    let dropped = prune(&mut state.table, state.index, state.options.enable_legacy_enrichment);
    state.stats.pruned_candidates += dropped.len() as u64;
    debug!(pruned = dropped.len(), candidates = state.table.len(), "prune complete");
}
