//! Pass 1: role-linked lifting
//!
//! Walks every assertion's arguments then modifiers. Each referenced mention
//! is recorded as role-linked whether or not it lifts; the extended policy
//! reads those links later.

use super::GenerationState;
use crate::concept::{canonicalize_surface, RoleBucket};
use crate::error::ConceptResult;
use tracing::debug;

pub const SOURCE_TAG: &str = "role";

pub fn run(state: &mut GenerationState<'_>) -> ConceptResult<()> {
    let index = state.index;
    let whitelist = state.verb_whitelist();

    for assertion in index.document().assertions() {
        for entry in assertion.role_entries() {
            let Some(bucket) = RoleBucket::from_role(entry.role()) else {
                continue;
            };
            for mention_id in entry.mention_ids() {
                let link = state.role_links.entry(mention_id);
                link.assertion_ids.insert(assertion.id.clone());
                link.role_counts.increment(bucket);
                state.stats.role_mentions_scanned += 1;

                let Some(info) = state.lifts.get(mention_id, index, whitelist)? else {
                    continue;
                };
                if !info.should_lift || !info.has_lifted() || info.skip_single {
                    continue;
                }
                let canonical = canonicalize_surface(&info.lifted)?;
                let candidate = state.table.ensure(&canonical);
                candidate.surfaces.insert(info.lifted.clone());
                candidate.mention_ids.insert(mention_id.clone());
                candidate.assertion_ids.insert(assertion.id.clone());
                candidate.roles.increment(bucket);
                state.trace.mark_source(&canonical, SOURCE_TAG);
                state.selected.insert(mention_id.clone());
                state.stats.role_candidates_lifted += 1;
            }
        }
    }

    debug!(
        scanned = state.stats.role_mentions_scanned,
        lifted = state.stats.role_candidates_lifted,
        candidates = state.table.len(),
        "role linking complete"
    );
    Ok(())
}
