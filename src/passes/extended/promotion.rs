//! Verb promotion
//!
//! Bare verbs fail base eligibility. With enough title-index evidence a
//! role-linked verb, or an unlinked finite verb under a much higher bar, is
//! lifted anyway.

use crate::concept::canonicalize_surface;
use crate::diagnostics::PolicyMetrics;
use crate::error::ConceptResult;
use crate::passes::GenerationState;
use crate::step12::{DocumentIndex, Mention};

pub const SOURCE_TAG: &str = "extended_promotion";
pub const ROLE_LINKED_VERB: &str = "promotion_verb_wikipedia_count";
pub const UNLINKED_FINITE_VERB: &str = "promotion_unlinked_finite_verb_wikipedia_count";

/// Tags counted as verbs inside an enumerating host phrase
const ENUMERATED_VERB_TAGS: [&str; 4] = ["VB", "VBP", "VBZ", "VBD"];

/// A phrase containing the mention that itself lists two or more verbs
fn has_enumerated_verb_host(mention: &Mention, index: &DocumentIndex<'_>) -> bool {
    index
        .containing_mentions(&mention.id)
        .iter()
        .filter_map(|id| index.mention(id))
        .filter(|host| host.is_phrase())
        .any(|host| {
            index
                .ordered_tokens(host)
                .iter()
                .filter(|t| ENUMERATED_VERB_TAGS.contains(&t.tag()))
                .count()
                >= 2
        })
}

/// Promote role-linked single-token verbs, in first-link order.
///
/// Gerunds already lifted by role linking accumulate their role usage a
/// second time under the promotion tag.
pub fn promote_role_linked_verbs(state: &mut GenerationState<'_>) -> ConceptResult<usize> {
    let index = state.index;
    let whitelist = state.verb_whitelist();
    let min_count = state.options.thresholds.verb_promotion_min_count;
    let links: Vec<(String, crate::passes::RoleLink)> = state
        .role_links
        .iter()
        .map(|(id, link)| (id.to_string(), link.clone()))
        .collect();

    let mut promoted = 0;
    for (mention_id, link) in links {
        let total = state.count_total(&mention_id);
        let Some(info) = state.lifts.get(&mention_id, index, whitelist)? else {
            continue;
        };
        if !info.has_lifted() || info.skip_single || !info.has_alnum {
            continue;
        }
        if info.mention.token_count() != 1 {
            continue;
        }
        let head = index.head_token(info.mention);
        let (tag, coarse) = head.map(|t| (t.tag(), t.coarse())).unwrap_or(("", ""));
        let verb_head = coarse == "VERB" || matches!(tag, "VB" | "VBD" | "VBP" | "VBZ");
        if !verb_head || (total as f64) < min_count {
            continue;
        }

        let canonical = canonicalize_surface(&info.lifted)?;
        let candidate = state.table.ensure(&canonical);
        candidate.surfaces.insert(info.lifted.clone());
        candidate.mention_ids.insert(mention_id.clone());
        candidate.assertion_ids.extend(link.assertion_ids.iter().cloned());
        candidate.roles.add(&link.role_counts);
        let metrics = PolicyMetrics::new(
            candidate.roles.total(),
            candidate.assertion_ids.len() as u64,
            candidate.mention_ids.len() as u64,
            total as f64,
            1.0,
        );
        state.trace.mark_source(&canonical, SOURCE_TAG);
        state.trace.mark_policy(&canonical, ROLE_LINKED_VERB, metrics);
        promoted += 1;
    }
    Ok(promoted)
}

/// Promote unlinked primary finite-verb tokens with overwhelming evidence.
pub fn promote_unlinked_finite_verbs(state: &mut GenerationState<'_>) -> ConceptResult<usize> {
    let index = state.index;
    let whitelist = state.verb_whitelist();
    let min_count = state.options.thresholds.unlinked_verb_promotion_min_count;

    let mut promoted = 0;
    for mention in index.mentions() {
        if state.selected.contains(&mention.id) {
            continue;
        }
        let Some(info) = state.lifts.get(&mention.id, index, whitelist)? else {
            continue;
        };
        if !info.has_lifted() || info.skip_single || !info.has_alnum {
            continue;
        }
        if mention.token_count() != 1 || !mention.is_token() || !mention.is_primary {
            continue;
        }
        if !matches!(mention.source_kind(), "token_fallback" | "token_shadow") {
            continue;
        }
        if state
            .role_links
            .get(&mention.id)
            .is_some_and(|link| !link.assertion_ids.is_empty())
        {
            continue;
        }
        let tag = index.head_token(mention).map(|t| t.tag()).unwrap_or("");
        if !matches!(tag, "VBP" | "VBZ" | "VBD") || has_enumerated_verb_host(mention, index) {
            continue;
        }
        let total = state.evidence.count_total(&mention.id, state.options.evidence_policy);
        if (total as f64) < min_count {
            continue;
        }

        let lifted = info.lifted.clone();
        let canonical = canonicalize_surface(&lifted)?;
        let candidate = state.table.ensure(&canonical);
        candidate.surfaces.insert(lifted);
        candidate.mention_ids.insert(mention.id.clone());
        let metrics = PolicyMetrics::new(0, 0, candidate.mention_ids.len() as u64, total as f64, 1.0);
        state.trace.mark_source(&canonical, SOURCE_TAG);
        state.trace.mark_policy(&canonical, UNLINKED_FINITE_VERB, metrics);
        state.stats.extended_promoted_unlinked_finite_verb += 1;
        state.selected.insert(mention.id.clone());
        promoted += 1;
    }
    Ok(promoted)
}
