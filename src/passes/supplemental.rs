//! Pass 2: supplemental lifting of mentions role linking did not select
//!
//! Only mentions of certain upstream provenance qualify. Two structural
//! guards keep fragments of a larger phrase out: a singular fallback noun
//! inside an adposition-led phrase, and a shadow token inside a
//! participle-led phrase.

use super::GenerationState;
use crate::concept::{canonicalize_surface, normalize_lifted_surface};
use crate::error::ConceptResult;
use crate::step12::{DocumentIndex, Mention};
use tracing::debug;

pub const SOURCE_TAG: &str = "supplemental";

/// Provenance kinds eligible for supplemental lifting
const SOURCE_KINDS: [&str; 4] = ["mwe_materialized", "token_shadow", "chunk_accepted", "token_fallback"];

/// Host lead words that mark an adposition-like phrase
const ADPOSITION_LEAD_WORDS: [&str; 7] = ["as", "before", "after", "than", "while", "when", "if"];

/// Phrase hosts of a mention that carry no finite verb
fn non_finite_hosts<'a>(mention: &Mention, index: &DocumentIndex<'a>) -> Vec<&'a Mention> {
    index
        .phrase_hosts(&mention.id)
        .iter()
        .filter_map(|id| index.mention(id))
        .filter(|host| !index.has_finite_verb_token(host))
        .collect()
}

fn is_adposition_led(host: &Mention, index: &DocumentIndex<'_>) -> bool {
    let Some(first) = index.ordered_tokens(host).first() else {
        return false;
    };
    matches!(first.tag(), "IN" | "TO" | "RB") || ADPOSITION_LEAD_WORDS.contains(&first.lower().as_str())
}

fn is_participle_led(host: &Mention, index: &DocumentIndex<'_>) -> bool {
    index
        .ordered_tokens(host)
        .first()
        .is_some_and(|t| t.tag() == "VBN")
}

/// Structural guards; true when the mention should be skipped.
fn guarded_out(mention: &Mention, index: &DocumentIndex<'_>) -> ConceptResult<bool> {
    match mention.source_kind() {
        "token_fallback" => {
            let hosts = non_finite_hosts(mention, index);
            if !hosts.iter().any(|h| is_adposition_led(h, index)) {
                return Ok(false);
            }
            let head_tag = index.head_token(mention).map(|t| t.tag()).unwrap_or("");
            let plural_tag = matches!(head_tag, "NNS" | "NNPS");
            let looks_plural = normalize_lifted_surface(index.surface(mention)?)
                .to_lowercase()
                .ends_with('s');
            Ok(!plural_tag && !looks_plural)
        }
        "token_shadow" => Ok(non_finite_hosts(mention, index)
            .iter()
            .any(|h| is_participle_led(h, index))),
        _ => Ok(false),
    }
}

pub fn run(state: &mut GenerationState<'_>) -> ConceptResult<()> {
    let index = state.index;
    let whitelist = state.verb_whitelist();

    for mention in index.mentions() {
        state.stats.supplemental_mentions_scanned += 1;
        if state.selected.contains(&mention.id) {
            continue;
        }
        if !SOURCE_KINDS.contains(&mention.source_kind()) {
            continue;
        }
        if guarded_out(mention, index)? {
            continue;
        }
        let Some(info) = state.lifts.get(&mention.id, index, whitelist)? else {
            continue;
        };
        if !info.should_lift || !info.has_lifted() {
            continue;
        }
        // a verb phrase that lifting did not reduce is not a concept
        if info.has_finite_verb && info.lifted == info.normalized_raw {
            let lower = info.lifted.to_lowercase();
            if !whitelist.contains(&lower.as_str()) {
                continue;
            }
        }
        if info.skip_single || !info.has_alnum {
            continue;
        }
        let canonical = canonicalize_surface(&info.lifted)?;
        let candidate = state.table.ensure(&canonical);
        candidate.surfaces.insert(info.lifted.clone());
        candidate.mention_ids.insert(mention.id.clone());
        state.trace.mark_source(&canonical, SOURCE_TAG);
        state.stats.supplemental_candidates_lifted += 1;
    }

    debug!(
        scanned = state.stats.supplemental_mentions_scanned,
        lifted = state.stats.supplemental_candidates_lifted,
        candidates = state.table.len(),
        "supplemental lifting complete"
    );
    Ok(())
}
