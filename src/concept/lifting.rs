//! Mention eligibility and lifting
//!
//! Lifting decides whether a mention is concept-worthy and which part of its
//! surface becomes the candidate key. Multi-word spans are reduced to their
//! nominal core: a non-nominal lead-in is dropped, and a trailing
//! prepositional tail is cut at the first stop adposition.

use super::canonical::normalize_lifted_surface;
use super::morphology::is_nominal_tag;
use crate::error::ConceptResult;
use crate::step12::{DocumentIndex, Mention, Token};
use std::collections::HashMap;

/// Adpositions that end the nominal part of a span
const STOP_ADPOSITIONS: [&str; 14] = [
    "for", "to", "with", "without", "by", "from", "than", "before", "after", "during", "while",
    "when", "if", "as",
];

/// First-token tags that mark a collapsed span as scaffolding
const SKIP_SINGLE_LEAD_TAGS: [&str; 10] = ["IN", "TO", "DT", "CC", "WDT", "MD", "VB", "VBP", "VBZ", "VBD"];

const SKIP_SINGLE_LEAD_WORDS: [&str; 11] = [
    "as", "before", "after", "during", "while", "when", "if", "than", "such", "only", "least",
];

/// Primary admission filter over a mention's head token.
///
/// `verb_whitelist` lists normalized verb forms admitted despite a non-gerund
/// verb head; it is empty unless legacy enrichment is on.
pub fn is_eligible_mention(mention: &Mention, index: &DocumentIndex<'_>, verb_whitelist: &[&str]) -> bool {
    let head = index.head_token(mention);
    let (tag, coarse) = head.map(|t| (t.tag(), t.coarse())).unwrap_or(("", ""));
    let normalized = head.map(Token::lower).unwrap_or_default();
    let single = mention.token_count() == 1;

    if head.is_some_and(|t| t.flags.is_punct || t.flags.is_space) {
        return false;
    }
    if matches!(tag, "DT" | "CD" | "CC") {
        return false;
    }
    if matches!(coarse, "PRON" | "ADV" | "ADP" | "X") {
        return false;
    }
    if coarse == "VERB" && tag != "VBG" && !verb_whitelist.contains(&normalized.as_str()) {
        return false;
    }
    if single && matches!(tag, "JJ" | "JJR" | "JJS" | "RB" | "RBR" | "RBS") {
        return false;
    }
    if single && tag == "VBG" && matches!(normalized.as_str(), "doing" | "placing") {
        return false;
    }
    if single && normalized.ends_with("ly") {
        return false;
    }
    true
}

/// Reduce a mention's surface to its nominal core.
pub fn derive_lifted_surface(mention: &Mention, index: &DocumentIndex<'_>) -> ConceptResult<String> {
    let base = index.surface(mention)?;
    let ordered = index.ordered_tokens(mention);
    if ordered.is_empty() {
        return Ok(normalize_lifted_surface(base));
    }

    let first_tag = ordered[0].tag();
    let second_tag = ordered.get(1).map(|t| t.tag()).unwrap_or("");
    let starts_nominal = is_nominal_tag(first_tag) && !(first_tag == "VBG" && second_tag == "DT");

    if !starts_nominal {
        if let Some(right) = ordered.iter().rposition(|t| is_nominal_tag(t.tag())) {
            let mut left = right;
            while left > 0 && is_nominal_tag(ordered[left - 1].tag()) {
                left -= 1;
            }
            let start = ordered[left].span.map(|s| s.start);
            let end = ordered[right].span.map(|s| s.end);
            if let (Some(start), Some(end)) = (start, end) {
                if end >= start {
                    return Ok(normalize_lifted_surface(index.slice(start, end)));
                }
            }
        }
    }

    let mut result = normalize_lifted_surface(base);
    let stop = ordered.iter().enumerate().skip(1).find(|(_, t)| {
        matches!(t.tag(), "IN" | "TO") && STOP_ADPOSITIONS.contains(&t.lower().as_str())
    });
    if let Some((i, _)) = stop {
        let start = ordered[0].span.map(|s| s.start);
        let end = ordered[i - 1].span.map(|s| s.end);
        if let (Some(start), Some(end)) = (start, end) {
            if end >= start {
                result = normalize_lifted_surface(index.slice(start, end));
            }
        }
    }
    Ok(result)
}

/// Eligible outright, or a phrase whose nominal core differs from its raw form.
pub fn should_lift_mention(
    mention: &Mention,
    index: &DocumentIndex<'_>,
    verb_whitelist: &[&str],
) -> ConceptResult<bool> {
    if is_eligible_mention(mention, index, verb_whitelist) {
        return Ok(true);
    }
    if mention.is_phrase() {
        let raw = normalize_lifted_surface(index.surface(mention)?);
        let derived = derive_lifted_surface(mention, index)?;
        return Ok(!derived.is_empty() && derived != raw);
    }
    Ok(false)
}

/// True when a multi-word raw surface collapsed to one token behind a
/// non-nominal lead word.
pub fn should_skip_derived_single_token(
    raw_surface: &str,
    lifted_surface: &str,
    mention: &Mention,
    index: &DocumentIndex<'_>,
) -> bool {
    let raw_parts = raw_surface.split_whitespace().count();
    let lifted_parts = lifted_surface.split_whitespace().count();
    if raw_parts <= 1 || lifted_parts != 1 {
        return false;
    }
    let Some(first) = index.ordered_tokens(mention).first() else {
        return false;
    };
    SKIP_SINGLE_LEAD_TAGS.contains(&first.tag()) || SKIP_SINGLE_LEAD_WORDS.contains(&first.lower().as_str())
}

/// Everything the passes need to know about lifting one mention
#[derive(Debug, Clone)]
pub struct LiftInfo<'a> {
    pub mention: &'a Mention,
    pub raw_surface: &'a str,
    pub normalized_raw: String,
    pub lifted: String,
    pub should_lift: bool,
    pub skip_single: bool,
    pub has_alnum: bool,
    pub has_finite_verb: bool,
}

impl<'a> LiftInfo<'a> {
    pub fn compute(mention: &'a Mention, index: &DocumentIndex<'a>, verb_whitelist: &[&str]) -> ConceptResult<Self> {
        let raw_surface = index.surface(mention)?;
        let lifted = derive_lifted_surface(mention, index)?;
        let normalized_raw = normalize_lifted_surface(raw_surface);
        let should_lift = should_lift_mention(mention, index, verb_whitelist)?;
        let has_lifted = !lifted.is_empty();
        Ok(Self {
            mention,
            raw_surface,
            skip_single: has_lifted && should_skip_derived_single_token(raw_surface, &lifted, mention, index),
            has_alnum: lifted.chars().any(|c| c.is_ascii_alphanumeric()),
            has_finite_verb: index.has_finite_verb_token(mention),
            normalized_raw,
            lifted,
            should_lift,
        })
    }

    pub fn has_lifted(&self) -> bool {
        !self.lifted.is_empty()
    }
}

/// Lazily computed, memoized lift info keyed by mention id.
///
/// Unknown ids memoize as `None`; errors are not cached since they abort
/// the run.
#[derive(Debug, Default)]
pub struct LiftCache<'a> {
    entries: HashMap<String, Option<LiftInfo<'a>>>,
}

impl<'a> LiftCache<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        mention_id: &str,
        index: &DocumentIndex<'a>,
        verb_whitelist: &[&str],
    ) -> ConceptResult<Option<&LiftInfo<'a>>> {
        if !self.entries.contains_key(mention_id) {
            let info = match index.mention(mention_id) {
                Some(mention) => Some(LiftInfo::compute(mention, index, verb_whitelist)?),
                None => None,
            };
            self.entries.insert(mention_id.to_string(), info);
        }
        Ok(self.entries.get(mention_id).and_then(Option::as_ref))
    }
}
