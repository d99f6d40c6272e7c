//! DocumentIndex: flat lookup tables over a validated Step12 document
//!
//! Mentions and tokens stay in the document; the index holds borrowed
//! references keyed by id plus precomputed relationships (ordered tokens per
//! mention, span containment). Relationships are id lists, never back-pointers.

use super::types::{Mention, Span, Step12Document, Token};
use crate::error::{ConceptError, ConceptResult};
use std::collections::HashMap;

/// Fine-grained tags that count as a finite verb inside a phrase
const FINITE_VERB_TAGS: [&str; 5] = ["VB", "VBD", "VBP", "VBZ", "MD"];

/// Lookup tables and containment adjacency for one document
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    doc: &'a Step12Document,
    mentions: HashMap<&'a str, &'a Mention>,
    tokens: HashMap<&'a str, &'a Token>,
    ordered_tokens: HashMap<&'a str, Vec<&'a Token>>,
    /// Byte offset for every UTF-16 code unit position in `canonical_text`
    /// (len = units + 1); the middle of a surrogate pair maps to the end of
    /// its char
    unit_offsets: Vec<usize>,
    /// Mention id -> ids of any other mention whose span contains it
    /// (segments compatible when either side has none)
    containing: HashMap<&'a str, Vec<&'a str>>,
    /// Mention id -> ids of chunk/mwe mentions containing it in the same segment
    phrase_hosts: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DocumentIndex<'a> {
    /// Build the index. Mention ids are assumed unique (see `validate_contract`).
    pub fn build(doc: &'a Step12Document) -> Self {
        let mut tokens = HashMap::new();
        for token in &doc.tokens {
            if !token.id.is_empty() {
                tokens.insert(token.id.as_str(), token);
            }
        }

        let mut mentions = HashMap::new();
        let mut ordered_tokens = HashMap::new();
        for mention in doc.mentions() {
            mentions.insert(mention.id.as_str(), mention);
            let mut ordered: Vec<&Token> = mention
                .token_ids
                .iter()
                .filter_map(|id| tokens.get(id.as_str()).copied())
                .collect();
            ordered.sort_by(|a, b| a.index().cmp(&b.index()).then_with(|| a.id.cmp(&b.id)));
            ordered_tokens.insert(mention.id.as_str(), ordered);
        }

        let text = doc.text();
        let mut unit_offsets = Vec::with_capacity(text.len() + 1);
        for (i, c) in text.char_indices() {
            unit_offsets.push(i);
            if c.len_utf16() == 2 {
                unit_offsets.push(i + c.len_utf8());
            }
        }
        unit_offsets.push(text.len());

        let (containing, phrase_hosts) = build_containment(doc.mentions());

        Self {
            doc,
            mentions,
            tokens,
            ordered_tokens,
            unit_offsets,
            containing,
            phrase_hosts,
        }
    }

    pub fn document(&self) -> &'a Step12Document {
        self.doc
    }

    /// Mentions in document order
    pub fn mentions(&self) -> &'a [Mention] {
        self.doc.mentions()
    }

    pub fn mention(&self, id: &str) -> Option<&'a Mention> {
        self.mentions.get(id).copied()
    }

    pub fn token(&self, id: &str) -> Option<&'a Token> {
        self.tokens.get(id).copied()
    }

    pub fn head_token(&self, mention: &Mention) -> Option<&'a Token> {
        mention.head_token_id.as_deref().and_then(|id| self.token(id))
    }

    /// Resolvable tokens of a mention sorted by index, then id
    pub fn ordered_tokens(&self, mention: &Mention) -> &[&'a Token] {
        self.ordered_tokens
            .get(mention.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_finite_verb_token(&self, mention: &Mention) -> bool {
        self.ordered_tokens(mention)
            .iter()
            .any(|t| FINITE_VERB_TAGS.contains(&t.tag()))
    }

    pub fn containing_mentions(&self, mention_id: &str) -> &[&'a str] {
        self.containing.get(mention_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn phrase_hosts(&self, mention_id: &str) -> &[&'a str] {
        self.phrase_hosts.get(mention_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Slice of the canonical text by UTF-16 code unit offsets, clamped to
    /// the text
    pub fn slice(&self, start: i64, end: i64) -> &'a str {
        let max = (self.unit_offsets.len() - 1) as i64;
        let start = start.clamp(0, max) as usize;
        let end = end.clamp(0, max) as usize;
        if start >= end {
            return "";
        }
        let (start, end) = (self.unit_offsets[start], self.unit_offsets[end]);
        if start >= end {
            return "";
        }
        &self.doc.text()[start..end]
    }

    /// Raw surface of a mention; fails when the span is missing or inverted
    pub fn surface(&self, mention: &Mention) -> ConceptResult<&'a str> {
        match mention.span {
            Some(span) if span.is_valid() => Ok(self.slice(span.start, span.end)),
            Some(_) => Err(ConceptError::contract(format!(
                "Mention {} span is invalid.",
                mention.id
            ))),
            None => Err(ConceptError::contract(format!(
                "Mention {} has invalid span.",
                mention.id
            ))),
        }
    }
}

type Adjacency<'a> = HashMap<&'a str, Vec<&'a str>>;

fn build_containment(mentions: &[Mention]) -> (Adjacency<'_>, Adjacency<'_>) {
    let spanned: Vec<(&Mention, Span)> = mentions
        .iter()
        .filter_map(|m| m.span.map(|s| (m, s)))
        .collect();

    let mut containing: Adjacency = HashMap::new();
    let mut phrase_hosts: Adjacency = HashMap::new();
    for (mention, span) in &spanned {
        let segment = mention.segment();
        let mut hosts = Vec::new();
        let mut phrases = Vec::new();
        for (host, host_span) in &spanned {
            if host.id == mention.id || !host_span.contains(span) {
                continue;
            }
            let host_segment = host.segment();
            let compatible = segment.is_empty() || host_segment.is_empty() || segment == host_segment;
            if compatible {
                hosts.push(host.id.as_str());
            }
            if host.is_phrase() && segment == host_segment {
                phrases.push(host.id.as_str());
            }
        }
        containing.insert(mention.id.as_str(), hosts);
        phrase_hosts.insert(mention.id.as_str(), phrases);
    }
    (containing, phrase_hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Step12Document {
        serde_json::from_value(json!({
            "stage": "elementary_assertions",
            "schema_version": "1.0.0",
            "canonical_text": "Grüße tenant scope",
            "tokens": [
                { "id": "t2", "i": 1, "span": { "start": 6, "end": 12 }, "pos": { "tag": "NN" } },
                { "id": "t1", "i": 0, "span": { "start": 0, "end": 5 }, "pos": { "tag": "VBZ" } },
                { "id": "t3", "i": 2, "span": { "start": 13, "end": 18 }, "pos": { "tag": "NN" } },
            ],
            "mentions": [
                { "id": "m1", "kind": "token", "token_ids": ["t2"], "span": { "start": 6, "end": 12 }, "segment_id": "s1" },
                { "id": "m2", "kind": "chunk", "token_ids": ["t3", "t2", "tx"], "span": { "start": 6, "end": 18 }, "segment_id": "s1" },
                { "id": "m3", "kind": "chunk", "token_ids": ["t1", "t2", "t3"], "span": { "start": 0, "end": 18 } },
                { "id": "m4", "kind": "mwe", "token_ids": ["t2"], "span": { "start": 6, "end": 12 }, "segment_id": "s2" },
                { "id": "m5", "kind": "token", "token_ids": ["t1"] },
            ],
            "assertions": [],
        }))
        .unwrap()
    }

    #[test]
    fn ordered_tokens_skip_missing_and_sort_by_index() {
        let doc = doc();
        let index = DocumentIndex::build(&doc);
        let m2 = index.mention("m2").unwrap();
        let ids: Vec<&str> = index.ordered_tokens(m2).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
    }

    #[test]
    fn surface_uses_utf16_offsets() {
        let doc = doc();
        let index = DocumentIndex::build(&doc);
        assert_eq!(index.slice(0, 5), "Grüße");
        assert_eq!(index.surface(index.mention("m1").unwrap()).unwrap(), "tenant");
        assert_eq!(index.slice(13, 400), "scope");
        assert_eq!(index.slice(30, 40), "");
    }

    #[test]
    fn astral_chars_count_as_two_units() {
        let mut doc = doc();
        doc.canonical_text = Some("\u{1F680} rocket launch".to_string());
        let index = DocumentIndex::build(&doc);
        assert_eq!(index.slice(0, 2), "\u{1F680}");
        assert_eq!(index.slice(3, 9), "rocket");
        assert_eq!(index.slice(10, 16), "launch");
        // an offset inside the surrogate pair rounds up to the char end
        assert_eq!(index.slice(1, 9), " rocket");
    }

    #[test]
    fn missing_span_is_a_contract_error() {
        let doc = doc();
        let index = DocumentIndex::build(&doc);
        let err = index.surface(index.mention("m5").unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Mention m5 has invalid span.");
    }

    #[test]
    fn containment_respects_segments() {
        let doc = doc();
        let index = DocumentIndex::build(&doc);
        // m3 has no segment and is compatible with everything; m4 is in another segment
        assert_eq!(index.containing_mentions("m1"), &["m2", "m3"]);
        // phrase hosts require an identical segment
        assert_eq!(index.phrase_hosts("m1"), &["m2"]);
        assert!(index.containing_mentions("m3").is_empty());
    }

    #[test]
    fn finite_verb_detection_uses_token_tags() {
        let doc = doc();
        let index = DocumentIndex::build(&doc);
        assert!(index.has_finite_verb_token(index.mention("m3").unwrap()));
        assert!(!index.has_finite_verb_token(index.mention("m2").unwrap()));
    }
}
