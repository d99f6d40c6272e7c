//! Shared Step12 fixture builders for the behavioral tests
//!
//! Documents are built as `serde_json::Value`s so a scenario can tweak any
//! field before parsing, then run through the library entry points.

#![allow(dead_code)]

use concept_miner::{
    build_concept_candidates, ConceptCandidate, GenerationOptions, GenerationOutput, Step12Document,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: &str = "1.0.0";

pub fn token(id: &str, i: i64, start: i64, end: i64, surface: &str, tag: &str, coarse: &str) -> Value {
    json!({
        "id": id,
        "i": i,
        "span": { "start": start, "end": end },
        "surface": surface,
        "normalized": surface.to_lowercase(),
        "pos": { "tag": tag, "coarse": coarse },
        "flags": { "is_punct": coarse == "PUNCT", "is_space": false, "is_stop": false },
    })
}

/// Primary mention; `source_kind` goes into provenance when given
pub fn mention(
    id: &str,
    kind: &str,
    token_ids: &[&str],
    head: &str,
    span: (i64, i64),
    source_kind: Option<&str>,
) -> Value {
    let mut value = json!({
        "id": id,
        "kind": kind,
        "is_primary": true,
        "token_ids": token_ids,
        "head_token_id": head,
        "span": { "start": span.0, "end": span.1 },
    });
    if let Some(kind) = source_kind {
        value["provenance"] = json!({ "source_kind": kind });
    }
    value
}

pub fn role(role: &str, mention_ids: &[&str]) -> Value {
    json!({ "role": role, "mention_ids": mention_ids })
}

/// Assertion carrying `wiki_prefix_count` evidence per mention
pub fn assertion(id: &str, arguments: Vec<Value>, modifiers: Vec<Value>, counts: &[(&str, u64)]) -> Value {
    let mention_evidence: Vec<Value> = counts
        .iter()
        .map(|(mention_id, count)| json!({ "mention_id": mention_id, "evidence": { "wiki_prefix_count": count } }))
        .collect();
    json!({
        "id": id,
        "arguments": arguments,
        "modifiers": modifiers,
        "evidence": { "wiki_signals": { "mention_evidence": mention_evidence } },
    })
}

pub fn step12(seed_id: &str, text: &str, tokens: Vec<Value>, mentions: Vec<Value>, assertions: Vec<Value>) -> Value {
    json!({
        "schema_version": SCHEMA_VERSION,
        "seed_id": seed_id,
        "stage": "elementary_assertions",
        "canonical_text": text,
        "tokens": tokens,
        "mentions": mentions,
        "assertions": assertions,
    })
}

pub fn parse(value: Value) -> Step12Document {
    serde_json::from_value(value).expect("fixture should deserialize")
}

pub fn generate(value: Value, options: &GenerationOptions) -> GenerationOutput {
    build_concept_candidates(&parse(value), options).expect("generation should succeed")
}

pub fn canonicals(output: &GenerationOutput) -> Vec<String> {
    output.document.canonicals().into_iter().map(str::to_string).collect()
}

pub fn has(output: &GenerationOutput, canonical: &str) -> bool {
    output.document.get(canonical).is_some()
}

pub fn candidate<'a>(output: &'a GenerationOutput, canonical: &str) -> &'a ConceptCandidate {
    output
        .document
        .get(canonical)
        .unwrap_or_else(|| panic!("missing candidate {canonical}; have {:?}", canonicals(output)))
}

pub fn prefix_count(candidate: &ConceptCandidate) -> Option<u64> {
    candidate
        .wikipedia_title_index
        .get("wiki_prefix_count")
        .and_then(|v| v.as_count())
}

/// Policy hits recorded for a canonical; requires diagnostics
pub fn policy_hits(output: &GenerationOutput, canonical: &str) -> Vec<String> {
    output
        .diagnostics
        .as_ref()
        .expect("diagnostics were not collected")
        .policy_by_canonical
        .get(canonical)
        .map(|entry| entry.policy_hits.iter().cloned().collect())
        .unwrap_or_default()
}

pub fn extended() -> GenerationOptions {
    GenerationOptions::default().with_diagnostics(true)
}

pub fn base() -> GenerationOptions {
    GenerationOptions::default()
        .with_mode(concept_miner::PolicyMode::Base)
        .with_diagnostics(true)
}

/// Persist a fixture as `seed.elementary-assertions.yaml` under `dir`
pub fn write_step12(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join("seed.elementary-assertions.yaml");
    let yaml = serde_yaml::to_string(value).expect("fixture should serialize");
    std::fs::write(&path, yaml).expect("fixture should be written");
    path
}

// ---------------------------------------------------------------------------
// Scenario documents
// ---------------------------------------------------------------------------

/// "Alpha!! Beta": an actor token and a beneficiary phrase led by punctuation
pub fn basic_lift() -> Value {
    step12(
        "basic",
        "Alpha!! Beta",
        vec![
            token("t1", 0, 0, 5, "Alpha", "NNP", "PROPN"),
            token("t2", 1, 5, 7, "!!", ".", "PUNCT"),
            token("t3", 2, 8, 12, "Beta", "NNP", "PROPN"),
        ],
        vec![
            mention("m1", "token", &["t1"], "t1", (0, 5), None),
            mention("m2", "mwe", &["t2", "t3"], "t3", (5, 12), None),
        ],
        vec![assertion(
            "a1",
            vec![role("actor", &["m1"])],
            vec![role("beneficiary", &["m2"])],
            &[("m1", 3), ("m2", 2)],
        )],
    )
}

/// One role-linked token whose only evidence is lexicon-carried
pub fn lexicon_fallback() -> Value {
    let mut m1 = mention("m1", "token", &["t1"], "t1", (0, 5), None);
    m1["provenance"] = json!({ "lexicon_evidence": { "wiki_prefix_count": 9 } });
    let mut doc = step12(
        "lexicon",
        "alpha",
        vec![token("t1", 0, 0, 5, "alpha", "NN", "NOUN")],
        vec![m1],
        vec![assertion("a1", vec![role("actor", &["m1"])], vec![], &[])],
    );
    doc["wiki_title_evidence"] = json!({ "wiki_prefix_count": 0 });
    doc
}

/// "users schedule reports" with `schedule` role-linked as a bare verb
pub fn verb_promotion() -> Value {
    step12(
        "verbs",
        "users schedule reports",
        vec![
            token("t1", 0, 0, 5, "users", "NNS", "NOUN"),
            token("t2", 1, 6, 14, "schedule", "VBP", "VERB"),
            token("t3", 2, 15, 22, "reports", "NNS", "NOUN"),
        ],
        vec![
            mention("m1", "token", &["t1"], "t1", (0, 5), None),
            mention("m2", "token", &["t2"], "t2", (6, 14), None),
            mention("m3", "token", &["t3"], "t3", (15, 22), None),
        ],
        vec![assertion(
            "a1",
            vec![role("actor", &["m1"]), role("theme", &["m3"])],
            vec![role("manner", &["m2"])],
            &[("m1", 2), ("m2", 5), ("m3", 2)],
        )],
    )
}

/// "scheduling" as a role-linked gerund, lifted by role linking and promoted again
pub fn role_linked_gerund() -> Value {
    step12(
        "gerund_linked",
        "scheduling",
        vec![token("t1", 0, 0, 10, "scheduling", "VBG", "VERB")],
        vec![mention("m1", "token", &["t1"], "t1", (0, 10), None)],
        vec![assertion("a1", vec![role("actor", &["m1"])], vec![], &[("m1", 5)])],
    )
}

/// "pipeline collects logs" with `collects` an unlinked finite-verb fallback
pub fn unlinked_finite_verb(count: u64) -> Value {
    step12(
        "unlinked",
        "pipeline collects logs",
        vec![
            token("t1", 0, 0, 8, "pipeline", "NN", "NOUN"),
            token("t2", 1, 9, 17, "collects", "VBZ", "VERB"),
            token("t3", 2, 18, 22, "logs", "NNS", "NOUN"),
        ],
        vec![
            mention("m1", "token", &["t1"], "t1", (0, 8), None),
            mention("m2", "token", &["t2"], "t2", (9, 17), Some("token_fallback")),
            mention("m3", "token", &["t3"], "t3", (18, 22), None),
        ],
        vec![assertion(
            "a1",
            vec![role("actor", &["m1"]), role("theme", &["m3"])],
            vec![],
            &[("m1", 4), ("m2", count), ("m3", 4)],
        )],
    )
}

/// "tenant scope role": an unlinked `tenant scope` chunk inside a
/// role-linked `tenant scope role` chunk
pub fn containment_merge() -> Value {
    step12(
        "containment",
        "tenant scope role",
        vec![
            token("t1", 0, 0, 6, "tenant", "NN", "NOUN"),
            token("t2", 1, 7, 12, "scope", "NN", "NOUN"),
            token("t3", 2, 13, 17, "role", "NN", "NOUN"),
        ],
        vec![
            mention("m1", "chunk", &["t1", "t2", "t3"], "t3", (0, 17), Some("chunk_accepted")),
            mention("m2", "chunk", &["t1", "t2"], "t2", (0, 12), Some("chunk_accepted")),
        ],
        vec![assertion(
            "a1",
            vec![role("actor", &["m1"])],
            vec![],
            &[("m1", 20), ("m2", 5)],
        )],
    )
}

/// "record of the order" as one role-linked chunk
pub fn alias_determiner_guard() -> Value {
    step12(
        "alias",
        "record of the order",
        vec![
            token("t1", 0, 0, 6, "record", "NN", "NOUN"),
            token("t2", 1, 7, 9, "of", "IN", "ADP"),
            token("t3", 2, 10, 13, "the", "DT", "DET"),
            token("t4", 3, 14, 19, "order", "NN", "NOUN"),
        ],
        vec![mention("m1", "chunk", &["t1", "t2", "t3", "t4"], "t1", (0, 19), None)],
        vec![assertion("a1", vec![role("actor", &["m1"])], vec![], &[("m1", 1)])],
    )
}

/// "complemented by rules": a participle-headed chunk cut at `by`
pub fn participial_chunk() -> Value {
    step12(
        "participial",
        "complemented by rules",
        vec![
            token("t1", 0, 0, 11, "complemented", "VBN", "VERB"),
            token("t2", 1, 12, 14, "by", "IN", "ADP"),
            token("t3", 2, 15, 20, "rules", "NNS", "NOUN"),
        ],
        vec![mention("m1", "chunk", &["t1", "t2", "t3"], "t1", (0, 20), Some("chunk_accepted"))],
        vec![assertion("a1", vec![], vec![], &[("m1", 3)])],
    )
}

/// "i.e." as an unlinked fallback token
pub fn short_symbolic() -> Value {
    step12(
        "symbolic",
        "i.e.",
        vec![token("t1", 0, 0, 4, "i.e.", "NN", "NOUN")],
        vec![mention("m1", "token", &["t1"], "t1", (0, 4), Some("token_fallback"))],
        vec![assertion("a1", vec![], vec![], &[("m1", 3)])],
    )
}

/// "using credentials": gerund-led two-token chunk, unlinked
pub fn two_token_participial() -> Value {
    step12(
        "gerund",
        "using credentials",
        vec![
            token("t1", 0, 0, 5, "using", "VBG", "VERB"),
            token("t2", 1, 6, 17, "credentials", "NNS", "NOUN"),
        ],
        vec![mention("m1", "chunk", &["t1", "t2"], "t2", (0, 17), Some("chunk_accepted"))],
        vec![assertion("a1", vec![], vec![], &[("m1", 3)])],
    )
}

/// "seat license system schedule": curated SaaS vocabulary
pub fn legacy_vocabulary() -> Value {
    step12(
        "legacy",
        "seat license system schedule",
        vec![
            token("t1", 0, 0, 4, "seat", "NN", "NOUN"),
            token("t2", 1, 5, 12, "license", "NN", "NOUN"),
            token("t3", 2, 13, 19, "system", "NN", "NOUN"),
            token("t4", 3, 20, 28, "schedule", "VB", "VERB"),
        ],
        vec![
            mention("m1", "token", &["t1"], "t1", (0, 4), None),
            mention("m2", "token", &["t2"], "t2", (5, 12), None),
            mention("m3", "token", &["t3"], "t3", (13, 19), None),
            mention("m4", "token", &["t4"], "t4", (20, 28), None),
        ],
        vec![assertion(
            "a1",
            vec![role("actor", &["m1"]), role("theme", &["m2"]), role("theme", &["m3"])],
            vec![role("manner", &["m4"])],
            &[("m1", 1), ("m2", 1), ("m3", 1), ("m4", 1)],
        )],
    )
}
