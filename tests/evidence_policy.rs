//! Title-index evidence selection and the per-mention evidence trace

mod common;

use common::*;
use concept_miner::signals::{ContributionSource, SignalValue};
use concept_miner::EvidencePolicy;
use serde_json::json;

// === Scenario: lexicon fallback ===

#[test]
fn fallback_policy_uses_lexicon_evidence() {
    let output = generate(lexicon_fallback(), &extended());
    assert_eq!(prefix_count(candidate(&output, "alpha")), Some(9));
}

#[test]
fn assertion_only_policy_ignores_lexicon_evidence() {
    let options = extended().with_evidence_policy(EvidencePolicy::AssertionOnly);
    let output = generate(lexicon_fallback(), &options);
    assert_eq!(prefix_count(candidate(&output, "alpha")), Some(0));
}

#[test]
fn empty_assertion_bucket_blocks_the_fallback() {
    let mut doc = lexicon_fallback();
    doc["assertions"][0]["evidence"]["wiki_signals"]["mention_evidence"] =
        json!([{ "mention_id": "m1", "evidence": {} }]);
    let output = generate(doc, &extended());
    assert_eq!(prefix_count(candidate(&output, "alpha")), Some(0));
}

// === Scenario: dense title index ===

#[test]
fn title_index_covers_the_whole_signal_union() {
    let mut doc = basic_lift();
    doc["assertions"][0]["evidence"]["wiki_signals"]["mention_evidence"][1]["evidence"]["wiki_exact_match"] =
        json!(true);
    let output = generate(doc, &extended());

    let alpha = candidate(&output, "alpha");
    let keys: Vec<&str> = alpha.wikipedia_title_index.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["wiki_exact_match", "wiki_prefix_count"]);
    assert_eq!(alpha.wikipedia_title_index["wiki_exact_match"], SignalValue::Flag(false));

    let beta = candidate(&output, "beta");
    assert_eq!(beta.wikipedia_title_index["wiki_exact_match"], SignalValue::Flag(true));
    assert_eq!(beta.wikipedia_title_index["wiki_prefix_count"], SignalValue::Count(2));
}

// === Scenario: evidence trace ===

#[test]
fn evidence_trace_explains_each_mention() {
    let output = generate(lexicon_fallback(), &extended());
    let evidence = candidate(&output, "alpha")
        .wikipedia_title_index_evidence
        .as_ref()
        .expect("evidence trace is on by default");
    assert_eq!(evidence.wikipedia_title_index_policy, "assertion_then_lexicon_fallback");
    assert_eq!(evidence.mention_contributions.len(), 1);

    let contribution = &evidence.mention_contributions[0];
    assert_eq!(contribution.mention_id, "m1");
    assert_eq!(contribution.source, ContributionSource::LexiconFallback);
    assert!(contribution.assertion_signals.is_empty());
    assert_eq!(contribution.lexicon_signals["wiki_prefix_count"], SignalValue::Count(9));
    assert_eq!(contribution.selected_signals, contribution.lexicon_signals);
}

#[test]
fn assertion_only_trace_selects_nothing_without_assertion_evidence() {
    let options = extended().with_evidence_policy(EvidencePolicy::AssertionOnly);
    let output = generate(lexicon_fallback(), &options);
    let evidence = candidate(&output, "alpha").wikipedia_title_index_evidence.as_ref().unwrap();
    assert_eq!(evidence.wikipedia_title_index_policy, "assertion_only");
    assert!(evidence.mention_contributions[0].selected_signals.is_empty());
}

#[test]
fn evidence_trace_can_be_disabled() {
    let options = extended().with_evidence_trace(false);
    let output = generate(basic_lift(), &options);
    assert!(output
        .document
        .concept_candidates
        .iter()
        .all(|c| c.wikipedia_title_index_evidence.is_none()));

    let yaml = concept_miner::serialize_yaml(&output.document).unwrap();
    assert!(!yaml.contains("wikipedia_title_index_evidence"));
    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    concept_miner::validate_output(&value).unwrap();
}
