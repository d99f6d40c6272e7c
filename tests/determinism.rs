//! Byte-level reproducibility and the standalone output contract check

mod common;

use common::*;
use concept_miner::{build_concept_candidates, serialize_yaml, validate_output, GenerationOptions};
use serde_json::Value;

fn yaml_for(doc: Value, options: &GenerationOptions) -> String {
    let output = build_concept_candidates(&parse(doc), options).unwrap();
    serialize_yaml(&output.document).unwrap()
}

fn scenarios() -> Vec<Value> {
    vec![
        basic_lift(),
        lexicon_fallback(),
        verb_promotion(),
        role_linked_gerund(),
        unlinked_finite_verb(200),
        containment_merge(),
        alias_determiner_guard(),
        participial_chunk(),
        short_symbolic(),
        two_token_participial(),
        legacy_vocabulary(),
    ]
}

// === Scenario: repeat runs ===

#[test]
fn repeated_generation_is_byte_identical() {
    let options = GenerationOptions::default();
    for doc in scenarios() {
        let first = yaml_for(doc.clone(), &options);
        let second = yaml_for(doc, &options);
        assert_eq!(first, second);
    }
}

#[test]
fn diagnostics_do_not_change_the_artifact() {
    for doc in scenarios() {
        let plain = yaml_for(doc.clone(), &GenerationOptions::default());
        let traced = yaml_for(doc, &GenerationOptions::default().with_diagnostics(true));
        assert_eq!(plain, traced);
    }
}

#[test]
fn every_scenario_passes_the_output_check() {
    for options in [GenerationOptions::default(), base(), base().with_legacy_enrichment(true)] {
        for doc in scenarios() {
            let yaml = yaml_for(doc, &options);
            assert!(yaml.ends_with('\n') && !yaml.ends_with("\n\n"));
            assert!(!yaml.contains('\r'));
            let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
            validate_output(&value).unwrap();
        }
    }
}

// === Scenario: golden shape ===

#[test]
fn basic_lift_yaml_shape() {
    let yaml = yaml_for(basic_lift(), &GenerationOptions::default().with_evidence_trace(false));
    let alpha_id = concept_miner::concept_id_from_canonical("alpha");
    let beta_id = concept_miner::concept_id_from_canonical("beta");
    let expected = format!(
        "schema_version: 1.0.0
seed_id: basic
stage: concept_candidates
concept_candidates:
- concept_id: {alpha_id}
  canonical: alpha
  surfaces:
  - Alpha
  mention_ids:
  - m1
  assertion_ids:
  - a1
  roles:
    actor: 1
    theme: 0
    attr: 0
    topic: 0
    location: 0
    other: 0
  wikipedia_title_index:
    wiki_prefix_count: 3
- concept_id: {beta_id}
  canonical: beta
  surfaces:
  - Beta
  mention_ids:
  - m2
  assertion_ids:
  - a1
  roles:
    actor: 0
    theme: 0
    attr: 0
    topic: 0
    location: 0
    other: 1
  wikipedia_title_index:
    wiki_prefix_count: 2
"
    );
    assert_eq!(yaml, expected);
}

// === Scenario: tampered artifacts ===

#[test]
fn swapped_candidates_fail_the_check() {
    let output = build_concept_candidates(&parse(basic_lift()), &GenerationOptions::default()).unwrap();
    let mut document = output.document;
    document.concept_candidates.swap(0, 1);
    let value = serde_yaml::to_value(&document).unwrap();
    let err = validate_output(&value).unwrap_err();
    assert_eq!(err.to_string(), "Candidates not sorted by canonical at index 1.");
}

#[test]
fn unsorted_surfaces_fail_the_check() {
    let output = build_concept_candidates(&parse(containment_merge()), &GenerationOptions::default()).unwrap();
    let mut document = output.document;
    let host = document
        .concept_candidates
        .iter_mut()
        .find(|c| c.canonical == "tenant_scope_role")
        .unwrap();
    host.surfaces.reverse();
    let value = serde_yaml::to_value(&document).unwrap();
    let err = validate_output(&value).unwrap_err();
    assert_eq!(err.to_string(), "Candidate tenant_scope_role surfaces must be sorted.");
}

#[test]
fn duplicate_mention_ids_fail_the_check() {
    let output = build_concept_candidates(&parse(basic_lift()), &GenerationOptions::default()).unwrap();
    let mut document = output.document;
    document.concept_candidates[0].mention_ids.push("m1".to_string());
    let value = serde_yaml::to_value(&document).unwrap();
    let err = validate_output(&value).unwrap_err();
    assert_eq!(err.to_string(), "Candidate alpha mention_ids has duplicate entry: m1");
}

#[test]
fn duplicate_candidate_fails_the_check() {
    let output = build_concept_candidates(&parse(basic_lift()), &GenerationOptions::default()).unwrap();
    let mut document = output.document;
    let alpha = document.concept_candidates[0].clone();
    document.concept_candidates.insert(1, alpha);
    let value = serde_yaml::to_value(&document).unwrap();
    let err = validate_output(&value).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate candidate alpha at index 1.");
}

#[test]
fn checked_artifact_with_repeated_candidate_is_rejected() {
    let output = build_concept_candidates(&parse(basic_lift()), &GenerationOptions::default()).unwrap();
    let mut document = output.document;
    let beta = document.concept_candidates[1].clone();
    document.concept_candidates.push(beta);
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("seed.concept-candidates.yaml");
    std::fs::write(&path, serde_yaml::to_string(&document).unwrap()).unwrap();
    let err = concept_miner::check_artifact_path(&path).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate candidate beta at index 2.");
}
