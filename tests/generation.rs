//! Core lifting, aggregation and hard-fail behavior

mod common;

use common::*;
use concept_miner::{
    build_concept_candidates, concept_id_from_canonical, ConceptError, ExtendedThresholds, GenerationOptions,
};
use serde_json::json;

// === Scenario: basic lift ===

#[test]
fn basic_lift_emits_one_candidate_per_mention() {
    let output = generate(basic_lift(), &extended());
    assert_eq!(canonicals(&output), vec!["alpha", "beta"]);

    let alpha = candidate(&output, "alpha");
    assert_eq!(alpha.roles.actor, 1);
    assert_eq!(alpha.roles.total(), 1);
    assert_eq!(prefix_count(alpha), Some(3));
    assert_eq!(alpha.surfaces, vec!["Alpha"]);
    assert_eq!(alpha.mention_ids, vec!["m1"]);
    assert_eq!(alpha.assertion_ids, vec!["a1"]);

    let beta = candidate(&output, "beta");
    assert_eq!(beta.roles.other, 1);
    assert_eq!(beta.roles.total(), 1);
    assert_eq!(prefix_count(beta), Some(2));
    // the punctuation lead is not part of the lifted surface
    assert_eq!(beta.surfaces, vec!["Beta"]);
}

#[test]
fn basic_lift_is_identical_in_base_mode() {
    let extended_output = generate(basic_lift(), &extended());
    let base_output = generate(basic_lift(), &base());
    assert_eq!(extended_output.document, base_output.document);
}

#[test]
fn output_header_follows_the_input() {
    let output = generate(basic_lift(), &extended());
    assert_eq!(output.document.schema_version, SCHEMA_VERSION);
    assert_eq!(output.document.seed_id, "basic");
    assert_eq!(output.document.stage, "concept_candidates");
}

#[test]
fn concept_ids_hash_the_canonical() {
    let output = generate(basic_lift(), &extended());
    for c in &output.document.concept_candidates {
        assert_eq!(c.concept_id, concept_id_from_canonical(&c.canonical));
        assert!(c.concept_id.starts_with("cc_"));
        assert_eq!(c.concept_id.len(), 3 + 16);
    }
}

// === Scenario: multiple role links on one mention ===

#[test]
fn roles_accumulate_across_assertions() {
    let mut doc = basic_lift();
    doc["assertions"]
        .as_array_mut()
        .unwrap()
        .push(assertion("a2", vec![role("theme", &["m1"])], vec![], &[("m1", 1)]));
    let output = generate(doc, &extended());

    let alpha = candidate(&output, "alpha");
    assert_eq!(alpha.roles.actor, 1);
    assert_eq!(alpha.roles.theme, 1);
    assert_eq!(alpha.assertion_ids, vec!["a1", "a2"]);
    assert_eq!(alpha.mention_ids, vec!["m1"]);
    // both assertion entries merge into the mention's bucket
    assert_eq!(prefix_count(alpha), Some(4));
}

#[test]
fn exemplifies_links_carry_no_role() {
    let mut doc = basic_lift();
    doc["assertions"][0]["modifiers"] = json!([{ "role": "exemplifies", "mention_ids": ["m2"] }]);
    let output = generate(doc, &base());
    assert!(!has(&output, "beta"));
    assert!(has(&output, "alpha"));
}

// === Scenario: sort and uniqueness invariants ===

#[test]
fn arrays_are_sorted_and_unique() {
    let output = generate(verb_promotion(), &extended());
    let names = canonicals(&output);
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted);

    for c in &output.document.concept_candidates {
        for list in [&c.surfaces, &c.mention_ids, &c.assertion_ids] {
            let mut expected = list.clone();
            expected.sort();
            expected.dedup();
            assert_eq!(list, &expected, "unsorted list on {}", c.canonical);
        }
    }
}

// === Scenario: hard failures ===

#[test]
fn non_integer_count_fails() {
    let mut doc = basic_lift();
    doc["assertions"][0]["evidence"]["wiki_signals"]["mention_evidence"][0]["evidence"]["wiki_prefix_count"] =
        json!(2.5);
    let err = build_concept_candidates(&parse(doc), &extended()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Non-integer wiki_prefix_count at assertions[0].evidence.wiki_signals.mention_evidence[0].evidence.wiki_prefix_count; integer required (no coercion)."
    );
}

#[test]
fn dangling_mention_reference_fails() {
    let mut doc = basic_lift();
    doc["assertions"][0]["arguments"][0]["mention_ids"] = json!(["m9"]);
    let err = build_concept_candidates(&parse(doc), &extended()).unwrap_err();
    assert!(matches!(err, ConceptError::InputContract(_)));
    assert_eq!(
        err.to_string(),
        "assertions[0].arguments[0].mention_ids[0] references unknown mention id: m9"
    );
}

#[test]
fn wrong_stage_fails() {
    let mut doc = basic_lift();
    doc["stage"] = json!("concept_candidates");
    let err = build_concept_candidates(&parse(doc), &extended()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid Step 12 stage: concept_candidates");
}

#[test]
fn surface_without_alphanumerics_fails_canonicalization() {
    let doc = step12(
        "empty",
        "!!",
        vec![token("t1", 0, 0, 2, "!!", "NN", "NOUN")],
        vec![mention("m1", "token", &["t1"], "t1", (0, 2), None)],
        vec![assertion("a1", vec![role("actor", &["m1"])], vec![], &[("m1", 1)])],
    );
    let err = build_concept_candidates(&parse(doc), &extended()).unwrap_err();
    assert!(matches!(err, ConceptError::EmptyCanonicalKey { .. }), "{err}");
}

#[test]
fn negative_threshold_fails_before_any_pass() {
    let thresholds = ExtendedThresholds {
        non_nominal_weak_max: -1.0,
        ..Default::default()
    };
    let options = GenerationOptions::default().with_thresholds(thresholds);
    // the document is invalid too; configuration is checked first
    let mut doc = basic_lift();
    doc["stage"] = json!("bogus");
    let err = build_concept_candidates(&parse(doc), &options).unwrap_err();
    assert!(matches!(err, ConceptError::InvalidConfig(_)), "{err}");
}

#[test]
fn missing_signal_union_fails() {
    let mut doc = basic_lift();
    doc["assertions"][0]["evidence"] = json!({});
    let err = build_concept_candidates(&parse(doc), &extended()).unwrap_err();
    assert!(err.to_string().contains("signal union is empty"));
}

// === Scenario: alias synthesis ===

#[test]
fn determiner_led_alias_is_never_emitted() {
    let output = generate(alias_determiner_guard(), &extended());
    assert!(has(&output, "record_of_the_order"));
    assert!(has(&output, "order"));
    assert!(!has(&output, "the_order"));

    let order = candidate(&output, "order");
    assert_eq!(order.mention_ids, vec!["m1"]);
    assert_eq!(order.roles.actor, 1);
    let sources = &output.diagnostics.as_ref().unwrap().source_by_canonical;
    assert!(sources["order"].contains("alias"));
    assert!(!sources.contains_key("the_order"));
}

#[test]
fn alias_synthesis_can_be_disabled() {
    let options = extended().with_alias_synthesis(false);
    let output = generate(alias_determiner_guard(), &options);
    assert_eq!(canonicals(&output), vec!["record_of_the_order"]);
}
