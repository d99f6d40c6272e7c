//! Materialize the candidate table into output records
//!
//! Every candidate gets a dense title index over the document's union of
//! signal keys: zeros and `false` by default, then each mention's selected
//! bucket merged in (counts add, flags OR).

use super::record::{
    ConceptCandidate, ConceptCandidatesDocument, MentionContribution, TitleIndexEvidence, OUTPUT_STAGE,
};
use crate::concept::{concept_id_from_canonical, Candidate, CandidateTable};
use crate::config::GenerationOptions;
use crate::error::{ConceptError, ConceptResult};
use crate::signals::{merge_signal, sparse_signals, EvidenceMaps, SignalBucket, SignalValue};
use crate::step12::Step12Document;
use std::collections::HashMap;

fn title_index(
    candidate: &Candidate,
    evidence: &EvidenceMaps,
    options: &GenerationOptions,
) -> (SignalBucket, Vec<MentionContribution>) {
    let mut index: SignalBucket = evidence
        .signal_keys()
        .iter()
        .map(|k| (k.clone(), SignalValue::zero_for(k)))
        .collect();
    let mut contributions = Vec::new();

    for mention_id in &candidate.mention_ids {
        let selected = evidence.select(mention_id, options.evidence_policy);
        if let Some(bucket) = selected {
            for key in evidence.signal_keys() {
                if let Some(value) = bucket.get(key) {
                    merge_signal(&mut index, key, *value);
                }
            }
        }
        if options.emit_evidence_trace {
            contributions.push(MentionContribution {
                mention_id: mention_id.clone(),
                source: evidence.contribution_source(mention_id),
                assertion_signals: sparse_signals(evidence.assertion_bucket(mention_id)),
                lexicon_signals: sparse_signals(evidence.lexicon_bucket(mention_id)),
                selected_signals: sparse_signals(selected),
            });
        }
    }
    (index, contributions)
}

fn to_record(candidate: &Candidate, evidence: &EvidenceMaps, options: &GenerationOptions) -> ConceptCandidate {
    let (wikipedia_title_index, contributions) = title_index(candidate, evidence, options);
    let wikipedia_title_index_evidence = options.emit_evidence_trace.then(|| TitleIndexEvidence {
        wikipedia_title_index_policy: options.evidence_policy.as_str().to_string(),
        mention_contributions: contributions,
    });
    ConceptCandidate {
        concept_id: concept_id_from_canonical(&candidate.canonical),
        canonical: candidate.canonical.clone(),
        surfaces: candidate.surfaces.iter().cloned().collect(),
        mention_ids: candidate.mention_ids.iter().cloned().collect(),
        assertion_ids: candidate.assertion_ids.iter().cloned().collect(),
        roles: candidate.roles,
        wikipedia_title_index,
        wikipedia_title_index_evidence,
    }
}

/// Build the output document, sorted by canonical. Fails when two
/// canonicals hash to the same concept id.
pub fn build_document(
    table: &CandidateTable,
    doc: &Step12Document,
    evidence: &EvidenceMaps,
    options: &GenerationOptions,
) -> ConceptResult<ConceptCandidatesDocument> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut records = Vec::with_capacity(table.len());

    for canonical in table.sorted_canonicals() {
        let Some(candidate) = table.get(&canonical) else {
            continue;
        };
        let record = to_record(candidate, evidence, options);
        if let Some(first) = seen.get(&record.concept_id) {
            return Err(ConceptError::ConceptIdCollision {
                concept_id: record.concept_id.clone(),
                first: first.clone(),
                second: canonical,
            });
        }
        seen.insert(record.concept_id.clone(), canonical);
        records.push(record);
    }

    Ok(ConceptCandidatesDocument {
        schema_version: doc.schema_version.clone().unwrap_or_default(),
        seed_id: doc.seed_id().to_string(),
        stage: OUTPUT_STAGE.to_string(),
        concept_candidates: records,
    })
}
