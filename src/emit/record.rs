//! Output record types
//!
//! Field declaration order is the emitted key order; signal maps are
//! `BTreeMap`s so their keys come out sorted.

use crate::concept::RoleCounts;
use crate::signals::{ContributionSource, SignalBucket};
use serde::{Deserialize, Serialize};

/// Stage literal of the output document
pub const OUTPUT_STAGE: &str = "concept_candidates";

/// Top-level keys in emission order
pub const TOP_LEVEL_KEYS: [&str; 4] = ["schema_version", "seed_id", "stage", "concept_candidates"];

/// Candidate keys in emission order, evidence trace excluded
pub const CANDIDATE_KEYS: [&str; 7] = [
    "concept_id",
    "canonical",
    "surfaces",
    "mention_ids",
    "assertion_ids",
    "roles",
    "wikipedia_title_index",
];

pub const EVIDENCE_KEY: &str = "wikipedia_title_index_evidence";

/// What one mention contributed to its candidate's title index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionContribution {
    pub mention_id: String,
    pub source: ContributionSource,
    pub assertion_signals: SignalBucket,
    pub lexicon_signals: SignalBucket,
    pub selected_signals: SignalBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleIndexEvidence {
    pub wikipedia_title_index_policy: String,
    pub mention_contributions: Vec<MentionContribution>,
}

/// One emitted concept candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptCandidate {
    pub concept_id: String,
    pub canonical: String,
    pub surfaces: Vec<String>,
    pub mention_ids: Vec<String>,
    pub assertion_ids: Vec<String>,
    pub roles: RoleCounts,
    pub wikipedia_title_index: SignalBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_title_index_evidence: Option<TitleIndexEvidence>,
}

/// The concept candidates document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptCandidatesDocument {
    pub schema_version: String,
    pub seed_id: String,
    pub stage: String,
    pub concept_candidates: Vec<ConceptCandidate>,
}

impl ConceptCandidatesDocument {
    pub fn len(&self) -> usize {
        self.concept_candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concept_candidates.is_empty()
    }

    pub fn get(&self, canonical: &str) -> Option<&ConceptCandidate> {
        self.concept_candidates.iter().find(|c| c.canonical == canonical)
    }

    pub fn canonicals(&self) -> Vec<&str> {
        self.concept_candidates.iter().map(|c| c.canonical.as_str()).collect()
    }
}
