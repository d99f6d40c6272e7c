//! Output: record assembly, validation and YAML persistence

pub mod emission;
pub mod record;
pub mod serialize;
pub mod validate;

pub use emission::build_document;
pub use record::{
    ConceptCandidate, ConceptCandidatesDocument, MentionContribution, TitleIndexEvidence, OUTPUT_STAGE,
};
pub use serialize::{check_artifact_path, serialize_yaml, validate_document, write_json, write_yaml};
pub use validate::validate_output;
