//! concept_miner: deterministic concept-candidate derivation
//!
//! Reads a persisted Step12 "elementary assertions" document (tokens,
//! mentions, assertions and per-bucket Wikipedia title-index signals) and
//! derives a sorted, schema-validated set of concept candidates.
//!
//! # Pipeline
//!
//! - **Role lifting**: mentions linked from assertion roles become candidates
//! - **Supplemental lifting**: noun-headed mentions with no role link
//! - **Extended policy** (`mode_extended`): verb promotion, suppression and
//!   containment merges driven by per-candidate metrics
//! - **Pruning**, then **alias synthesis** (with optional legacy enrichment)
//! - **Emission** and structural validation
//!
//! The same input and options always produce byte-identical YAML.
//!
//! # Example
//!
//! ```no_run
//! use concept_miner::{generate_for_step12_path, GenerationOptions};
//!
//! let options = GenerationOptions::default();
//! let run = generate_for_step12_path("seed.elementary-assertions.yaml", &options)?;
//! run.write(&run.default_output_path(), None, None)?;
//! # Ok::<(), concept_miner::ConceptError>(())
//! ```

pub mod concept;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod passes;
pub mod pipeline;
pub mod signals;
pub mod step12;

pub use concept::{canonicalize_surface, concept_id_from_canonical};
pub use config::{EvidencePolicy, ExtendedThresholds, GenerationOptions, PolicyMode};
pub use diagnostics::{Diagnostics, MetaSidecar, PERSISTED_STEP12_MODE};
pub use emit::{check_artifact_path, serialize_yaml, validate_output, ConceptCandidate, ConceptCandidatesDocument};
pub use error::{ConceptError, ConceptResult};
pub use pipeline::{build_concept_candidates, generate_for_step12_path, GenerationOutput, PersistedRun};
pub use step12::{load_step12_path, parse_step12_str, Step12Document};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
