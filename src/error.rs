//! Error taxonomy for concept-candidate generation
//!
//! Every failure is fatal for the invocation: there is no partial output
//! and no degraded mode. Variants group failures by who is at fault
//! (upstream document, canonicalization, hashing, our own output, caller
//! configuration) so callers can report them distinctly.

use thiserror::Error;

/// Errors raised while loading, deriving, validating or writing candidates
#[derive(Debug, Error)]
pub enum ConceptError {
    /// The Step12 document violates its input contract
    #[error("{0}")]
    InputContract(String),

    /// Canonicalization collapsed a surface to nothing
    #[error("Canonicalization produced empty key for surface: {surface:?}")]
    EmptyCanonicalKey { surface: String },

    /// Two distinct canonicals hashed to the same concept id
    #[error("concept_id collision: {concept_id} maps to both {first:?} and {second:?}")]
    ConceptIdCollision {
        concept_id: String,
        first: String,
        second: String,
    },

    /// Emitted document breaks an ordering/shape invariant
    #[error("{0}")]
    Determinism(String),

    /// Caller supplied an unusable option
    #[error("{0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConceptError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        Self::InputContract(message.into())
    }

    pub(crate) fn determinism(message: impl Into<String>) -> Self {
        Self::Determinism(message.into())
    }
}

/// Result type for concept-candidate operations
pub type ConceptResult<T> = Result<T, ConceptError>;
