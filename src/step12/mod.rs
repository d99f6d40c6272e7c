//! Step12 input: the elementary-assertions document this crate consumes
//!
//! The document is produced upstream and is read-only here. Loading is
//! lenient about optional fields; `validate_contract` then enforces the
//! shape the passes rely on.

mod contract;
mod index;
mod types;

pub use contract::{parse_semver_major, validate_contract, STEP12_SCHEMA_MAJOR, STEP12_STAGE};
pub use index::DocumentIndex;
pub use types::{
    Assertion, Mention, MentionProvenance, PosTags, RoleEntry, Span, Step12Document, Token,
    TokenFlags,
};

use crate::error::{ConceptError, ConceptResult};
use std::path::{Path, PathBuf};

/// Parse a Step12 document from YAML (JSON is accepted as a YAML subset).
pub fn parse_step12_str(text: &str) -> ConceptResult<Step12Document> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load a persisted Step12 document, returning its absolute path alongside.
pub fn load_step12_path(path: impl AsRef<Path>) -> ConceptResult<(PathBuf, Step12Document)> {
    let path = path.as_ref();
    let input_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if !input_path.exists() {
        return Err(ConceptError::contract(format!(
            "Missing Step 12 artifact: {}",
            input_path.display()
        )));
    }
    let text = std::fs::read_to_string(&input_path)?;
    let doc = parse_step12_str(&text)?;
    Ok((input_path, doc))
}
