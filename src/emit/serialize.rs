//! Deterministic YAML text and persisted-artifact checks

use super::record::ConceptCandidatesDocument;
use super::validate::validate_output;
use crate::error::{ConceptError, ConceptResult};
use serde_yaml::Value;
use std::path::Path;

/// LF line endings and exactly one trailing newline
fn normalize_newlines(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// Serialize a document to its canonical YAML text.
pub fn serialize_yaml(doc: &ConceptCandidatesDocument) -> ConceptResult<String> {
    let text = serde_yaml::to_string(doc)?;
    Ok(normalize_newlines(&text))
}

/// Validate a document by round-tripping it through the generic value form.
pub fn validate_document(doc: &ConceptCandidatesDocument) -> ConceptResult<()> {
    let value = serde_yaml::to_value(doc)?;
    validate_output(&value)
}

/// Write YAML text, creating parent directories as needed.
pub fn write_yaml(path: &Path, yaml: &str) -> ConceptResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Write a JSON sidecar, pretty-printed with a trailing newline.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> ConceptResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_yaml(path, &text)
}

/// Re-validate a persisted artifact. Returns its candidate count.
pub fn check_artifact_path(path: &Path) -> ConceptResult<usize> {
    if !path.exists() {
        return Err(ConceptError::determinism(format!(
            "Missing concept candidates artifact: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&text)?;
    validate_output(&value)?;
    Ok(value
        .get("concept_candidates")
        .and_then(Value::as_sequence)
        .map(Vec::len)
        .unwrap_or(0))
}
