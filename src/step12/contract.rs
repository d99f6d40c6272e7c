//! Input contract checks for Step12 documents
//!
//! Violations fail loudly; nothing is coerced or defaulted.

use super::types::{RoleEntry, Step12Document};
use crate::error::{ConceptError, ConceptResult};
use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Stage literal the upstream pipeline stamps on its output
pub const STEP12_STAGE: &str = "elementary_assertions";

/// Supported schema major version
pub const STEP12_SCHEMA_MAJOR: u64 = 1;

static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:[-+].*)?$").unwrap());

/// Major component of a SemVer string, if it parses
pub fn parse_semver_major(value: &str) -> Option<u64> {
    let caps = SEMVER_RE.captures(value)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Validate document-level shape, mention ids, and role references.
pub fn validate_contract(doc: &Step12Document) -> ConceptResult<()> {
    let stage = doc.stage.as_deref().unwrap_or("");
    if stage != STEP12_STAGE {
        return Err(ConceptError::contract(format!(
            "Invalid Step 12 stage: {}",
            doc.stage.as_deref().unwrap_or("undefined")
        )));
    }

    let version = doc.schema_version.as_deref().unwrap_or("");
    let major = parse_semver_major(version).ok_or_else(|| {
        ConceptError::contract(format!(
            "Step 12 schema_version must be valid SemVer, got: {}",
            version
        ))
    })?;
    if major != STEP12_SCHEMA_MAJOR {
        return Err(ConceptError::contract(format!(
            "Incompatible Step 12 schema major: {}; expected {}.",
            major, STEP12_SCHEMA_MAJOR
        )));
    }

    let mentions = doc
        .mentions
        .as_ref()
        .ok_or_else(|| ConceptError::contract("Step 12 mentions[] missing."))?;
    let assertions = doc
        .assertions
        .as_ref()
        .ok_or_else(|| ConceptError::contract("Step 12 assertions[] missing."))?;
    if doc.canonical_text.is_none() {
        return Err(ConceptError::contract("Step 12 canonical_text missing."));
    }

    let mut seen = HashSet::with_capacity(mentions.len());
    for mention in mentions {
        if mention.id.is_empty() {
            return Err(ConceptError::contract("Step 12 mention missing non-empty id."));
        }
        if !seen.insert(mention.id.as_str()) {
            return Err(ConceptError::contract(format!(
                "Duplicate mention id in Step 12: {}",
                mention.id
            )));
        }
    }

    for (ai, assertion) in assertions.iter().enumerate() {
        if assertion.id.is_empty() {
            return Err(ConceptError::contract(format!("assertions[{}] missing id.", ai)));
        }
        validate_role_entries(&assertion.arguments, &format!("assertions[{}].arguments", ai), &seen)?;
        validate_role_entries(&assertion.modifiers, &format!("assertions[{}].modifiers", ai), &seen)?;
    }
    Ok(())
}

fn validate_role_entries(entries: &[RoleEntry], path: &str, known: &HashSet<&str>) -> ConceptResult<()> {
    for (i, entry) in entries.iter().enumerate() {
        let ids = entry.mention_ids.as_ref().ok_or_else(|| {
            ConceptError::contract(format!("{}[{}].mention_ids must be string[].", path, i))
        })?;
        for (j, id) in ids.iter().enumerate() {
            if id.is_empty() {
                return Err(ConceptError::contract(format!(
                    "{}[{}].mention_ids[{}] must be non-empty string.",
                    path, i, j
                )));
            }
            if !known.contains(id.as_str()) {
                return Err(ConceptError::contract(format!(
                    "{}[{}].mention_ids[{}] references unknown mention id: {}",
                    path, i, j, id
                )));
            }
        }
    }
    Ok(())
}
