//! Generation options: policy mode, evidence selection, thresholds and toggles
//!
//! Options are plain data with defaults. They can be built in code with the
//! `with_*` methods or loaded from a YAML file, and are validated once at the
//! boundary before any pass runs.

use crate::error::{ConceptError, ConceptResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which rule layers run after primary aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Lift, prune and alias only
    Base,
    /// Adds promotion, suppression and containment resolution
    #[default]
    Extended,
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::Base => "base",
            PolicyMode::Extended => "extended",
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, PolicyMode::Extended)
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyMode {
    type Err = ConceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(PolicyMode::Base),
            "extended" => Ok(PolicyMode::Extended),
            other => Err(ConceptError::InvalidConfig(format!("Invalid mode: {}", other))),
        }
    }
}

/// Which per-mention title-index bucket feeds aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidencePolicy {
    AssertionOnly,
    #[default]
    AssertionThenLexiconFallback,
}

impl EvidencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidencePolicy::AssertionOnly => "assertion_only",
            EvidencePolicy::AssertionThenLexiconFallback => "assertion_then_lexicon_fallback",
        }
    }
}

impl fmt::Display for EvidencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidencePolicy {
    type Err = ConceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assertion_only" => Ok(EvidencePolicy::AssertionOnly),
            "assertion_then_lexicon_fallback" => Ok(EvidencePolicy::AssertionThenLexiconFallback),
            other => Err(ConceptError::InvalidConfig(format!(
                "Invalid wikipedia_title_index_policy: {}",
                other
            ))),
        }
    }
}

/// Numeric knobs of the extended policy engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtendedThresholds {
    /// Minimum summed count for promoting a role-linked bare verb
    pub verb_promotion_min_count: f64,
    /// Minimum summed count for promoting an unlinked finite verb
    pub unlinked_verb_promotion_min_count: f64,
    /// Unlinked candidates averaging below this are suppressed
    pub low_evidence_unlinked_min_avg: f64,
    /// Non-nominal share at or above which weak candidates are suppressed
    pub non_nominal_share_min: f64,
    /// Average count ceiling for the non-nominal suppression rule
    pub non_nominal_weak_max: f64,
    /// Host-to-candidate average ratio required for a containment merge
    pub merge_host_min_ratio: f64,
}

impl Default for ExtendedThresholds {
    fn default() -> Self {
        Self {
            verb_promotion_min_count: 1.0,
            unlinked_verb_promotion_min_count: 80.0,
            low_evidence_unlinked_min_avg: 0.5,
            non_nominal_share_min: 0.5,
            non_nominal_weak_max: 1.5,
            merge_host_min_ratio: 1.0,
        }
    }
}

impl ExtendedThresholds {
    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("verb_promotion_min_count", self.verb_promotion_min_count),
            ("unlinked_verb_promotion_min_count", self.unlinked_verb_promotion_min_count),
            ("low_evidence_unlinked_min_avg", self.low_evidence_unlinked_min_avg),
            ("non_nominal_share_min", self.non_nominal_share_min),
            ("non_nominal_weak_max", self.non_nominal_weak_max),
            ("merge_host_min_ratio", self.merge_host_min_ratio),
        ]
    }

    /// Reject negative or non-finite values.
    pub fn validate(&self) -> ConceptResult<()> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConceptError::InvalidConfig(format!("Invalid {}: {}", name, value)));
            }
        }
        Ok(())
    }
}

/// Full option set for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    pub mode: PolicyMode,
    pub evidence_policy: EvidencePolicy,
    pub thresholds: ExtendedThresholds,
    pub enable_supplemental: bool,
    pub enable_alias_synthesis: bool,
    pub enable_legacy_enrichment: bool,
    /// Only honored together with `enable_legacy_enrichment`
    pub enable_recovery_synthesis: bool,
    pub emit_evidence_trace: bool,
    pub collect_diagnostics: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            mode: PolicyMode::default(),
            evidence_policy: EvidencePolicy::default(),
            thresholds: ExtendedThresholds::default(),
            enable_supplemental: true,
            enable_alias_synthesis: true,
            enable_legacy_enrichment: false,
            enable_recovery_synthesis: false,
            emit_evidence_trace: true,
            collect_diagnostics: false,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML file; absent keys keep their defaults.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> ConceptResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options: GenerationOptions = serde_yaml::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_mode(mut self, mode: PolicyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_evidence_policy(mut self, policy: EvidencePolicy) -> Self {
        self.evidence_policy = policy;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ExtendedThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_supplemental(mut self, enabled: bool) -> Self {
        self.enable_supplemental = enabled;
        self
    }

    pub fn with_alias_synthesis(mut self, enabled: bool) -> Self {
        self.enable_alias_synthesis = enabled;
        self
    }

    pub fn with_legacy_enrichment(mut self, enabled: bool) -> Self {
        self.enable_legacy_enrichment = enabled;
        self
    }

    pub fn with_recovery_synthesis(mut self, enabled: bool) -> Self {
        self.enable_recovery_synthesis = enabled;
        self
    }

    pub fn with_evidence_trace(mut self, enabled: bool) -> Self {
        self.emit_evidence_trace = enabled;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.collect_diagnostics = enabled;
        self
    }

    /// Recovery synthesis is a sub-toggle of legacy enrichment.
    pub fn effective_recovery_synthesis(&self) -> bool {
        self.enable_legacy_enrichment && self.enable_recovery_synthesis
    }

    pub fn validate(&self) -> ConceptResult<()> {
        self.thresholds.validate()
    }
}
