//! Generation orchestration
//!
//! `build_concept_candidates` is the pure core: one validated Step12
//! document in, one validated candidates document out. `generate_for_step12_path`
//! wraps it with loading and the persisted-run metadata; writing stays with
//! the caller.

use crate::config::GenerationOptions;
use crate::diagnostics::{Diagnostics, MetaSidecar};
use crate::emit::{build_document, serialize_yaml, validate_document, write_json, write_yaml, ConceptCandidatesDocument};
use crate::error::ConceptResult;
use crate::passes::{alias, extended, prune, role, supplemental, GenerationState};
use crate::signals::EvidenceMaps;
use crate::step12::{load_step12_path, validate_contract, DocumentIndex, Step12Document};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Default artifact name, written next to the Step12 input
pub const DEFAULT_OUTPUT_FILE: &str = "seed.concept-candidates.yaml";

/// Result of one generation
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub document: ConceptCandidatesDocument,
    /// Present only when `collect_diagnostics` is set
    pub diagnostics: Option<Diagnostics>,
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// Derive concept candidates from a Step12 document.
pub fn build_concept_candidates(doc: &Step12Document, options: &GenerationOptions) -> ConceptResult<GenerationOutput> {
    let started = Instant::now();
    options.validate()?;
    validate_contract(doc)?;

    let index = DocumentIndex::build(doc);
    let evidence = EvidenceMaps::build(doc)?;
    let mut state = GenerationState::new(&index, &evidence, options);

    let phase = Instant::now();
    role::run(&mut state)?;
    state.stats.phase_ms.role_lifting = elapsed_ms(phase);

    let phase = Instant::now();
    if options.enable_supplemental {
        supplemental::run(&mut state)?;
    }
    if options.mode.is_extended() {
        let filter = Instant::now();
        extended::run(&mut state)?;
        state.stats.phase_ms.extended_filter = elapsed_ms(filter);
    }
    state.stats.phase_ms.supplemental_lifting = elapsed_ms(phase);

    let phase = Instant::now();
    prune::run(&mut state);
    state.stats.phase_ms.prune = elapsed_ms(phase);

    if options.enable_alias_synthesis {
        let phase = Instant::now();
        alias::run(&mut state);
        state.stats.phase_ms.alias_and_legacy = elapsed_ms(phase);
    }

    let phase = Instant::now();
    let document = build_document(&state.table, doc, &evidence, options)?;
    validate_document(&document)?;
    state.stats.phase_ms.emit = elapsed_ms(phase);
    state.stats.phase_ms.total = elapsed_ms(started);

    info!(
        seed_id = %document.seed_id,
        mode = options.mode.as_str(),
        candidates = document.len(),
        "generated concept candidates"
    );

    let diagnostics = options
        .collect_diagnostics
        .then(|| Diagnostics::from_trace(state.trace, state.stats));
    Ok(GenerationOutput { document, diagnostics })
}

/// A generation run over a persisted Step12 artifact
#[derive(Debug, Clone)]
pub struct PersistedRun {
    pub input_path: PathBuf,
    pub seed_dir: PathBuf,
    pub yaml: String,
    pub output: GenerationOutput,
    pub meta: MetaSidecar,
}

impl PersistedRun {
    /// `<step12 dir>/seed.concept-candidates.yaml`
    pub fn default_output_path(&self) -> PathBuf {
        self.seed_dir.join(DEFAULT_OUTPUT_FILE)
    }

    pub fn candidate_count(&self) -> usize {
        self.output.document.len()
    }

    /// Write the artifact and, when paths are given, the sidecars.
    pub fn write(&self, out: &Path, diag_out: Option<&Path>, meta_out: Option<&Path>) -> ConceptResult<()> {
        write_yaml(out, &self.yaml)?;
        if let (Some(path), Some(diagnostics)) = (diag_out, self.output.diagnostics.as_ref()) {
            write_json(path, diagnostics)?;
        }
        if let Some(path) = meta_out {
            write_json(path, &self.meta)?;
        }
        Ok(())
    }
}

/// Load a persisted Step12 document and generate its candidates.
pub fn generate_for_step12_path(path: impl AsRef<Path>, options: &GenerationOptions) -> ConceptResult<PersistedRun> {
    let (input_path, doc) = load_step12_path(path)?;
    let output = build_concept_candidates(&doc, options)?;
    let yaml = serialize_yaml(&output.document)?;
    let seed_dir = input_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let meta = MetaSidecar::new(doc.seed_id(), options);
    Ok(PersistedRun {
        input_path,
        seed_dir,
        yaml,
        output,
        meta,
    })
}
