//! concept-miner CLI: derive concept candidates from a persisted Step12 artifact.
//!
//! Usage:
//!   concept-miner generate --step12-in <path> [--out <path>] [--print] [options]
//!   concept-miner check <artifact.yaml>

use clap::{Args, Parser, Subcommand};
use concept_miner::{
    check_artifact_path, generate_for_step12_path, EvidencePolicy, GenerationOptions, PolicyMode,
    PERSISTED_STEP12_MODE,
};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "concept-miner",
    version,
    about = "Deterministic concept-candidate derivation from Step12 documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate seed.concept-candidates.yaml from a Step12 artifact
    Generate(GenerateArgs),
    /// Validate a persisted concept candidates artifact
    Check {
        /// Path to the artifact
        artifact: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Step12 elementary-assertions YAML
    #[arg(long = "step12-in")]
    step12_in: PathBuf,
    /// Output path (default: <step12 dir>/seed.concept-candidates.yaml)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Also write the YAML to stdout
    #[arg(long)]
    print: bool,
    /// Diagnostics sidecar (JSON)
    #[arg(long = "diag-out")]
    diag_out: Option<PathBuf>,
    /// Run metadata sidecar (JSON)
    #[arg(long = "meta-out")]
    meta_out: Option<PathBuf>,
    /// YAML options file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    mode: Option<PolicyMode>,
    #[arg(long = "evidence-policy")]
    evidence_policy: Option<EvidencePolicy>,
    #[arg(long = "verb-promotion-min-count")]
    verb_promotion_min_count: Option<f64>,
    #[arg(long = "unlinked-verb-promotion-min-count")]
    unlinked_verb_promotion_min_count: Option<f64>,
    #[arg(long = "low-evidence-unlinked-min-avg")]
    low_evidence_unlinked_min_avg: Option<f64>,
    #[arg(long = "non-nominal-share-min")]
    non_nominal_share_min: Option<f64>,
    #[arg(long = "non-nominal-weak-max")]
    non_nominal_weak_max: Option<f64>,
    #[arg(long = "merge-host-min-ratio")]
    merge_host_min_ratio: Option<f64>,
    #[arg(long = "disable-supplemental")]
    disable_supplemental: bool,
    #[arg(long = "disable-alias-synthesis")]
    disable_alias_synthesis: bool,
    #[arg(long = "enable-legacy-enrichment")]
    enable_legacy_enrichment: bool,
    #[arg(long = "enable-recovery-synthesis")]
    enable_recovery_synthesis: bool,
    #[arg(long = "no-evidence-trace")]
    no_evidence_trace: bool,
}

impl GenerateArgs {
    /// Config file (or defaults) with flags applied on top
    fn options(&self) -> concept_miner::ConceptResult<GenerationOptions> {
        let mut options = match &self.config {
            Some(path) => GenerationOptions::from_yaml_path(path)?,
            None => GenerationOptions::default(),
        };
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(policy) = self.evidence_policy {
            options.evidence_policy = policy;
        }
        let t = &mut options.thresholds;
        let overrides = [
            (&mut t.verb_promotion_min_count, self.verb_promotion_min_count),
            (&mut t.unlinked_verb_promotion_min_count, self.unlinked_verb_promotion_min_count),
            (&mut t.low_evidence_unlinked_min_avg, self.low_evidence_unlinked_min_avg),
            (&mut t.non_nominal_share_min, self.non_nominal_share_min),
            (&mut t.non_nominal_weak_max, self.non_nominal_weak_max),
            (&mut t.merge_host_min_ratio, self.merge_host_min_ratio),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if self.disable_supplemental {
            options.enable_supplemental = false;
        }
        if self.disable_alias_synthesis {
            options.enable_alias_synthesis = false;
        }
        if self.enable_legacy_enrichment {
            options.enable_legacy_enrichment = true;
        }
        if self.enable_recovery_synthesis {
            options.enable_recovery_synthesis = true;
        }
        if self.no_evidence_trace {
            options.emit_evidence_trace = false;
        }
        options.collect_diagnostics = self.diag_out.is_some();
        options.validate()?;
        Ok(options)
    }
}

fn cmd_generate(args: &GenerateArgs) -> i32 {
    let result = args.options().and_then(|options| {
        let run = generate_for_step12_path(&args.step12_in, &options)?;
        let out = args.out.clone().unwrap_or_else(|| run.default_output_path());
        run.write(&out, args.diag_out.as_deref(), args.meta_out.as_deref())?;
        Ok((run, out))
    });
    match result {
        Ok((run, out)) => {
            if args.print {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = stdout.write_all(run.yaml.as_bytes()) {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            }
            eprintln!(
                "Wrote {} ({} candidates, mode={})",
                out.display(),
                run.candidate_count(),
                PERSISTED_STEP12_MODE
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_check(artifact: &PathBuf) -> i32 {
    match check_artifact_path(artifact) {
        Ok(count) => {
            println!("OK {} ({} candidates)", artifact.display(), count);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Generate(args) => cmd_generate(&args),
        Commands::Check { artifact } => cmd_check(&artifact),
    };
    std::process::exit(code);
}
