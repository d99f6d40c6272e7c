//! Ordered suppression rules; the first rule that applies wins.

use super::metrics::CandidateMetrics;
use crate::config::ExtendedThresholds;
use crate::diagnostics::GenerationStats;

/// Non-nominal share that makes a low-evidence unlinked candidate suspect
const LOW_EVIDENCE_NON_NOMINAL_MIN: f64 = 0.25;
/// Share of participial mentions that marks a fragment or a chunk reduction
const PARTICIPIAL_SHARE_MIN: f64 = 0.8;
const SHORT_SYMBOLIC_SHARE_MIN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    LowEvidenceUnlinked,
    NonNominalWeakEvidence,
    ParticipialFragment,
    ParticipialChunkReduction,
    TwoTokenParticipialLift,
    ShortSymbolicToken,
}

impl Suppression {
    /// Evaluation order
    pub const ORDERED: [Suppression; 6] = [
        Suppression::LowEvidenceUnlinked,
        Suppression::NonNominalWeakEvidence,
        Suppression::ParticipialFragment,
        Suppression::ParticipialChunkReduction,
        Suppression::TwoTokenParticipialLift,
        Suppression::ShortSymbolicToken,
    ];

    /// Policy tag recorded in diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            Suppression::LowEvidenceUnlinked => "suppress_low_wikipedia_count_unlinked",
            Suppression::NonNominalWeakEvidence => "suppress_nonnominal_weak_wikipedia_count",
            Suppression::ParticipialFragment => "suppress_participial_fragment",
            Suppression::ParticipialChunkReduction => "suppress_participial_chunk_reduction",
            Suppression::TwoTokenParticipialLift => "suppress_two_token_participial_lift",
            Suppression::ShortSymbolicToken => "suppress_short_symbolic_token",
        }
    }

    pub fn applies(&self, canonical: &str, m: &CandidateMetrics, t: &ExtendedThresholds) -> bool {
        let unlinked = m.role_total == 0 && m.assertion_count == 0;
        let weakly_linked = m.core_role_total == 0 && m.role_total <= 1 && m.assertion_count <= 1;
        match self {
            Suppression::LowEvidenceUnlinked => {
                unlinked
                    && m.avg_wikipedia_count < t.low_evidence_unlinked_min_avg
                    && m.non_nominal_share >= LOW_EVIDENCE_NON_NOMINAL_MIN
            }
            Suppression::NonNominalWeakEvidence => {
                unlinked
                    && m.non_nominal_share >= t.non_nominal_share_min
                    && m.avg_wikipedia_count < t.non_nominal_weak_max
            }
            Suppression::ParticipialFragment => {
                m.participial_fragment_share >= PARTICIPIAL_SHARE_MIN && weakly_linked
            }
            Suppression::ParticipialChunkReduction => {
                m.participial_chunk_reduction_share >= PARTICIPIAL_SHARE_MIN && weakly_linked
            }
            Suppression::TwoTokenParticipialLift => {
                m.two_token_participial_share >= PARTICIPIAL_SHARE_MIN
                    && m.core_role_total == 0
                    && m.assertion_count == 0
            }
            Suppression::ShortSymbolicToken => {
                unlinked
                    && m.short_symbolic_share >= SHORT_SYMBOLIC_SHARE_MIN
                    && m.punctuated_share >= SHORT_SYMBOLIC_SHARE_MIN
                    && m.core_role_total == 0
                    && canonical.len() <= 3
                    && canonical.contains('_')
            }
        }
    }

    /// Bump the rule's own counter and the overall suppression count.
    pub fn count(&self, stats: &mut GenerationStats) {
        stats.extended_suppressed_candidates += 1;
        let counter = match self {
            Suppression::LowEvidenceUnlinked => &mut stats.extended_suppressed_low_wikipedia_count_unlinked,
            Suppression::NonNominalWeakEvidence => &mut stats.extended_suppressed_non_nominal_bias,
            Suppression::ParticipialFragment => &mut stats.extended_suppressed_participial_fragment,
            Suppression::ParticipialChunkReduction => &mut stats.extended_suppressed_participial_chunk_reduction,
            Suppression::TwoTokenParticipialLift => &mut stats.extended_suppressed_two_token_participial_lift,
            Suppression::ShortSymbolicToken => &mut stats.extended_suppressed_short_symbolic_token,
        };
        *counter += 1;
    }

    /// First rule that applies, in evaluation order
    pub fn first_match(canonical: &str, m: &CandidateMetrics, t: &ExtendedThresholds) -> Option<Suppression> {
        Self::ORDERED.into_iter().find(|rule| rule.applies(canonical, m, t))
    }
}
