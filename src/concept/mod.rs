//! Concept keys, lifting and the candidate accumulator

pub mod accumulator;
pub mod canonical;
pub mod lifting;
pub mod morphology;

pub use accumulator::{Candidate, CandidateTable, RoleBucket, RoleCounts};
pub use canonical::{
    canonical_parts, canonicalize_surface, concept_id_from_canonical, normalize_lifted_surface,
    CONCEPT_ID_PREFIX,
};
pub use lifting::{
    derive_lifted_surface, is_eligible_mention, should_lift_mention,
    should_skip_derived_single_token, LiftCache, LiftInfo,
};
pub use morphology::{
    is_nominal_tag, should_reject_alias_canonical, singularize_canonical, singularize_token_part,
};
