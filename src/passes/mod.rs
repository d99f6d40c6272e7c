//! Generation passes over the shared candidate table
//!
//! Every pass takes the same `GenerationState` by mutable reference and may
//! insert, grow, merge or delete table entries. Nothing is rebuilt from
//! scratch between passes.
//!
//! Order: role linking, supplemental lifting, extended policy (mode
//! permitting), pruning, alias synthesis (with the legacy rule table behind
//! its own flag).

pub mod alias;
pub mod extended;
pub mod legacy;
pub mod prune;
pub mod role;
pub mod supplemental;

use crate::concept::{CandidateTable, LiftCache, RoleCounts};
use crate::config::GenerationOptions;
use crate::diagnostics::{DecisionTrace, GenerationStats};
use crate::signals::EvidenceMaps;
use crate::step12::DocumentIndex;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Role usage recorded for one mention across all assertions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleLink {
    pub assertion_ids: BTreeSet<String>,
    pub role_counts: RoleCounts,
}

/// Role links keyed by mention id, iterable in first-link order
#[derive(Debug, Clone, Default)]
pub struct RoleLinks {
    order: Vec<String>,
    links: HashMap<String, RoleLink>,
}

impl RoleLinks {
    pub fn entry(&mut self, mention_id: &str) -> &mut RoleLink {
        if !self.links.contains_key(mention_id) {
            self.order.push(mention_id.to_string());
        }
        self.links.entry(mention_id.to_string()).or_default()
    }

    pub fn get(&self, mention_id: &str) -> Option<&RoleLink> {
        self.links.get(mention_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleLink)> {
        self.order
            .iter()
            .filter_map(|id| self.links.get(id).map(|link| (id.as_str(), link)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Everything the passes read and mutate during one generation
pub struct GenerationState<'a> {
    pub index: &'a DocumentIndex<'a>,
    pub evidence: &'a EvidenceMaps,
    pub options: &'a GenerationOptions,
    pub lifts: LiftCache<'a>,
    pub table: CandidateTable,
    pub trace: DecisionTrace,
    pub stats: GenerationStats,
    /// Mentions already accumulated by role linking or promotion
    pub selected: HashSet<String>,
    pub role_links: RoleLinks,
}

impl<'a> GenerationState<'a> {
    pub fn new(index: &'a DocumentIndex<'a>, evidence: &'a EvidenceMaps, options: &'a GenerationOptions) -> Self {
        let doc = index.document();
        let stats = GenerationStats {
            mode: options.mode.as_str().to_string(),
            mentions_total: doc.mentions().len() as u64,
            assertions_total: doc.assertions().len() as u64,
            ..Default::default()
        };
        Self {
            index,
            evidence,
            options,
            lifts: LiftCache::new(),
            table: CandidateTable::new(),
            trace: DecisionTrace::new(),
            stats,
            selected: HashSet::new(),
            role_links: RoleLinks::default(),
        }
    }

    /// Verbs admitted as nominal heads; empty unless legacy enrichment is on
    pub fn verb_whitelist(&self) -> &'static [&'static str] {
        if self.options.enable_legacy_enrichment {
            legacy::NOMINAL_VERB_WHITELIST
        } else {
            &[]
        }
    }

    /// Summed count signals of a mention under the configured policy
    pub fn count_total(&self, mention_id: &str) -> u64 {
        self.evidence.count_total(mention_id, self.options.evidence_policy)
    }
}
