//! Candidate accumulator: the mutable canonical → evidence table
//!
//! Passes insert, grow, merge and delete entries in place. The table keeps
//! insertion order because pruning walks candidates in the order they were
//! first created; everything emitted is re-sorted by canonical.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One of the six role-usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleBucket {
    Actor,
    Theme,
    Attr,
    Topic,
    Location,
    Other,
}

impl RoleBucket {
    /// Map an assertion role to its bucket; `exemplifies` carries no role.
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "exemplifies" => None,
            "actor" => Some(RoleBucket::Actor),
            "theme" => Some(RoleBucket::Theme),
            "attr" | "attribute" => Some(RoleBucket::Attr),
            "topic" => Some(RoleBucket::Topic),
            "location" => Some(RoleBucket::Location),
            _ => Some(RoleBucket::Other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleBucket::Actor => "actor",
            RoleBucket::Theme => "theme",
            RoleBucket::Attr => "attr",
            RoleBucket::Topic => "topic",
            RoleBucket::Location => "location",
            RoleBucket::Other => "other",
        }
    }
}

/// Role-usage counters in emission key order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub actor: u64,
    pub theme: u64,
    pub attr: u64,
    pub topic: u64,
    pub location: u64,
    pub other: u64,
}

impl RoleCounts {
    /// Key names in emission order
    pub const KEYS: [&'static str; 6] = ["actor", "theme", "attr", "topic", "location", "other"];

    pub fn increment(&mut self, bucket: RoleBucket) {
        *self.slot(bucket) += 1;
    }

    fn slot(&mut self, bucket: RoleBucket) -> &mut u64 {
        match bucket {
            RoleBucket::Actor => &mut self.actor,
            RoleBucket::Theme => &mut self.theme,
            RoleBucket::Attr => &mut self.attr,
            RoleBucket::Topic => &mut self.topic,
            RoleBucket::Location => &mut self.location,
            RoleBucket::Other => &mut self.other,
        }
    }

    pub fn add(&mut self, other: &RoleCounts) {
        self.actor += other.actor;
        self.theme += other.theme;
        self.attr += other.attr;
        self.topic += other.topic;
        self.location += other.location;
        self.other += other.other;
    }

    pub fn total(&self) -> u64 {
        self.actor + self.theme + self.attr + self.topic + self.location + self.other
    }

    /// Everything except `other`
    pub fn core_total(&self) -> u64 {
        self.total() - self.other
    }
}

/// Evidence gathered under one canonical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub canonical: String,
    pub surfaces: BTreeSet<String>,
    pub mention_ids: BTreeSet<String>,
    pub assertion_ids: BTreeSet<String>,
    pub roles: RoleCounts,
}

impl Candidate {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            surfaces: BTreeSet::new(),
            mention_ids: BTreeSet::new(),
            assertion_ids: BTreeSet::new(),
            roles: RoleCounts::default(),
        }
    }

    /// Absorb another candidate's evidence.
    pub fn absorb(&mut self, source: &Candidate) {
        self.surfaces.extend(source.surfaces.iter().cloned());
        self.mention_ids.extend(source.mention_ids.iter().cloned());
        self.assertion_ids.extend(source.assertion_ids.iter().cloned());
        self.roles.add(&source.roles);
    }
}

/// Insertion-ordered map from canonical key to candidate
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    slots: Vec<Option<Candidate>>,
    positions: HashMap<String, usize>,
}

impl CandidateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.positions.contains_key(canonical)
    }

    pub fn get(&self, canonical: &str) -> Option<&Candidate> {
        self.positions.get(canonical).and_then(|&i| self.slots[i].as_ref())
    }

    pub fn get_mut(&mut self, canonical: &str) -> Option<&mut Candidate> {
        match self.positions.get(canonical) {
            Some(&i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    /// Existing candidate, or a fresh empty one appended at the end.
    pub fn ensure(&mut self, canonical: &str) -> &mut Candidate {
        let i = match self.positions.get(canonical) {
            Some(&i) => i,
            None => {
                self.slots.push(Some(Candidate::new(canonical)));
                let i = self.slots.len() - 1;
                self.positions.insert(canonical.to_string(), i);
                i
            }
        };
        self.slots[i].get_or_insert_with(|| Candidate::new(canonical))
    }

    pub fn remove(&mut self, canonical: &str) -> Option<Candidate> {
        let i = self.positions.remove(canonical)?;
        self.slots[i].take()
    }

    /// Merge `source` into `target`, creating the target if needed. The
    /// source stays in place. Returns false when the source is absent or
    /// the two keys are the same.
    pub fn merge(&mut self, target: &str, source: &str) -> bool {
        if target == source {
            return false;
        }
        let Some(source) = self.get(source).cloned() else {
            return false;
        };
        self.ensure(target).absorb(&source);
        true
    }

    /// Live canonicals in insertion order
    pub fn canonicals(&self) -> Vec<String> {
        self.iter().map(|c| c.canonical.clone()).collect()
    }

    /// Live canonicals ascending
    pub fn sorted_canonicals(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.positions.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Live candidates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.slots.iter().flatten()
    }
}
