//! Step12 document model: tokens, mentions, assertions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character span `[start, end)` into the document's canonical text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    pub fn is_valid(&self) -> bool {
        self.start >= 0 && self.end >= self.start
    }

    /// True when `other` lies within this span (inclusive on both ends)
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

/// Part-of-speech tags: fine-grained (`VBZ`) and coarse (`VERB`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTags {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub coarse: String,
}

/// Lexical flags supplied by the tokenizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFlags {
    #[serde(default)]
    pub is_punct: bool,
    #[serde(default)]
    pub is_space: bool,
    #[serde(default)]
    pub is_stop: bool,
}

/// An atomic lexical unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub id: String,
    /// Position index; absent sorts as 0
    #[serde(default)]
    pub i: Option<i64>,
    #[serde(default)]
    pub span: Option<Span>,
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(default)]
    pub normalized: Option<String>,
    #[serde(default)]
    pub pos: PosTags,
    #[serde(default)]
    pub flags: TokenFlags,
}

impl Token {
    pub fn tag(&self) -> &str {
        &self.pos.tag
    }

    pub fn coarse(&self) -> &str {
        &self.pos.coarse
    }

    /// Normalized form, falling back to the surface, lowercased
    pub fn lower(&self) -> String {
        self.normalized
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.surface.as_deref())
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn index(&self) -> i64 {
        self.i.unwrap_or(0)
    }
}

/// Where the upstream pipeline got a mention from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionProvenance {
    #[serde(default)]
    pub source_kind: Option<String>,
    /// Lexicon-carried title-index evidence (arbitrary nesting)
    #[serde(default)]
    pub lexicon_evidence: Option<Value>,
}

/// A reference to a contiguous token span
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(default)]
    pub id: String,
    /// `token`, `chunk` or `mwe`
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub token_ids: Vec<String>,
    #[serde(default)]
    pub head_token_id: Option<String>,
    #[serde(default)]
    pub span: Option<Span>,
    #[serde(default)]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub provenance: Option<MentionProvenance>,
}

impl Mention {
    pub fn source_kind(&self) -> &str {
        self.provenance
            .as_ref()
            .and_then(|p| p.source_kind.as_deref())
            .unwrap_or("")
    }

    pub fn segment(&self) -> &str {
        self.segment_id.as_deref().unwrap_or("")
    }

    pub fn token_count(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_token(&self) -> bool {
        self.kind == "token"
    }

    /// Chunks and multi-word expressions
    pub fn is_phrase(&self) -> bool {
        self.kind == "chunk" || self.kind == "mwe"
    }
}

/// One role slot of an assertion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub mention_ids: Option<Vec<String>>,
}

impl RoleEntry {
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or("")
    }

    pub fn mention_ids(&self) -> &[String] {
        self.mention_ids.as_deref().unwrap_or(&[])
    }
}

/// A predicate instance linking mentions through roles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub arguments: Vec<RoleEntry>,
    #[serde(default)]
    pub modifiers: Vec<RoleEntry>,
    /// Carries `wiki_signals.mention_evidence[]`
    #[serde(default)]
    pub evidence: Option<Value>,
}

impl Assertion {
    /// Arguments first, then modifiers
    pub fn role_entries(&self) -> impl Iterator<Item = &RoleEntry> {
        self.arguments.iter().chain(self.modifiers.iter())
    }
}

/// The upstream elementary-assertions document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step12Document {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub seed_id: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub canonical_text: Option<String>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub mentions: Option<Vec<Mention>>,
    #[serde(default)]
    pub assertions: Option<Vec<Assertion>>,
    #[serde(default)]
    pub wiki_title_evidence: Option<Value>,
}

impl Step12Document {
    pub fn mentions(&self) -> &[Mention] {
        self.mentions.as_deref().unwrap_or(&[])
    }

    pub fn assertions(&self) -> &[Assertion] {
        self.assertions.as_deref().unwrap_or(&[])
    }

    pub fn text(&self) -> &str {
        self.canonical_text.as_deref().unwrap_or("")
    }

    pub fn seed_id(&self) -> &str {
        self.seed_id.as_deref().unwrap_or("")
    }
}
