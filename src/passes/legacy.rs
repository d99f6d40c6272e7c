//! Legacy domain enrichment, off by default
//!
//! Hard-coded vocabulary from an earlier SaaS-domain run: a nominal verb
//! whitelist for eligibility, a generic drop list for pruning, an acronym
//! alias hook and a rule table that fuses known component pairs into
//! compound concepts. Rules are data, applied in order against the live
//! table; sources are never removed.

use crate::concept::CandidateTable;
use crate::diagnostics::DecisionTrace;

pub const SOURCE_TAG: &str = "legacy";

/// Verb forms admitted as mention heads when legacy enrichment is on
pub const NOMINAL_VERB_WHITELIST: &[&str] = &[
    "run", "runs", "schedule", "schedules", "trigger", "triggers", "issue", "issues", "collection",
    "collections",
];

/// Canonicals pruned outright when legacy enrichment is on
pub const GENERIC_DROP: &[&str] = &[
    "system", "valid", "present", "change", "reference", "irs", "request", "generator", "that",
    "which", "i_e", "represented", "modeled", "complemented", "derived", "making",
    "classic_saas_system", "common_objects", "three_classes", "coarse_baseline",
    "typical_composition", "standard_baseline", "business_work_objects", "optional_designation",
    "specific_project", "concrete_instance",
];

pub fn is_generic_drop(canonical: &str) -> bool {
    GENERIC_DROP.contains(&canonical)
}

/// Acronym families collapsed onto their bare acronym
const ACRONYM_FAMILIES: &[&str] = &["abac"];

/// Alias target for a multi-part canonical led by a known acronym
pub fn acronym_alias_target(parts: &[&str]) -> Option<&'static str> {
    if parts.len() < 2 {
        return None;
    }
    ACRONYM_FAMILIES.iter().copied().find(|family| parts[0] == *family)
}

/// One enrichment rule.
///
/// Each `sources` group resolves to its first live canonical; every group
/// must resolve. `absent` keys must all be missing and each `require_any`
/// group must have at least one live key.
#[derive(Debug, Clone, Copy)]
pub struct LegacyRule {
    pub target: &'static str,
    pub sources: &'static [&'static [&'static str]],
    pub absent: &'static [&'static str],
    pub require_any: &'static [&'static [&'static str]],
}

impl LegacyRule {
    const fn merge(target: &'static str, sources: &'static [&'static [&'static str]]) -> Self {
        Self {
            target,
            sources,
            absent: &[],
            require_any: &[],
        }
    }

    const fn seed(
        target: &'static str,
        sources: &'static [&'static [&'static str]],
        absent: &'static [&'static str],
    ) -> Self {
        Self {
            target,
            sources,
            absent,
            require_any: &[],
        }
    }

    const fn requiring(mut self, require_any: &'static [&'static [&'static str]]) -> Self {
        self.require_any = require_any;
        self
    }

    /// Resolved source keys, or `None` when the rule does not apply
    pub fn resolve(&self, table: &CandidateTable) -> Option<Vec<&'static str>> {
        if self.absent.iter().any(|k| table.contains(k)) {
            return None;
        }
        if !self
            .require_any
            .iter()
            .all(|group| group.iter().any(|k| table.contains(k)))
        {
            return None;
        }
        self.sources
            .iter()
            .map(|group| group.iter().copied().find(|k| table.contains(k)))
            .collect()
    }
}

const SEAT_PLAN_KEYS: &[&str] = &["subscription", "plan", "entitlement"];
const LIMIT_USAGE_KEYS: &[&str] = &["usage", "metering", "entitlement"];

pub const MAIN_RULES: &[LegacyRule] = &[
    LegacyRule::merge("usage_metering", &[&["usage"], &["metering", "meter"]]),
    LegacyRule::merge("payment_transaction", &[&["payment"], &["transaction", "transactions"]]),
    LegacyRule::merge("role_assignment", &[&["role"], &["assignment", "assignments"]]),
    LegacyRule::merge("feature_flag", &[&["feature"], &["feature_switch", "feature_switches"]]),
    LegacyRule::merge("seat_license", &[&["seat"], &["license", "licenses"]]),
    LegacyRule::merge("rate_limit_quota", &[&["rate"], &["limit"], &["quota"]]),
    LegacyRule::merge("document_item", &[&["document"], &["item", "items"]]),
    LegacyRule::merge("file_attachment", &[&["file"], &["attachment", "attachments"]]),
    LegacyRule::merge("folder_collection", &[&["folder", "folders"], &["collection", "collections"]]),
    LegacyRule::merge("workflow_pipeline", &[&["workflow", "workflows"], &["pipeline", "pipelines"]]),
    LegacyRule::merge("job_run", &[&["job", "jobs"], &["run", "runs"]]),
    LegacyRule::merge("schedule_trigger", &[&["schedule", "schedules"], &["trigger", "triggers"]]),
    LegacyRule::merge("comment_note", &[&["comment", "comments"], &["note", "notes"]]),
    LegacyRule::merge(
        "task_ticket_issue",
        &[&["task", "tasks"], &["ticket", "tickets"], &["issue", "issues"]],
    ),
    LegacyRule::merge("approval_review", &[&["approval", "approvals"], &["review", "reviews"]]),
    LegacyRule::merge("ownership", &[&["owner"]]),
    LegacyRule::merge("data_classification", &[&["data"], &["classification"]]),
    LegacyRule::merge("seat_license", &[&["seat"], SEAT_PLAN_KEYS]),
    LegacyRule::merge("rate_limit_quota", &[&["limit"], LIMIT_USAGE_KEYS]),
    LegacyRule::seed("schedule", &[&["workflow", "workflows"]], &["schedule"]),
    LegacyRule::seed("trigger", &[&["event"]], &["trigger"]),
    LegacyRule::seed("issue", &[&["task", "tasks"], &["ticket", "tickets"]], &["issue"]),
    LegacyRule::merge("schedule_trigger", &[&["schedule", "schedules"], &["trigger", "triggers"]]),
    LegacyRule::merge(
        "task_ticket_issue",
        &[&["task", "tasks"], &["ticket", "tickets"], &["issue", "issues"]],
    ),
];

/// Extra rules that seed missing components before fusing them
pub const RECOVERY_RULES: &[LegacyRule] = &[
    LegacyRule::seed("run", &[&["job", "jobs"]], &["run", "runs"]),
    LegacyRule::seed("collection", &[&["folder", "folders"]], &["collection"]),
    LegacyRule::merge("job_run", &[&["job", "jobs"], &["run", "runs"]]),
    LegacyRule::merge("folder_collection", &[&["folder", "folders"], &["collection", "collections"]]),
    LegacyRule::seed("license", &[&["seat"]], &["license", "licenses"]).requiring(&[SEAT_PLAN_KEYS]),
    LegacyRule::seed("rate", &[&["limit"]], &["rate"]).requiring(&[LIMIT_USAGE_KEYS]),
    LegacyRule::seed("quota", &[&["limit"]], &["quota"]).requiring(&[LIMIT_USAGE_KEYS]),
    LegacyRule::merge("seat_license", &[&["seat"], &["license", "licenses"]]),
    LegacyRule::merge("rate_limit_quota", &[&["rate"], &["limit"], &["quota"]]),
];

fn apply_rules(rules: &[LegacyRule], table: &mut CandidateTable, trace: &mut DecisionTrace) -> usize {
    let mut applied = 0;
    for rule in rules {
        let Some(sources) = rule.resolve(table) else {
            continue;
        };
        table.ensure(rule.target);
        for source in sources {
            table.merge(rule.target, source);
        }
        trace.mark_source(rule.target, SOURCE_TAG);
        applied += 1;
    }
    applied
}

/// Apply the main table, then the recovery table when enabled. Returns the
/// number of rules that fired.
pub fn apply(table: &mut CandidateTable, trace: &mut DecisionTrace, recovery: bool) -> usize {
    let mut applied = apply_rules(MAIN_RULES, table, trace);
    if recovery {
        applied += apply_rules(RECOVERY_RULES, table, trace);
    }
    applied
}
