use crate::registry::{Category, Rule};
use crate::validators::Validator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use structlint_project::ProjectInfo;

/// Wildcard key of a rule's pattern table.
pub const ANY_PROJECT_TYPE: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!(
                "Invalid severity '{}'. Valid options are: error, warning, info",
                s
            )),
        }
    }
}

/// A registry rule as configured for this run.
#[derive(Debug, Clone)]
pub struct ActiveRule {
    pub rule: Rule,
    pub severity: Severity,
    pub enabled: bool,
    pub patterns: Option<BTreeMap<String, Vec<String>>>,
    pub message: Option<String>,
    pub min_size: Option<u64>,
}

impl ActiveRule {
    pub fn new(rule: Rule) -> Self {
        Self {
            severity: rule.severity,
            rule,
            enabled: true,
            patterns: None,
            message: None,
            min_size: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn id(&self) -> &str {
        &self.rule.id
    }

    /// Patterns for a project type: exact match, then the `*` fallback.
    ///
    /// `None` means the rule does not apply to this project type.
    pub fn patterns_for(&self, project_type: &str) -> Option<&[String]> {
        let table = self.patterns.as_ref().unwrap_or(&self.rule.patterns);
        table
            .get(project_type)
            .or_else(|| table.get(ANY_PROJECT_TYPE))
            .map(Vec::as_slice)
            .filter(|patterns| !patterns.is_empty())
    }

    pub fn failure_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.rule.message)
    }

    pub fn validator(&self) -> Box<dyn Validator> {
        self.rule.validator.build(self.min_size)
    }
}

/// Per-run input shared read-only by every rule evaluation.
#[derive(Debug, Clone)]
pub struct Context {
    pub project_path: PathBuf,
    pub project_type: String,
    pub project_info: ProjectInfo,
    pub rules: BTreeMap<String, ActiveRule>,
}

impl Context {
    pub fn enabled_rules(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.values().filter(|rule| rule.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub passed: bool,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RuleResult {
    pub fn pass(rule: &ActiveRule, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule.id().to_string(),
            passed: true,
            severity: rule.severity,
            category: rule.rule.category,
            message: message.into(),
            fix_hint: None,
            doc_url: None,
            details: None,
        }
    }

    pub fn fail(rule: &ActiveRule, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            fix_hint: rule.rule.fix_hint.clone(),
            doc_url: rule.rule.doc_url.clone(),
            ..Self::pass(rule, message)
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl Summary {
    pub fn tally(results: &[RuleResult]) -> Self {
        results.iter().fold(
            Summary {
                total: results.len(),
                ..Summary::default()
            },
            |mut summary, result| {
                if result.passed {
                    summary.passed += 1;
                } else {
                    match result.severity {
                        Severity::Error => summary.errors += 1,
                        Severity::Warning => summary.warnings += 1,
                        Severity::Info => summary.info += 1,
                    }
                }
                summary
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Warnings,
    Failed,
}

impl Status {
    pub fn from_summary(summary: &Summary) -> Self {
        if summary.errors > 0 {
            Status::Failed
        } else if summary.warnings > 0 {
            Status::Warnings
        } else {
            Status::Passed
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Warnings => write!(f, "warnings"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub context: Context,
    pub results: Vec<RuleResult>,
    pub summary: Summary,
    pub status: Status,
}

impl ExecutionResult {
    pub fn from_results(context: Context, results: Vec<RuleResult>) -> Self {
        let summary = Summary::tally(&results);
        Self {
            status: Status::from_summary(&summary),
            context,
            results,
            summary,
        }
    }

    /// IDs of failed rules, in result order.
    pub fn failed_rule_ids(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_id.clone())
            .collect()
    }
}
