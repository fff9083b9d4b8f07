//! Rule registry, configuration and execution engine for structlint.

pub mod config;
pub mod engine;
pub mod model;
pub mod pattern;
pub mod plugin;
pub mod probe;
pub mod registry;
pub mod report;
pub mod validators;

pub use config::{load_context, LintConfig, RuleOverride, CONFIG_FILE_NAMES};
pub use engine::RuleEngine;
pub use model::{
    ActiveRule, Context, ExecutionResult, RuleResult, Severity, Status, Summary,
    ANY_PROJECT_TYPE,
};
pub use pattern::{fix_kind, resolve_type, PatternKind};
pub use plugin::{CheckPlugin, RulesPlugin};
pub use probe::{FileStat, OsProbe, Probe, Stat};
pub use registry::{Category, FixSpec, FolderSeed, MultiFileKind, Rule, RuleRegistry};
pub use report::{fail_threshold_met, FailOn, Reporter};

use std::path::PathBuf;
use structlint_project::ProjectError;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("no active rules configured")]
    NoActiveRules,

    #[error("Invalid severity '{value}' for rule '{rule}' (expected error, warning or info)")]
    InvalidSeverity { rule: String, value: String },

    #[error("Unsupported configuration version {0} (expected {})", config::CONFIG_VERSION)]
    UnsupportedVersion(u32),

    #[error("Failed to read configuration {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Returned by `check` when the failure threshold is met.
#[derive(Debug, thiserror::Error)]
#[error("check failed: {errors} error(s), {warnings} warning(s)")]
pub struct CheckFailed {
    pub errors: usize,
    pub warnings: usize,
}
