//! Creates missing project files for failed structlint rules.

pub mod content;
pub mod fixer;
pub mod hooks;
pub mod multi;
pub mod plugin;
pub mod templates;

pub use content::{ContentGenerator, ContentSource};
pub use fixer::{
    AutoConfirm, Change, ChangeKind, Confirmer, FixContext, FixOptions, FixPlan, FixResult,
    FixStatus, FixSummary, Fixer, TerminalConfirmer,
};
pub use hooks::{ExampleTestHook, GitKeepHook, PostCreateHook};
pub use multi::GeneratedFile;
pub use plugin::FixPlugin;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FixError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Confirmation failed: {0}")]
    Prompt(String),

    #[error("{failed} of {total} fixes failed")]
    Incomplete { failed: usize, total: usize },
}
