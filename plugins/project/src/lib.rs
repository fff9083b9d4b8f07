//! Project detection and metadata for structlint.
//!
//! The rule engine and the fixer only see the results of this crate: a project
//! type label and a [`ProjectInfo`] value. Everything here is support code that
//! reads manifests and maintains the optional `.structlint-project.yaml` cache.

pub mod info;
pub mod plugin;

pub use info::{ProjectInfo, PROJECT_CACHE_FILE};
pub use plugin::ProjectPlugin;

use std::path::Path;

pub const GO: &str = "go";
pub const RUST: &str = "rust";
pub const NODEJS: &str = "nodejs";
pub const PYTHON: &str = "python";
pub const JAVA: &str = "java";
pub const GENERIC: &str = "generic";

/// Project types structlint ships patterns and templates for.
pub const KNOWN_PROJECT_TYPES: &[&str] = &[GO, RUST, NODEJS, PYTHON, JAVA, GENERIC];

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid project cache {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown project field '{0}' (expected one of: {})", info::EDITABLE_FIELDS.join(", "))]
    UnknownField(String),
}

/// Detect the ecosystem of the project rooted at `path` from its manifest files.
///
/// Detection order matters for polyglot repositories: the first manifest found wins.
pub fn detect_project_type<P: AsRef<Path>>(path: P) -> &'static str {
    let path = path.as_ref();
    let markers: &[(&str, &'static str)] = &[
        ("go.mod", GO),
        ("Cargo.toml", RUST),
        ("package.json", NODEJS),
        ("pyproject.toml", PYTHON),
        ("setup.py", PYTHON),
        ("requirements.txt", PYTHON),
        ("pom.xml", JAVA),
        ("build.gradle", JAVA),
        ("build.gradle.kts", JAVA),
    ];

    for (marker, project_type) in markers {
        if path.join(marker).is_file() {
            tracing::debug!("Detected project type '{}' from {}", project_type, marker);
            return project_type;
        }
    }

    GENERIC
}
