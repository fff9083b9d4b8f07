//! Classification of rule patterns into files and folders.
//!
//! The engine uses this to pick a probe strategy and the fixer uses it to decide
//! between writing generated content and creating a directory.

use crate::registry::{FixSpec, Rule};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    File,
    Folder,
    Multiple,
}

/// Base names that are always directories.
const KNOWN_FOLDERS: &[&str] = &[
    "src",
    "lib",
    "test",
    "tests",
    "__tests__",
    "spec",
    "docs",
    "doc",
    "adr",
    "decisions",
    "scripts",
    "bin",
    "cmd",
    "internal",
    "pkg",
    "k8s",
    "kubernetes",
    "nginx",
    "deploy",
    "config",
    "examples",
    "workflows",
    "ISSUE_TEMPLATE",
    ".github",
    ".circleci",
    ".husky",
    ".vscode",
];

/// Extensionless base names that are always files.
const KNOWN_FILES: &[&str] = &[
    "Dockerfile",
    "Makefile",
    "LICENSE",
    "COPYING",
    "README",
    "NOTICE",
    "AUTHORS",
    "CHANGELOG",
    "CODEOWNERS",
    "Jenkinsfile",
    "Procfile",
    "Vagrantfile",
    "Gemfile",
    "Rakefile",
    "justfile",
    ".gitignore",
    ".gitattributes",
    ".dockerignore",
    ".editorconfig",
    ".npmrc",
    ".nvmrc",
    ".env",
];

/// Classify a bare pattern string.
///
/// Precedence: trailing `/`, known folder name, extension, known file name,
/// leading dot, and finally folder for anything left.
pub fn resolve_type(pattern: &str) -> PatternKind {
    if pattern.ends_with('/') {
        return PatternKind::Folder;
    }

    let base = base_name(pattern);
    if KNOWN_FOLDERS.contains(&base) {
        return PatternKind::Folder;
    }

    let has_extension = Path::new(base)
        .extension()
        .map(|ext| !ext.is_empty())
        .unwrap_or(false);
    if has_extension {
        return PatternKind::File;
    }

    if KNOWN_FILES.contains(&base) {
        return PatternKind::File;
    }

    if base.starts_with('.') {
        return PatternKind::File;
    }

    PatternKind::Folder
}

/// Classify a pattern for fixing: multi-file generators override the bare
/// classification.
pub fn fix_kind(rule: &Rule, pattern: &str) -> PatternKind {
    match rule.fix {
        FixSpec::MultiFile(_) => PatternKind::Multiple,
        _ => resolve_type(pattern),
    }
}

/// Whether a pattern contains glob wildcards and must be matched against the tree.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Last path component, ignoring a trailing separator.
pub fn base_name(pattern: &str) -> &str {
    let trimmed = pattern.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
