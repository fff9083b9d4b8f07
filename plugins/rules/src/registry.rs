//! Built-in rule table.

use crate::config::{GITIGNORE_MIN_BYTES, LICENSE_MIN_BYTES, README_MIN_BYTES};
use crate::model::{Severity, ANY_PROJECT_TYPE};
use crate::validators::{ExistsValidator, MinSizeValidator, NonEmptyDirValidator, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Docs,
    Ci,
    Quality,
    Devops,
    Structure,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Docs,
        Category::Ci,
        Category::Quality,
        Category::Devops,
        Category::Structure,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::General => "general",
            Category::Docs => "docs",
            Category::Ci => "ci",
            Category::Quality => "quality",
            Category::Devops => "devops",
            Category::Structure => "structure",
        };
        write!(f, "{}", name)
    }
}

/// How a matched path is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorSpec {
    Exists,
    MinSize(u64),
    NonEmptyDir,
}

impl ValidatorSpec {
    /// Build the validator; `min_size` from configuration replaces the built-in
    /// threshold of size-gated rules and turns plain existence checks into one.
    pub fn build(self, min_size: Option<u64>) -> Box<dyn Validator> {
        match (self, min_size) {
            (ValidatorSpec::NonEmptyDir, _) => Box::new(NonEmptyDirValidator),
            (ValidatorSpec::MinSize(_), Some(bytes)) | (ValidatorSpec::Exists, Some(bytes)) => {
                Box::new(MinSizeValidator::new(bytes))
            }
            (ValidatorSpec::MinSize(bytes), None) => Box::new(MinSizeValidator::new(bytes)),
            (ValidatorSpec::Exists, None) => Box::new(ExistsValidator),
        }
    }
}

/// Rule-level check run when no pattern validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Tests living next to the code, found anywhere in the tree.
    InlineTests {
        project_type: &'static str,
        file_pattern: &'static str,
        message: &'static str,
    },
}

impl Fallback {
    pub fn applies_to(&self, project_type: &str) -> bool {
        match self {
            Fallback::InlineTests {
                project_type: target,
                ..
            } => *target == project_type,
        }
    }
}

/// Seed files written into a folder created by a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderSeed {
    GitKeep,
    ExampleTest,
}

/// Generators that produce several files for one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFileKind {
    IssueTemplates,
    Adr,
    Scripts,
    CiWorkflow,
    Kubernetes,
    Nginx,
}

/// How a failed rule is remediated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixSpec {
    None,
    Generate,
    Folder(FolderSeed),
    MultiFile(MultiFileKind),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub patterns: BTreeMap<String, Vec<String>>,
    pub validator: ValidatorSpec,
    pub fallback: Option<Fallback>,
    pub message: String,
    pub fix_hint: Option<String>,
    pub doc_url: Option<String>,
    pub fix: FixSpec,
}

impl Rule {
    fn new(id: &str, name: &str, category: Category, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category,
            severity,
            patterns: BTreeMap::new(),
            validator: ValidatorSpec::Exists,
            fallback: None,
            message: format!("{} not found", name),
            fix_hint: None,
            doc_url: None,
            fix: FixSpec::None,
        }
    }

    fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn any(self, patterns: &[&str]) -> Self {
        self.on(ANY_PROJECT_TYPE, patterns)
    }

    fn on(mut self, project_type: &str, patterns: &[&str]) -> Self {
        self.patterns.insert(
            project_type.to_string(),
            patterns.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    fn validate_with(mut self, validator: ValidatorSpec) -> Self {
        self.validator = validator;
        self
    }

    fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    fn hint(mut self, hint: &str) -> Self {
        self.fix_hint = Some(hint.to_string());
        self
    }

    fn docs(mut self, url: &str) -> Self {
        self.doc_url = Some(url.to_string());
        self
    }

    fn fix(mut self, fix: FixSpec) -> Self {
        self.fix = fix;
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix != FixSpec::None
    }
}

pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.id.as_str()).collect()
    }

    pub fn by_category(&self) -> BTreeMap<Category, Vec<&Rule>> {
        let mut grouped: BTreeMap<Category, Vec<&Rule>> = BTreeMap::new();
        for rule in &self.rules {
            grouped.entry(rule.category).or_default().push(rule);
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

fn default_rules() -> Vec<Rule> {
    use Category::*;
    use Severity::*;

    vec![
        // general
        Rule::new("readme", "README", General, Error)
            .describe("Project overview for new users and contributors")
            .any(&["README.md", "README.rst", "README.txt", "README", "readme.md"])
            .validate_with(ValidatorSpec::MinSize(README_MIN_BYTES))
            .message("README not found")
            .hint("Add a README.md describing the project, installation and usage")
            .docs("https://www.makeareadme.com/")
            .fix(FixSpec::Generate),
        Rule::new("license", "LICENSE", General, Warning)
            .describe("License terms for using and distributing the code")
            .any(&["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"])
            .validate_with(ValidatorSpec::MinSize(LICENSE_MIN_BYTES))
            .message("LICENSE not found")
            .hint("Choose a license and add it as LICENSE")
            .docs("https://choosealicense.com/")
            .fix(FixSpec::Generate),
        Rule::new("gitignore", ".gitignore", General, Warning)
            .describe("Keeps build output and local files out of version control")
            .any(&[".gitignore"])
            .validate_with(ValidatorSpec::MinSize(GITIGNORE_MIN_BYTES))
            .message(".gitignore not found")
            .hint("Add a .gitignore for your language and tooling")
            .docs("https://git-scm.com/docs/gitignore")
            .fix(FixSpec::Generate),
        // docs
        Rule::new("changelog", "Changelog", Docs, Info)
            .describe("Human readable history of notable changes")
            .any(&["CHANGELOG.md", "CHANGES.md", "HISTORY.md"])
            .hint("Keep a CHANGELOG.md following the Keep a Changelog format")
            .docs("https://keepachangelog.com/")
            .fix(FixSpec::Generate),
        Rule::new("contributing", "Contributing guide", Docs, Info)
            .describe("How to propose changes")
            .any(&[
                "CONTRIBUTING.md",
                ".github/CONTRIBUTING.md",
                "docs/CONTRIBUTING.md",
            ])
            .docs("https://docs.github.com/en/communities/setting-up-your-project-for-healthy-contributions/setting-guidelines-for-repository-contributors")
            .fix(FixSpec::Generate),
        Rule::new("security", "Security policy", Docs, Info)
            .describe("How to report vulnerabilities")
            .any(&["SECURITY.md", ".github/SECURITY.md"])
            .docs("https://docs.github.com/en/code-security/getting-started/adding-a-security-policy-to-your-repository")
            .fix(FixSpec::Generate),
        Rule::new("code-of-conduct", "Code of conduct", Docs, Info)
            .describe("Community behaviour standards")
            .any(&["CODE_OF_CONDUCT.md", ".github/CODE_OF_CONDUCT.md"])
            .docs("https://www.contributor-covenant.org/")
            .fix(FixSpec::Generate),
        Rule::new("docs", "Documentation folder", Docs, Info)
            .describe("Long-form documentation beyond the README")
            .any(&["docs/", "doc/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .fix(FixSpec::Folder(FolderSeed::GitKeep)),
        Rule::new("adr", "Architecture decision records", Docs, Info)
            .describe("Recorded architecture decisions")
            .any(&["docs/adr/", "docs/decisions/", "adr/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .hint("Record significant decisions as numbered markdown files")
            .docs("https://adr.github.io/")
            .fix(FixSpec::MultiFile(MultiFileKind::Adr)),
        // ci
        Rule::new("ci", "CI configuration", Ci, Warning)
            .describe("Automated build and test pipeline")
            .any(&[
                ".github/workflows/",
                ".gitlab-ci.yml",
                ".circleci/config.yml",
                "Jenkinsfile",
                ".travis.yml",
                "azure-pipelines.yml",
            ])
            .message("No CI configuration found")
            .hint("Add a GitHub Actions workflow under .github/workflows/")
            .docs("https://docs.github.com/en/actions")
            .fix(FixSpec::MultiFile(MultiFileKind::CiWorkflow)),
        Rule::new("pr-template", "Pull request template", Ci, Info)
            .any(&[
                ".github/pull_request_template.md",
                ".github/PULL_REQUEST_TEMPLATE.md",
                "docs/pull_request_template.md",
            ])
            .docs("https://docs.github.com/en/communities/using-templates-to-encourage-useful-issues-and-pull-requests/creating-a-pull-request-template-for-your-repository")
            .fix(FixSpec::Generate),
        Rule::new("issue-templates", "Issue templates", Ci, Info)
            .any(&[".github/ISSUE_TEMPLATE/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .docs("https://docs.github.com/en/communities/using-templates-to-encourage-useful-issues-and-pull-requests/configuring-issue-templates-for-your-repository")
            .fix(FixSpec::MultiFile(MultiFileKind::IssueTemplates)),
        Rule::new("codeowners", "CODEOWNERS", Ci, Info)
            .describe("Default reviewers for parts of the tree")
            .any(&[".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"])
            .docs("https://docs.github.com/en/repositories/managing-your-repositorys-settings-and-features/customizing-your-repository/about-code-owners")
            .fix(FixSpec::Generate),
        // quality
        Rule::new("tests", "Tests folder", Quality, Warning)
            .describe("Automated tests")
            .on("go", &["tests/", "test/"])
            .on("rust", &["tests/"])
            .on("nodejs", &["tests/", "test/", "__tests__/"])
            .on("python", &["tests/", "test/"])
            .on("java", &["src/test/"])
            .any(&["tests/", "test/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .fallback(Fallback::InlineTests {
                project_type: "go",
                file_pattern: "*_test.go",
                message: "Go tests are inline.",
            })
            .message("No tests folder found")
            .hint("Create a tests/ folder with at least one test")
            .fix(FixSpec::Folder(FolderSeed::ExampleTest)),
        Rule::new("test-files", "Test files", Quality, Info)
            .describe("Test files following the ecosystem naming convention")
            .on("go", &["*_test.go"])
            .on("rust", &["*_test.rs", "*_tests.rs"])
            .on("nodejs", &["*.test.js", "*.spec.js", "*.test.ts", "*.spec.ts"])
            .on("python", &["test_*.py", "*_test.py"])
            .on("java", &["*Test.java", "*Tests.java"])
            .message("No test files found"),
        Rule::new("linter", "Linter configuration", Quality, Info)
            .on("go", &[".golangci.yml", ".golangci.yaml", ".golangci.toml"])
            .on("rust", &["rustfmt.toml", ".rustfmt.toml", "clippy.toml"])
            .on(
                "nodejs",
                &[
                    "eslint.config.js",
                    "eslint.config.mjs",
                    ".eslintrc.json",
                    ".eslintrc.js",
                    ".eslintrc.yml",
                    ".eslintrc",
                ],
            )
            .on("python", &["ruff.toml", ".ruff.toml", ".flake8", ".pylintrc"])
            .on("java", &["checkstyle.xml", "config/checkstyle/checkstyle.xml"])
            .message("No linter configuration found")
            .fix(FixSpec::Generate),
        Rule::new("editorconfig", ".editorconfig", Quality, Info)
            .any(&[".editorconfig"])
            .docs("https://editorconfig.org/")
            .fix(FixSpec::Generate),
        Rule::new("pre-commit", "Pre-commit hooks", Quality, Info)
            .any(&[".pre-commit-config.yaml", ".husky/", "lefthook.yml"])
            .docs("https://pre-commit.com/")
            .fix(FixSpec::Generate),
        // structure
        Rule::new("src", "Source folder", Structure, Info)
            .on("go", &["cmd/", "internal/", "pkg/"])
            .on("rust", &["src/"])
            .on("nodejs", &["src/", "lib/"])
            .on("python", &["src/"])
            .on("java", &["src/main/"])
            .any(&["src/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .message("No source folder found")
            .fix(FixSpec::Folder(FolderSeed::GitKeep)),
        Rule::new("scripts", "Scripts folder", Structure, Info)
            .describe("Developer automation scripts")
            .any(&["scripts/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .fix(FixSpec::MultiFile(MultiFileKind::Scripts)),
        // devops
        Rule::new("makefile", "Task runner", Devops, Info)
            .any(&["Makefile", "justfile", "Taskfile.yml"])
            .message("No Makefile or task runner found")
            .fix(FixSpec::Generate),
        Rule::new("dockerfile", "Dockerfile", Devops, Info)
            .any(&["Dockerfile", "docker/Dockerfile"])
            .docs("https://docs.docker.com/reference/dockerfile/")
            .fix(FixSpec::Generate),
        Rule::new("dockerignore", ".dockerignore", Devops, Info)
            .any(&[".dockerignore"])
            .fix(FixSpec::Generate),
        Rule::new("docker-compose", "Docker Compose file", Devops, Info)
            .any(&[
                "docker-compose.yml",
                "docker-compose.yaml",
                "compose.yaml",
                "compose.yml",
            ])
            .fix(FixSpec::Generate),
        Rule::new("k8s", "Kubernetes manifests", Devops, Info)
            .any(&["k8s/", "kubernetes/", "deploy/k8s/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .fix(FixSpec::MultiFile(MultiFileKind::Kubernetes)),
        Rule::new("nginx", "Nginx configuration", Devops, Info)
            .any(&["nginx/", "deploy/nginx/"])
            .validate_with(ValidatorSpec::NonEmptyDir)
            .fix(FixSpec::MultiFile(MultiFileKind::Nginx)),
    ]
}
