use crate::multi::{self, GeneratedFile};
use crate::templates::{self, render, template_vars, TemplateVars};
use structlint_project::ProjectInfo;
use structlint_rules::pattern::base_name;
use structlint_rules::MultiFileKind;

/// Supplies file contents to the fixer.
pub trait ContentSource: Send + Sync {
    /// Content for a single file created for `rule_id` at `pattern`.
    fn generate(&self, rule_id: &str, pattern: &str) -> String;

    /// Every file of a multi-file generator, rooted at `root`.
    fn generate_files(&self, kind: MultiFileKind, root: &str) -> Vec<GeneratedFile>;
}

/// Template backed content, dispatched by rule ID, then by file name.
pub struct ContentGenerator {
    vars: TemplateVars,
    project_type: String,
}

impl ContentGenerator {
    pub fn new(info: &ProjectInfo, project_type: &str) -> Self {
        Self::with_vars(template_vars(info, project_type), project_type)
    }

    pub fn with_vars(vars: TemplateVars, project_type: &str) -> Self {
        Self {
            vars,
            project_type: project_type.to_string(),
        }
    }

    fn license(&self) -> &'static str {
        templates::license_text(self.vars.get("license").map(String::as_str).unwrap_or(""))
    }

    fn for_rule(&self, rule_id: &str) -> Option<String> {
        let pt = self.project_type.as_str();
        let template: String = match rule_id {
            "readme" => templates::README.to_string(),
            "license" => self.license().to_string(),
            "gitignore" => templates::gitignore(pt),
            "changelog" => templates::CHANGELOG.to_string(),
            "contributing" => templates::CONTRIBUTING.to_string(),
            "security" => templates::SECURITY.to_string(),
            "code-of-conduct" => templates::CODE_OF_CONDUCT.to_string(),
            "pr-template" => templates::PR_TEMPLATE.to_string(),
            "codeowners" => templates::CODEOWNERS.to_string(),
            "editorconfig" => templates::EDITORCONFIG.to_string(),
            "pre-commit" => templates::pre_commit(pt),
            "dockerfile" => templates::dockerfile(pt).to_string(),
            "dockerignore" => templates::DOCKERIGNORE.to_string(),
            "docker-compose" => templates::DOCKER_COMPOSE.to_string(),
            "ci" => templates::ci_workflow(pt).to_string(),
            "makefile" => templates::makefile(pt).to_string(),
            "linter" => templates::linter(pt)?.to_string(),
            _ => return None,
        };
        Some(render(&template, &self.vars))
    }

    fn for_file_name(&self, pattern: &str) -> Option<String> {
        let name = base_name(pattern).to_lowercase();
        let pt = self.project_type.as_str();
        let template: String = if name.contains("readme") {
            templates::README.to_string()
        } else if name.contains("license") || name.contains("copying") {
            self.license().to_string()
        } else if name.contains("dockerignore") {
            templates::DOCKERIGNORE.to_string()
        } else if name.contains("gitignore") {
            templates::gitignore(pt)
        } else if name.contains("changelog") || name.contains("history") {
            templates::CHANGELOG.to_string()
        } else if name.contains("contributing") {
            templates::CONTRIBUTING.to_string()
        } else if name.contains("security") {
            templates::SECURITY.to_string()
        } else if name.contains("code_of_conduct") {
            templates::CODE_OF_CONDUCT.to_string()
        } else if name.contains("pull_request_template") {
            templates::PR_TEMPLATE.to_string()
        } else if name.contains("codeowners") {
            templates::CODEOWNERS.to_string()
        } else if name.contains("editorconfig") {
            templates::EDITORCONFIG.to_string()
        } else if name.contains("pre-commit") {
            templates::pre_commit(pt)
        } else if name.contains("compose") {
            templates::DOCKER_COMPOSE.to_string()
        } else if name.contains("dockerfile") {
            templates::dockerfile(pt).to_string()
        } else if name.contains("makefile") {
            templates::makefile(pt).to_string()
        } else {
            return None;
        };
        Some(render(&template, &self.vars))
    }
}

/// Fallback content for files no template knows about.
pub fn placeholder(pattern: &str) -> String {
    format!("# {}\n\nTODO: Add content\n", base_name(pattern))
}

impl ContentSource for ContentGenerator {
    fn generate(&self, rule_id: &str, pattern: &str) -> String {
        self.for_rule(rule_id)
            .or_else(|| self.for_file_name(pattern))
            .unwrap_or_else(|| {
                tracing::debug!("No template for {} ({}), using placeholder", rule_id, pattern);
                placeholder(pattern)
            })
    }

    fn generate_files(&self, kind: MultiFileKind, root: &str) -> Vec<GeneratedFile> {
        multi::generate(kind, root, &self.vars, &self.project_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(project_type: &str) -> ContentGenerator {
        let mut info = ProjectInfo::with_name("widget");
        info.author = "Grace Hopper".to_string();
        info.license = "Apache-2.0".to_string();
        ContentGenerator::new(&info, project_type)
    }

    #[test]
    fn test_rule_dispatch_renders_project_info() {
        let readme = generator("rust").generate("readme", "README.md");
        assert!(readme.starts_with("# widget"));

        let license = generator("rust").generate("license", "LICENSE");
        assert!(license.contains("Apache License, Version 2.0"));
        assert!(license.contains("Grace Hopper"));
    }

    #[test]
    fn test_language_specific_gitignore() {
        assert!(generator("rust").generate("gitignore", ".gitignore").contains("/target/"));
        assert!(generator("nodejs")
            .generate("gitignore", ".gitignore")
            .contains("node_modules/"));
    }

    #[test]
    fn test_file_name_heuristics() {
        let content = generator("go").generate("custom-docs", "docs/CONTRIBUTING.md");
        assert!(content.starts_with("# Contributing to widget"));

        let ignore = generator("go").generate("custom", "service/.dockerignore");
        assert!(ignore.contains("node_modules"));
    }

    #[test]
    fn test_linter_without_convention_uses_heuristics_then_placeholder() {
        let content = generator("generic").generate("linter", ".lintrc");
        assert_eq!(content, "# .lintrc\n\nTODO: Add content\n");
    }

    #[test]
    fn test_unknown_rule_gets_placeholder() {
        assert_eq!(
            generator("go").generate("mystery", "notes/IDEAS.txt"),
            "# IDEAS.txt\n\nTODO: Add content\n"
        );
    }
}
