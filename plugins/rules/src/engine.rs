use crate::model::{ActiveRule, Context, ExecutionResult, RuleResult};
use crate::pattern::is_glob;
use crate::probe::{OsProbe, Probe};
use crate::registry::Fallback;
use crate::validators::Verdict;
use crate::RulesError;
use glob::Pattern;
use rayon::prelude::*;
use serde_json::json;

pub const NOT_APPLICABLE: &str = "not applicable";

pub struct RuleEngine<P: Probe = OsProbe> {
    probe: P,
}

impl RuleEngine<OsProbe> {
    pub fn new() -> Self {
        Self { probe: OsProbe }
    }
}

impl Default for RuleEngine<OsProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Probe> RuleEngine<P> {
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Evaluate every enabled rule of the context, one rayon task per rule.
    ///
    /// Results are ordered by rule ID regardless of completion order.
    pub fn execute(&self, context: &Context) -> Result<ExecutionResult, RulesError> {
        let active: Vec<&ActiveRule> = context.enabled_rules().collect();
        if active.is_empty() {
            return Err(RulesError::NoActiveRules);
        }

        tracing::debug!(
            "Checking {} rules against {} ({})",
            active.len(),
            context.project_path.display(),
            context.project_type
        );

        let mut results: Vec<RuleResult> = active
            .par_iter()
            .map(|rule| self.evaluate(rule, context))
            .collect();
        results.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));

        Ok(ExecutionResult::from_results(context.clone(), results))
    }

    pub fn evaluate(&self, rule: &ActiveRule, context: &Context) -> RuleResult {
        let result = self.evaluate_patterns(rule, context);
        tracing::debug!(
            "{}: {} ({})",
            result.rule_id,
            if result.passed { "pass" } else { "fail" },
            result.message
        );
        result
    }

    fn evaluate_patterns(&self, rule: &ActiveRule, context: &Context) -> RuleResult {
        let Some(patterns) = rule.patterns_for(&context.project_type) else {
            return RuleResult::pass(rule, NOT_APPLICABLE).with_details(json!({ "applicable": false }));
        };

        let validator = rule.validator();
        let mut first_invalid: Option<RuleResult> = None;

        for pattern in patterns {
            if is_glob(pattern) {
                let glob = match Pattern::new(pattern) {
                    Ok(glob) => glob,
                    Err(e) => {
                        tracing::warn!("Rule '{}': invalid glob '{}': {}", rule.id(), pattern, e);
                        continue;
                    }
                };
                let matches = self.probe.find_files(&context.project_path, &glob);
                if !matches.is_empty() {
                    return RuleResult::pass(
                        rule,
                        format!("Found {} file(s) matching {}", matches.len(), pattern),
                    )
                    .with_details(json!({ "pattern": pattern, "matches": matches.len() }));
                }
                continue;
            }

            let path = context.project_path.join(pattern.trim_end_matches('/'));
            let Some(stat) = self.probe.stat(&path) else {
                continue;
            };

            match validator.validate(&self.probe, &path, pattern, &stat) {
                Ok(Verdict::Valid(message)) => {
                    return RuleResult::pass(rule, message)
                        .with_details(json!({ "pattern": pattern, "validator": validator.name() }));
                }
                Ok(Verdict::Invalid(message)) => {
                    if first_invalid.is_none() {
                        first_invalid = Some(
                            RuleResult::fail(rule, message).with_details(
                                json!({ "pattern": pattern, "validator": validator.name() }),
                            ),
                        );
                    }
                }
                Err(e) => {
                    return RuleResult::fail(rule, e.to_string())
                        .with_details(json!({ "pattern": pattern, "error": true }));
                }
            }
        }

        if let Some(result) = self.check_fallback(rule, context) {
            return result;
        }

        first_invalid.unwrap_or_else(|| RuleResult::fail(rule, rule.failure_message()))
    }

    fn check_fallback(&self, rule: &ActiveRule, context: &Context) -> Option<RuleResult> {
        let fallback = rule.rule.fallback.as_ref()?;
        if !fallback.applies_to(&context.project_type) {
            return None;
        }

        match fallback {
            Fallback::InlineTests {
                file_pattern,
                message,
                ..
            } => {
                let glob = Pattern::new(file_pattern).ok()?;
                let matches = self.probe.find_files(&context.project_path, &glob);
                if matches.is_empty() {
                    return None;
                }
                Some(RuleResult::pass(rule, *message).with_details(json!({
                    "pattern": file_pattern,
                    "matches": matches.len(),
                    "inline": true,
                })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use crate::model::{Severity, Status};
    use crate::probe::FileStat;
    use crate::registry::RuleRegistry;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use structlint_project::ProjectInfo;
    use tempfile::tempdir;

    fn context(path: &Path, project_type: &str, ids: &[&str]) -> Context {
        let registry = RuleRegistry::default();
        let rules = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    ActiveRule::new(registry.get(id).unwrap().clone()),
                )
            })
            .collect();
        Context {
            project_path: path.to_path_buf(),
            project_type: project_type.to_string(),
            project_info: ProjectInfo::with_name("demo"),
            rules,
        }
    }

    #[test]
    fn test_no_active_rules_is_an_error() {
        let temp = tempdir().unwrap();
        let mut ctx = context(temp.path(), "generic", &["readme"]);
        ctx.rules.get_mut("readme").unwrap().enabled = false;

        let err = RuleEngine::new().execute(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "no active rules configured");
    }

    #[test]
    fn test_empty_project_with_minimal_preset() {
        let temp = tempdir().unwrap();
        let ctx = LintConfig::minimal()
            .build_context(temp.path(), None, &RuleRegistry::default())
            .unwrap();

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert_eq!(result.summary.errors, 1);
        assert_eq!(result.summary.warnings, 2);
        assert_eq!(result.status, Status::Failed);
        let ids: Vec<&str> = result.results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["gitignore", "license", "readme"]);
    }

    #[test]
    fn test_not_applicable_passes() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path(), "generic", &["linter"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(result.results[0].passed);
        assert_eq!(result.results[0].message, NOT_APPLICABLE);
    }

    #[test]
    fn test_existing_but_short_file_reports_its_size() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("README.md"), "# demo\n").unwrap();
        let ctx = context(temp.path(), "generic", &["readme"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        let readme = &result.results[0];
        assert!(!readme.passed);
        assert_eq!(
            readme.message,
            "README.md exists but is empty or too short (7 bytes, minimum 100)"
        );
        assert!(readme.fix_hint.is_some());
    }

    #[test]
    fn test_later_valid_pattern_wins_over_earlier_invalid() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        fs::write(temp.path().join("README.rst"), "=".repeat(120)).unwrap();
        let ctx = context(temp.path(), "generic", &["readme"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(result.results[0].passed);
    }

    #[test]
    fn test_min_size_override() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("README.md"), "# demo\n").unwrap();
        let mut ctx = context(temp.path(), "generic", &["readme"]);
        ctx.rules.get_mut("readme").unwrap().min_size = Some(5);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(result.results[0].passed);
    }

    #[test]
    fn test_empty_tests_dir_fails() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("tests")).unwrap();
        let ctx = context(temp.path(), "rust", &["tests"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(!result.results[0].passed);
        assert_eq!(result.results[0].message, "tests/ exists but is empty");

        fs::write(temp.path().join("tests/smoke.rs"), "").unwrap();
        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(result.results[0].passed);
    }

    #[test]
    fn test_inline_go_tests_satisfy_tests_rule() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/app\n").unwrap();
        fs::create_dir_all(temp.path().join("internal/foo")).unwrap();
        fs::write(temp.path().join("internal/foo/foo_test.go"), "package foo").unwrap();
        let ctx = context(temp.path(), "go", &["tests"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(result.results[0].passed);
        assert_eq!(result.results[0].message, "Go tests are inline.");
    }

    #[test]
    fn test_inline_fallback_only_for_go() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("foo_test.go"), "package foo").unwrap();
        let ctx = context(temp.path(), "rust", &["tests"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert!(!result.results[0].passed);
        assert_eq!(result.results[0].message, "No tests folder found");
    }

    #[test]
    fn test_glob_patterns_count_matches() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/app")).unwrap();
        fs::write(temp.path().join("src/app/app.test.ts"), "").unwrap();
        fs::write(temp.path().join("src/app/util.spec.ts"), "").unwrap();
        let ctx = context(temp.path(), "nodejs", &["test-files"]);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        let test_files = &result.results[0];
        assert!(test_files.passed);
        assert_eq!(test_files.details.as_ref().unwrap()["matches"], 1);
    }

    #[test]
    fn test_configured_message_replaces_default() {
        let temp = tempdir().unwrap();
        let mut ctx = context(temp.path(), "generic", &["license"]);
        ctx.rules.get_mut("license").unwrap().message = Some("Pick a license".to_string());
        ctx.rules.get_mut("license").unwrap().severity = Severity::Error;

        let result = RuleEngine::new().execute(&ctx).unwrap();
        assert_eq!(result.results[0].message, "Pick a license");
        assert_eq!(result.summary.errors, 1);
    }

    struct UnreadableDirs;

    impl Probe for UnreadableDirs {
        fn stat(&self, _path: &Path) -> Option<FileStat> {
            Some(FileStat::dir())
        }

        fn read_dir_len(&self, _path: &Path) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
        }

        fn find_files(&self, _root: &Path, _pattern: &Pattern) -> Vec<PathBuf> {
            Vec::new()
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn write_file(&self, _path: &Path, _content: &str) -> io::Result<()> {
            Ok(())
        }

        fn copy_file(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_directory_fails_rule() {
        let ctx = context(Path::new("/project"), "generic", &["docs"]);

        let result = RuleEngine::with_probe(UnreadableDirs).execute(&ctx).unwrap();
        let docs = &result.results[0];
        assert!(!docs.passed);
        assert!(docs.message.starts_with("cannot check contents of docs/"));
    }

    #[test]
    fn test_results_sorted_by_rule_id() {
        let temp = tempdir().unwrap();
        let ids = ["security", "adr", "readme", "ci", "docs", "changelog"];
        let ctx = context(temp.path(), "generic", &ids);

        let result = RuleEngine::new().execute(&ctx).unwrap();
        let got: Vec<&str> = result.results.iter().map(|r| r.rule_id.as_str()).collect();
        let mut expected = ids.to_vec();
        expected.sort();
        assert_eq!(got, expected);
    }
}
