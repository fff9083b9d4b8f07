use crate::model::{ExecutionResult, RuleResult, Severity, Status, Summary};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use structlint_core::{OutputFormat, TableOutput};

/// Lowest severity that makes `check` exit non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailOn {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for FailOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailOn::Error => write!(f, "error"),
            FailOn::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for FailOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(FailOn::Error),
            "warning" | "warn" => Ok(FailOn::Warning),
            _ => Err(format!(
                "Invalid fail-on level: {}. Valid options are: error, warning",
                s
            )),
        }
    }
}

pub fn fail_threshold_met(result: &ExecutionResult, fail_on: FailOn) -> bool {
    match fail_on {
        FailOn::Error => result.summary.errors > 0,
        FailOn::Warning => result.summary.errors + result.summary.warnings > 0,
    }
}

/// Parse a comma separated severity list such as `error,warning`.
pub fn parse_severity_list(list: &str) -> Result<Vec<Severity>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Severity>)
        .collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: Status,
    summary: &'a Summary,
    results: Vec<&'a RuleResult>,
    context: JsonContext<'a>,
}

#[derive(Serialize)]
struct JsonContext<'a> {
    project_path: &'a Path,
    project_type: &'a str,
}

pub struct Reporter {
    format: OutputFormat,
    severities: Option<Vec<Severity>>,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            severities: None,
        }
    }

    /// Only show results of these severities. Summary and status are unaffected.
    pub fn with_severities(mut self, severities: Vec<Severity>) -> Self {
        if !severities.is_empty() {
            self.severities = Some(severities);
        }
        self
    }

    fn shows(&self, result: &RuleResult) -> bool {
        self.severities
            .as_ref()
            .map(|allowed| allowed.contains(&result.severity))
            .unwrap_or(true)
    }

    pub fn render(&self, result: &ExecutionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.render_json(result),
            OutputFormat::Table => Ok(self.render_table(result)),
        }
    }

    fn render_json(&self, result: &ExecutionResult) -> Result<String> {
        let report = JsonReport {
            status: result.status,
            summary: &result.summary,
            results: result.results.iter().filter(|r| self.shows(r)).collect(),
            context: JsonContext {
                project_path: &result.context.project_path,
                project_type: &result.context.project_type,
            },
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn render_table(&self, result: &ExecutionResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} ({})\n\n",
            "Checking".cyan().bold(),
            result.context.project_path.display(),
            result.context.project_type
        ));

        let mut table = TableOutput::new(vec![
            String::new(),
            "Rule".to_string(),
            "Severity".to_string(),
            "Message".to_string(),
        ]);
        let mut hints = Vec::new();

        for rule_result in result.results.iter().filter(|r| self.shows(r)) {
            let icon = if rule_result.passed {
                "✓".green().to_string()
            } else {
                match rule_result.severity {
                    Severity::Error => "✗".red().to_string(),
                    Severity::Warning => "!".yellow().to_string(),
                    Severity::Info => "·".blue().to_string(),
                }
            };
            table.add_row(vec![
                icon,
                rule_result.rule_id.clone(),
                colorize_severity(rule_result.severity),
                rule_result.message.clone(),
            ]);

            if !rule_result.passed {
                if let Some(hint) = &rule_result.fix_hint {
                    hints.push(format!("  {} {}", format!("{}:", rule_result.rule_id).bold(), hint));
                }
            }
        }

        if table.is_empty() {
            output.push_str(&format!("{}\n", "No results match the severity filter".dimmed()));
        } else {
            output.push_str(&table.render());
        }

        if !hints.is_empty() {
            output.push_str(&format!("\n{}\n", "Hints".bold()));
            for hint in hints {
                output.push_str(&hint);
                output.push('\n');
            }
        }

        let summary = &result.summary;
        output.push_str(&format!(
            "\n{} {} rules, {} passed, {} errors, {} warnings, {} info\n",
            "Summary:".bold(),
            summary.total,
            summary.passed.to_string().green(),
            summary.errors.to_string().red(),
            summary.warnings.to_string().yellow(),
            summary.info.to_string().blue()
        ));
        let status = match result.status {
            Status::Passed => "PASSED".green().bold(),
            Status::Warnings => "PASSED WITH WARNINGS".yellow().bold(),
            Status::Failed => "FAILED".red().bold(),
        };
        output.push_str(&format!("{} {}\n", "Status:".bold(), status));
        output
    }
}

fn colorize_severity(severity: Severity) -> String {
    match severity {
        Severity::Error => severity.to_string().red().to_string(),
        Severity::Warning => severity.to_string().yellow().to_string(),
        Severity::Info => severity.to_string().blue().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Context;
    use crate::registry::Category;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use structlint_project::ProjectInfo;

    fn result(id: &str, passed: bool, severity: Severity) -> RuleResult {
        RuleResult {
            rule_id: id.to_string(),
            passed,
            severity,
            category: Category::General,
            message: format!("{} message", id),
            fix_hint: if passed { None } else { Some(format!("fix {}", id)) },
            doc_url: None,
            details: None,
        }
    }

    fn execution(results: Vec<RuleResult>) -> ExecutionResult {
        let context = Context {
            project_path: PathBuf::from("/work/demo"),
            project_type: "rust".to_string(),
            project_info: ProjectInfo::with_name("demo"),
            rules: BTreeMap::new(),
        };
        ExecutionResult::from_results(context, results)
    }

    #[test]
    fn test_fail_threshold() {
        let warnings_only = execution(vec![
            result("license", false, Severity::Warning),
            result("readme", true, Severity::Error),
        ]);
        assert!(!fail_threshold_met(&warnings_only, FailOn::Error));
        assert!(fail_threshold_met(&warnings_only, FailOn::Warning));

        let info_only = execution(vec![result("docs", false, Severity::Info)]);
        assert!(!fail_threshold_met(&info_only, FailOn::Warning));
    }

    #[test]
    fn test_parse_severity_list() {
        assert_eq!(
            parse_severity_list("error, warning").unwrap(),
            vec![Severity::Error, Severity::Warning]
        );
        assert!(parse_severity_list("error,loud").is_err());
    }

    #[test]
    fn test_json_report_shape() {
        let report = Reporter::new(OutputFormat::Json)
            .render(&execution(vec![
                result("readme", false, Severity::Error),
                result("license", true, Severity::Warning),
            ]))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["results"][0]["rule_id"], "readme");
        assert_eq!(value["results"][0]["fix_hint"], "fix readme");
        assert_eq!(value["context"]["project_path"], "/work/demo");
        assert_eq!(value["context"]["project_type"], "rust");
    }

    #[test]
    fn test_severity_filter_only_affects_display() {
        let run = execution(vec![
            result("readme", false, Severity::Error),
            result("docs", false, Severity::Info),
        ]);
        let report = Reporter::new(OutputFormat::Json)
            .with_severities(vec![Severity::Error])
            .render(&run)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["results"].as_array().unwrap().len(), 1);
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["info"], 1);
    }

    #[test]
    fn test_table_lists_rules_and_summary() {
        colored::control::set_override(false);
        let output = Reporter::new(OutputFormat::Table)
            .render(&execution(vec![
                result("readme", false, Severity::Error),
                result("license", true, Severity::Warning),
            ]))
            .unwrap();

        assert!(output.contains("readme"));
        assert!(output.contains("fix readme"));
        assert!(output.contains("Summary: 2 rules, 1 passed, 1 errors, 0 warnings, 0 info"));
        assert!(output.contains("Status: FAILED"));
    }
}
