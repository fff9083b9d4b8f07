use crate::content::ContentGenerator;
use crate::fixer::{
    AutoConfirm, ChangeKind, Confirmer, FixContext, FixOptions, FixPlan, FixStatus, Fixer,
    TerminalConfirmer, DEFAULT_PREVIEW_LINES,
};
use crate::FixError;
use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use structlint_core::{is_interactive, OutputFormat, RuntimeConfig, StructlintPlugin};
use structlint_rules::plugin::{config_arg, config_path, path_arg, project_dir, type_arg};
use structlint_rules::{load_context, ActiveRule, OsProbe, RuleEngine, RuleRegistry};

pub struct FixPlugin;

impl FixPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl StructlintPlugin for FixPlugin {
    fn name(&self) -> &str {
        "fix"
    }

    fn register_commands(&self, app: Command) -> Command {
        app.subcommand(
            Command::new("fix")
                .about("Create missing files and folders for failed rules")
                .arg(path_arg())
                .arg(
                    Arg::new("interactive")
                        .long("interactive")
                        .short('i')
                        .help("Confirm each fix before applying it")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .short('n')
                        .help("Show what would be created without touching the filesystem")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("rule")
                        .long("rule")
                        .short('r')
                        .value_name("ID")
                        .action(ArgAction::Append)
                        .help("Fix only this rule (repeatable)"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .short('a')
                        .help("Fix every failed rule without prompting")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("rule"),
                )
                .arg(
                    Arg::new("backup")
                        .long("backup")
                        .help("Keep a .bak copy of empty files before overwriting them")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_name("FORMAT")
                        .value_parser(["table", "json"])
                        .default_value("table")
                        .help("Output format"),
                )
                .arg(config_arg())
                .arg(type_arg()),
        )
    }

    fn handle_command(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        let project_path = project_dir(matches, config)?;
        let format = matches
            .get_one::<String>("format")
            .map(|f| f.parse::<OutputFormat>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();
        let explicit_config = config_path(matches, config);
        let mut context = load_context(
            &project_path,
            explicit_config.as_deref(),
            matches.get_one::<String>("type").map(String::as_str),
        )?;

        let requested: Vec<String> = matches
            .get_many::<String>("rule")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let all = matches.get_flag("all");

        let rule_ids = if requested.is_empty() {
            let result = RuleEngine::new().execute(&context)?;
            result.failed_rule_ids()
        } else {
            // Explicitly requested rules are fixed even when not configured or disabled.
            let registry = RuleRegistry::default();
            for id in &requested {
                match context.rules.get_mut(id) {
                    Some(rule) => rule.enabled = true,
                    None => {
                        if let Some(rule) = registry.get(id) {
                            context
                                .rules
                                .insert(id.clone(), ActiveRule::new(rule.clone()));
                        }
                    }
                }
            }
            requested.clone()
        };

        if rule_ids.is_empty() {
            if format == OutputFormat::Json {
                println!("{}", render_plan_json(&FixPlan::new(matches.get_flag("dry-run")))?);
            } else if !config.quiet {
                println!("✅ {}", "All rules pass, nothing to fix".green());
            }
            return Ok(());
        }

        let options = FixOptions {
            dry_run: matches.get_flag("dry-run"),
            interactive: matches.get_flag("interactive")
                || (!all
                    && requested.is_empty()
                    && format == OutputFormat::Table
                    && is_interactive()),
            backup: matches.get_flag("backup"),
            preview_lines: DEFAULT_PREVIEW_LINES,
        };
        tracing::debug!("Fixing {:?} with {:?}", rule_ids, options);

        let fix_context = FixContext::new(context, options);
        let content = ContentGenerator::new(&fix_context.project_info, &fix_context.project_type);
        let confirmer: Box<dyn Confirmer> = if options.interactive {
            Box::new(TerminalConfirmer)
        } else {
            Box::new(AutoConfirm)
        };

        let plan = Fixer::new(&fix_context, &OsProbe, &content, confirmer.as_ref())
            .fix_all(&rule_ids);

        if format == OutputFormat::Json {
            println!("{}", render_plan_json(&plan)?);
        } else if !config.quiet {
            print!("{}", render_plan(&plan));
        }

        let summary = plan.summary();
        if summary.failed > 0 {
            return Err(FixError::Incomplete {
                failed: summary.failed,
                total: summary.total,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for FixPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// `{ dry_run, results, summary }` for scripting.
pub fn render_plan_json(plan: &FixPlan) -> Result<String> {
    let value = serde_json::json!({
        "dry_run": plan.dry_run,
        "results": plan.results,
        "summary": plan.summary(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_plan(plan: &FixPlan) -> String {
    let mut output = String::new();
    if plan.dry_run {
        output.push_str(&format!("{}\n\n", "Dry run: no files will be changed".yellow().bold()));
    }

    for result in &plan.results {
        let (icon, label) = match result.status {
            FixStatus::Fixed if plan.dry_run => ("→".cyan(), "would fix".cyan()),
            FixStatus::Fixed => ("✓".green(), "fixed".green()),
            FixStatus::Skipped => ("-".dimmed(), "skipped".dimmed()),
            FixStatus::Error => ("✗".red(), "error".red()),
        };
        output.push_str(&format!(
            "{} {} {} {}\n",
            icon,
            result.rule_id.bold(),
            label,
            result.message.dimmed()
        ));
        if let Some(error) = &result.error {
            output.push_str(&format!("    {}\n", error.red()));
        }
        for change in &result.changes {
            let verb = match change.kind {
                ChangeKind::CreateFile => "create",
                ChangeKind::CreateFolder => "mkdir",
                ChangeKind::ModifyFile => "modify",
            };
            output.push_str(&format!("    {} {}\n", verb.blue(), change.description));
            if let Some(preview) = &change.preview {
                for line in preview.lines() {
                    output.push_str(&format!("      {}\n", line.dimmed()));
                }
            }
        }
    }

    let summary = plan.summary();
    output.push_str(&format!(
        "\n{} Fixed: {}, Skipped: {}, Failed: {}, Changes: {}\n",
        "Summary:".bold(),
        summary.fixed,
        summary.skipped,
        summary.failed,
        summary.changes
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run(args: &[&str], config: &RuntimeConfig) -> Result<()> {
        let app = FixPlugin.register_commands(Command::new("structlint"));
        let matches = app.try_get_matches_from(args).unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        FixPlugin.handle_command(sub_matches, config)
    }

    fn quiet(path: &std::path::Path) -> RuntimeConfig {
        let mut config = RuntimeConfig::new(path.to_path_buf());
        config.quiet = true;
        config
    }

    #[test]
    fn test_fix_all_creates_missing_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("README.md"), "r".repeat(150)).unwrap();

        run(&["structlint", "fix", "--all"], &quiet(temp.path())).unwrap();

        assert!(temp.path().join("LICENSE").is_file());
        assert!(temp.path().join(".gitignore").is_file());
        assert_eq!(
            fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "r".repeat(150)
        );
    }

    #[test]
    fn test_fix_single_unconfigured_rule() {
        let temp = tempdir().unwrap();
        run(
            &["structlint", "fix", "--rule", "issue-templates"],
            &quiet(temp.path()),
        )
        .unwrap();

        assert!(temp
            .path()
            .join(".github/ISSUE_TEMPLATE/bug_report.md")
            .is_file());
    }

    #[test]
    fn test_fix_requested_rule_overrides_disabled_config() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(".structlint.yaml"),
            "version: 1\nrules:\n  readme: {}\n  docs: { enabled: false }\n",
        )
        .unwrap();

        run(&["structlint", "fix", "--rule", "docs"], &quiet(temp.path())).unwrap();

        assert!(temp.path().join("docs/.gitkeep").is_file());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = tempdir().unwrap();
        run(&["structlint", "fix", "--all", "--dry-run"], &quiet(temp.path())).unwrap();
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_all_conflicts_with_rule() {
        let app = FixPlugin.register_commands(Command::new("structlint"));
        assert!(app
            .try_get_matches_from(["structlint", "fix", "--all", "--rule", "readme"])
            .is_err());
    }

    #[test]
    fn test_render_plan_json() {
        let temp = tempdir().unwrap();
        let context = load_context(temp.path(), None, None).unwrap();
        let fix_context = FixContext::new(
            context,
            FixOptions {
                dry_run: true,
                ..FixOptions::default()
            },
        );
        let content = ContentGenerator::new(&fix_context.project_info, &fix_context.project_type);
        let plan = Fixer::new(&fix_context, &OsProbe, &content, &AutoConfirm).fix_all(&["license"]);

        let value: serde_json::Value =
            serde_json::from_str(&render_plan_json(&plan).unwrap()).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["results"][0]["status"], "fixed");
        assert_eq!(value["results"][0]["changes"][0]["kind"], "create_file");
        assert_eq!(value["summary"]["changes"], 1);
    }

    #[test]
    fn test_render_plan_summary_line() {
        colored::control::set_override(false);
        let plan = FixPlan::new(false);
        assert!(render_plan(&plan).contains("Summary: Fixed: 0, Skipped: 0, Failed: 0, Changes: 0"));
    }
}
