use crate::config::{load_context, LintConfig, CONFIG_FILE_NAMES};
use crate::engine::RuleEngine;
use crate::registry::RuleRegistry;
use crate::report::{fail_threshold_met, parse_severity_list, FailOn, Reporter};
use crate::CheckFailed;
use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::path::{Path, PathBuf};
use structlint_core::{OutputFormat, RuntimeConfig, StructlintPlugin, TableOutput};
use structlint_project::KNOWN_PROJECT_TYPES;

/// Positional project directory shared by the project-scoped commands.
pub fn path_arg() -> Arg {
    Arg::new("path")
        .value_name("PATH")
        .help("Project directory (default: current directory)")
}

pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("FILE")
        .help("Configuration file (default: .structlint.yaml in the project)")
}

pub fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .value_name("TYPE")
        .help(format!(
            "Project type, overriding detection ({})",
            KNOWN_PROJECT_TYPES.join(", ")
        ))
}

/// Resolve the project directory argument and fail early when it is missing.
pub fn project_dir(matches: &ArgMatches, config: &RuntimeConfig) -> Result<PathBuf> {
    let project_path =
        config.resolve_project_path(matches.get_one::<String>("path").map(String::as_str));
    if !project_path.is_dir() {
        return Err(anyhow!(
            "Project directory not found: {}",
            project_path.display()
        ));
    }
    Ok(project_path)
}

/// Explicit `--config` path, relative to the working directory.
pub fn config_path(matches: &ArgMatches, config: &RuntimeConfig) -> Option<PathBuf> {
    matches
        .get_one::<String>("config")
        .map(|p| config.working_dir.join(p))
}

pub struct CheckPlugin;

impl CheckPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl StructlintPlugin for CheckPlugin {
    fn name(&self) -> &str {
        "check"
    }

    fn register_commands(&self, app: Command) -> Command {
        app.subcommand(
            Command::new("check")
                .about("Check the project structure against the configured rules")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_name("FORMAT")
                        .value_parser(["table", "json"])
                        .default_value("table")
                        .help("Output format"),
                )
                .arg(
                    Arg::new("severity")
                        .long("severity")
                        .short('s')
                        .value_name("LIST")
                        .help("Only show results of these severities, e.g. error,warning"),
                )
                .arg(
                    Arg::new("fail-on")
                        .long("fail-on")
                        .value_name("LEVEL")
                        .value_parser(["error", "warning"])
                        .default_value("error")
                        .help("Exit non-zero when failures of this severity or worse remain"),
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
        let fail_on = matches
            .get_one::<String>("fail-on")
            .map(|f| f.parse::<FailOn>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();
        let severities = matches
            .get_one::<String>("severity")
            .map(|list| parse_severity_list(list))
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();

        let explicit_config = config_path(matches, config);
        let context = load_context(
            &project_path,
            explicit_config.as_deref(),
            matches.get_one::<String>("type").map(String::as_str),
        )?;

        let result = RuleEngine::new().execute(&context)?;
        tracing::debug!(
            "Check finished: {} passed of {}",
            result.summary.passed,
            result.summary.total
        );

        if !config.quiet || format == OutputFormat::Json {
            let report = Reporter::new(format)
                .with_severities(severities)
                .render(&result)?;
            print!("{}", report);
            if format == OutputFormat::Json {
                println!();
            }
        }

        if fail_threshold_met(&result, fail_on) {
            return Err(CheckFailed {
                errors: result.summary.errors,
                warnings: result.summary.warnings,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for CheckPlugin {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RulesPlugin;

impl RulesPlugin {
    pub fn new() -> Self {
        Self
    }

    fn handle_list(&self, matches: &ArgMatches) -> Result<()> {
        let registry = RuleRegistry::default();
        let format = matches
            .get_one::<String>("format")
            .map(|f| f.parse::<OutputFormat>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();

        if format == OutputFormat::Json {
            let rules: Vec<serde_json::Value> = registry
                .iter()
                .map(|rule| {
                    serde_json::json!({
                        "id": rule.id,
                        "name": rule.name,
                        "category": rule.category,
                        "severity": rule.severity,
                        "fixable": rule.is_fixable(),
                        "patterns": rule.patterns,
                        "description": rule.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
            return Ok(());
        }

        for (category, rules) in registry.by_category() {
            println!("{}", category.to_string().cyan().bold());
            let mut table = TableOutput::new(vec![
                "Rule".to_string(),
                "Severity".to_string(),
                "Fix".to_string(),
                "Name".to_string(),
            ]);
            for rule in rules {
                table.add_row(vec![
                    rule.id.clone(),
                    rule.severity.to_string(),
                    if rule.is_fixable() { "yes" } else { "-" }.to_string(),
                    rule.name.clone(),
                ]);
            }
            println!("{}", table.render());
        }
        Ok(())
    }

    fn handle_init(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        let project_path = project_dir(matches, config)?;
        let force = matches.get_flag("force");

        if !force {
            if let Some(existing) = LintConfig::discover(&project_path) {
                println!(
                    "{} Configuration already exists at: {} (use --force to overwrite)",
                    "Warning:".yellow(),
                    existing.display()
                );
                return Ok(());
            }
        }

        let target = init_target(&project_path);
        LintConfig::standard().save(&target)?;
        tracing::info!("Wrote configuration to {}", target.display());
        println!("✅ Created configuration at: {}", target.display());
        Ok(())
    }
}

fn init_target(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAMES[0])
}

impl StructlintPlugin for RulesPlugin {
    fn name(&self) -> &str {
        "rules"
    }

    fn register_commands(&self, app: Command) -> Command {
        app.subcommand(
            Command::new("rules")
                .about("List built-in rules or write a starter configuration")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("list").about("List all built-in rules").arg(
                        Arg::new("format")
                            .long("format")
                            .short('f')
                            .value_name("FORMAT")
                            .value_parser(["table", "json"])
                            .help("Output format"),
                    ),
                )
                .subcommand(
                    Command::new("init")
                        .about("Write a configuration enabling every built-in rule")
                        .arg(path_arg())
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .help("Overwrite an existing configuration file")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
    }

    fn handle_command(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        match matches.subcommand() {
            Some(("list", sub_matches)) => self.handle_list(sub_matches),
            Some(("init", sub_matches)) => self.handle_init(sub_matches, config),
            Some((other, _)) => Err(anyhow!("Unknown rules subcommand: '{}'", other)),
            None => Err(anyhow!("Missing rules subcommand (list, init)")),
        }
    }
}

impl Default for RulesPlugin {
    fn default() -> Self {
        Self::new()
    }
}
