use crate::info::{ProjectInfo, EDITABLE_FIELDS, PROJECT_CACHE_FILE};
use crate::detect_project_type;
use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use colored::*;
use structlint_core::{
    prompt_text, NonInteractiveMode, OutputFormat, RuntimeConfig, StructlintPlugin, TableOutput,
};

pub struct ProjectPlugin;

impl ProjectPlugin {
    pub fn new() -> Self {
        Self
    }

    fn path_arg() -> Arg {
        Arg::new("path")
            .value_name("PATH")
            .help("Project directory (default: current directory)")
    }

    fn handle_show(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        let project_path =
            config.resolve_project_path(matches.get_one::<String>("path").map(String::as_str));
        let format = matches
            .get_one::<String>("format")
            .map(|f| f.parse::<OutputFormat>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();

        let info = ProjectInfo::load_or_detect(&project_path)?;
        let cached = project_path.join(PROJECT_CACHE_FILE).is_file();
        let project_type = detect_project_type(&project_path);

        match format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "project_type": project_type,
                    "cached": cached,
                    "info": info,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Table => {
                let mut table = TableOutput::new(vec!["Field".to_string(), "Value".to_string()]);
                table.add_row(vec!["project_type".to_string(), project_type.to_string()]);
                for field in EDITABLE_FIELDS {
                    table.add_row(vec![field.to_string(), info.get_field(field)?]);
                }
                print!("{}", table.render());
                let source = if cached {
                    format!("cached in {}", PROJECT_CACHE_FILE)
                } else {
                    "detected from project files".to_string()
                };
                println!("\n{} {}", "Source:".dimmed(), source);
            }
        }
        Ok(())
    }

    fn handle_reset(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        let project_path =
            config.resolve_project_path(matches.get_one::<String>("path").map(String::as_str));

        if ProjectInfo::reset_cache(&project_path)? {
            println!("✅ Removed {}", project_path.join(PROJECT_CACHE_FILE).display());
        } else {
            println!("{} No project cache to remove", "Note:".yellow());
        }
        Ok(())
    }

    fn handle_edit(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        let project_path =
            config.resolve_project_path(matches.get_one::<String>("path").map(String::as_str));
        if !project_path.is_dir() {
            return Err(anyhow!(
                "Project directory not found: {}",
                project_path.display()
            ));
        }
        let mut info = ProjectInfo::load_or_detect(&project_path)?;

        let assignments: Vec<&String> = matches
            .get_many::<String>("set")
            .map(|values| values.collect())
            .unwrap_or_default();

        if assignments.is_empty() {
            edit_interactively(&mut info)?;
        } else {
            for assignment in assignments {
                let (field, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Invalid --set '{}': expected key=value", assignment))?;
                info.set_field(field.trim(), value)?;
            }
        }

        info.save_cache(&project_path)?;
        tracing::info!("Saved project info for '{}'", info.name);
        println!(
            "📝 Updated project info: {}",
            project_path.join(PROJECT_CACHE_FILE).display()
        );
        Ok(())
    }
}

fn edit_interactively(info: &mut ProjectInfo) -> Result<()> {
    println!("{}", "Edit project info".cyan().bold());
    println!("{}", "═════════════════".blue());
    for field in EDITABLE_FIELDS {
        let current = info.get_field(field)?;
        let value = prompt_text(field, Some(&current), true, NonInteractiveMode::Defaults)?;
        info.set_field(field, &value)?;
    }
    Ok(())
}

impl StructlintPlugin for ProjectPlugin {
    fn name(&self) -> &str {
        "project"
    }

    fn register_commands(&self, app: Command) -> Command {
        app.subcommand(
            Command::new("project")
                .about("Show or edit the cached project metadata used by templates")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("show")
                        .about("Show project metadata (cached or detected)")
                        .arg(Self::path_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .short('f')
                                .value_name("FORMAT")
                                .value_parser(["table", "json"])
                                .help("Output format"),
                        ),
                )
                .subcommand(
                    Command::new("reset")
                        .about("Delete the cached project metadata file")
                        .arg(Self::path_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit project metadata and save it to the cache file")
                        .arg(Self::path_arg())
                        .arg(
                            Arg::new("set")
                                .long("set")
                                .value_name("KEY=VALUE")
                                .action(clap::ArgAction::Append)
                                .help("Set a field without prompting (repeatable)"),
                        ),
                ),
        )
    }

    fn handle_command(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()> {
        match matches.subcommand() {
            Some(("show", sub_matches)) => self.handle_show(sub_matches, config),
            Some(("reset", sub_matches)) => self.handle_reset(sub_matches, config),
            Some(("edit", sub_matches)) => self.handle_edit(sub_matches, config),
            Some((other, _)) => Err(anyhow!("Unknown project subcommand: '{}'", other)),
            None => Err(anyhow!("Missing project subcommand (show, reset, edit)")),
        }
    }
}

impl Default for ProjectPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn app() -> Command {
        ProjectPlugin::new().register_commands(Command::new("structlint"))
    }

    #[test]
    fn test_edit_with_set_saves_cache() {
        let temp = tempdir().unwrap();
        let config = RuntimeConfig::new(temp.path().to_path_buf());
        let matches = app()
            .try_get_matches_from([
                "structlint",
                "project",
                "edit",
                "--set",
                "author=Ada Lovelace",
                "--set",
                "license=Apache-2.0",
            ])
            .unwrap();
        let (_, project_matches) = matches.subcommand().unwrap();

        ProjectPlugin::new()
            .handle_command(project_matches, &config)
            .unwrap();

        let cached = ProjectInfo::load_cache(temp.path()).unwrap().unwrap();
        assert_eq!(cached.author, "Ada Lovelace");
        assert_eq!(cached.license, "Apache-2.0");
    }

    #[test]
    fn test_edit_rejects_malformed_assignment() {
        let temp = tempdir().unwrap();
        let config = RuntimeConfig::new(temp.path().to_path_buf());
        let matches = app()
            .try_get_matches_from(["structlint", "project", "edit", "--set", "author"])
            .unwrap();
        let (_, project_matches) = matches.subcommand().unwrap();

        let err = ProjectPlugin::new()
            .handle_command(project_matches, &config)
            .unwrap_err();
        assert!(err.to_string().contains("expected key=value"));
    }

    #[test]
    fn test_project_requires_subcommand() {
        assert!(app()
            .try_get_matches_from(["structlint", "project"])
            .is_err());
    }
}
