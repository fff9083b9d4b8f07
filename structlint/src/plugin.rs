use crate::{RuntimeConfig, StructlintError};
use anyhow::Result;
use clap::{ArgMatches, Command};
use structlint_core::StructlintPlugin;

/// Built-in command plugins, kept in registration order so help output is stable.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn StructlintPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_plugins();
        registry
    }

    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin, replacing any earlier plugin with the same name.
    pub fn register(&mut self, plugin: Box<dyn StructlintPlugin>) {
        self.plugins.retain(|p| p.name() != plugin.name());
        self.plugins.push(plugin);
    }

    pub fn register_builtin_plugins(&mut self) {
        self.register(Box::new(structlint_project::ProjectPlugin::new()));
        self.register(Box::new(structlint_rules::CheckPlugin::new()));
        self.register(Box::new(structlint_rules::RulesPlugin::new()));
        self.register(Box::new(structlint_fix::FixPlugin::new()));
    }

    pub fn build_cli(&self, base_app: Command) -> Command {
        self.plugins
            .iter()
            .fold(base_app, |app, plugin| plugin.register_commands(app))
    }

    pub fn handle_command(
        &self,
        command_name: &str,
        matches: &ArgMatches,
        config: &RuntimeConfig,
    ) -> Result<()> {
        match self.get_plugin(command_name) {
            Some(plugin) => plugin.handle_command(matches, config),
            None => Err(StructlintError::Plugin(format!("Unknown command: {}", command_name)).into()),
        }
    }

    pub fn get_plugin(&self, name: &str) -> Option<&dyn StructlintPlugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn list_plugins(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl StructlintPlugin for Echo {
        fn name(&self) -> &str {
            "project"
        }

        fn register_commands(&self, app: Command) -> Command {
            app.subcommand(Command::new("project"))
        }

        fn handle_command(&self, _matches: &ArgMatches, _config: &RuntimeConfig) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = PluginRegistry::empty();
        assert!(registry.get_plugin("check").is_none());
        assert!(registry.list_plugins().is_empty());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Echo));

        assert_eq!(registry.list_plugins(), vec!["check", "rules", "fix", "project"]);
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let registry = PluginRegistry::new();
        let config = RuntimeConfig::new(std::env::temp_dir());
        let matches = Command::new("x").get_matches_from(["x"]);

        let err = registry
            .handle_command("deploy", &matches, &config)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown command: deploy"));
    }

    #[test]
    fn test_build_cli_adds_every_subcommand() {
        let app = PluginRegistry::new().build_cli(Command::new("structlint"));
        let names: Vec<&str> = app.get_subcommands().map(|c| c.get_name()).collect();
        assert_eq!(names, vec!["project", "check", "rules", "fix"]);
    }
}
