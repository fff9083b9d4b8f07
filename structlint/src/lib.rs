pub mod cli;
pub mod plugin;

pub use cli::{exit_code, StructlintCli};
pub use plugin::PluginRegistry;
pub use structlint_core::{RuntimeConfig, StructlintPlugin};

#[derive(Debug, thiserror::Error)]
pub enum StructlintError {
    #[error("Plugin error: {0}")]
    Plugin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_builtin_commands() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.list_plugins(), vec!["project", "check", "rules", "fix"]);
    }

    #[test]
    fn test_cli_creation() {
        let cli = StructlintCli::new();
        let app = cli.build_app();
        assert_eq!(app.get_name(), "structlint");
    }
}
