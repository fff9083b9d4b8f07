use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::{Path, PathBuf};

pub mod interactive;
pub mod output;

pub use interactive::{is_interactive, prompt_confirm, prompt_text, NonInteractiveMode};
pub use output::{OutputFormat, TableOutput};

/// Trait that all structlint plugins must implement
pub trait StructlintPlugin: Send + Sync {
    /// Returns the plugin name (used for command routing)
    fn name(&self) -> &str;

    /// Register CLI commands for this plugin
    fn register_commands(&self, app: Command) -> Command;

    /// Handle a command for this plugin
    fn handle_command(&self, matches: &ArgMatches, config: &RuntimeConfig) -> Result<()>;
}

/// Runtime configuration available to all plugins.
///
/// Built once by the binary from the global flags and passed by reference to
/// every command handler.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub working_dir: PathBuf,
    pub verbose: bool,
    pub quiet: bool,
    pub color: bool,
}

impl RuntimeConfig {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            verbose: false,
            quiet: false,
            color: true,
        }
    }

    /// Resolve an optional user supplied project path against the working directory.
    ///
    /// The result is absolute; it is canonicalized when the path exists.
    pub fn resolve_project_path(&self, path: Option<&str>) -> PathBuf {
        let joined = match path {
            Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
            Some(p) => self.working_dir.join(p),
            None => self.working_dir.clone(),
        };
        joined.canonicalize().unwrap_or(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_relative_project_path() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join("app")).unwrap();

        let config = RuntimeConfig::new(temp.path().to_path_buf());
        let resolved = config.resolve_project_path(Some("app"));

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("app"));
    }

    #[test]
    fn test_resolve_defaults_to_working_dir() {
        let temp = tempdir().unwrap();
        let config = RuntimeConfig::new(temp.path().to_path_buf());

        let resolved = config.resolve_project_path(None);
        assert_eq!(resolved, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_missing_path_is_kept_as_is() {
        let temp = tempdir().unwrap();
        let config = RuntimeConfig::new(temp.path().to_path_buf());

        let resolved = config.resolve_project_path(Some("does-not-exist"));
        assert_eq!(resolved, temp.path().join("does-not-exist"));
    }
}
