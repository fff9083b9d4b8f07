use crate::model::{ActiveRule, Context, Severity};
use crate::registry::RuleRegistry;
use crate::RulesError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use structlint_project::{detect_project_type, ProjectInfo};

pub const CONFIG_VERSION: u32 = 1;

/// Looked up in the project root, in this order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".structlint.yaml", ".structlint.yml", "structlint.yaml"];

pub const README_MIN_BYTES: u64 = 100;
pub const LICENSE_MIN_BYTES: u64 = 100;
pub const GITIGNORE_MIN_BYTES: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
}

impl RuleOverride {
    pub fn severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity.to_string()),
            ..Self::default()
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl LintConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            project_type: None,
            rules: BTreeMap::new(),
        }
    }

    /// Used when a project has no configuration file.
    pub fn minimal() -> Self {
        let mut config = Self::new();
        config
            .rules
            .insert("readme".to_string(), RuleOverride::severity(Severity::Error));
        config
            .rules
            .insert("license".to_string(), RuleOverride::severity(Severity::Warning));
        config
            .rules
            .insert("gitignore".to_string(), RuleOverride::severity(Severity::Warning));
        config
    }

    /// Every built-in rule at its default severity.
    pub fn standard() -> Self {
        let mut config = Self::new();
        for rule in RuleRegistry::default().iter() {
            config
                .rules
                .insert(rule.id.clone(), RuleOverride::severity(rule.severity));
        }
        config
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: LintConfig =
            serde_yaml::from_str(&content).map_err(|source| RulesError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// First configuration file present in `project_path`.
    pub fn discover<P: AsRef<Path>>(project_path: P) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| project_path.as_ref().join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load the explicit file, else the discovered one, else the minimal preset.
    pub fn load_for_project(
        project_path: &Path,
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), RulesError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(project_path),
        };

        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            None => {
                tracing::debug!("No configuration file found, using the minimal preset");
                Ok((Self::minimal(), None))
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.version != CONFIG_VERSION {
            return Err(RulesError::UnsupportedVersion(self.version));
        }
        for (id, rule) in &self.rules {
            if let Some(severity) = &rule.severity {
                parse_severity(id, severity)?;
            }
        }
        Ok(())
    }

    /// Join configured overrides with the registry. Unknown IDs are skipped.
    pub fn resolve_active_rules(
        &self,
        registry: &RuleRegistry,
    ) -> Result<BTreeMap<String, ActiveRule>, RulesError> {
        let mut active = BTreeMap::new();

        for (id, settings) in &self.rules {
            let Some(rule) = registry.get(id) else {
                tracing::warn!("Unknown rule '{}' in configuration, skipping", id);
                continue;
            };

            let mut resolved = ActiveRule::new(rule.clone());
            if let Some(severity) = &settings.severity {
                resolved = resolved.with_severity(parse_severity(id, severity)?);
            }
            resolved.enabled = settings.is_enabled();
            resolved.patterns = settings.patterns.clone();
            resolved.message = settings.message.clone();
            resolved.min_size = settings.min_size;

            active.insert(id.clone(), resolved);
        }

        Ok(active)
    }

    /// Assemble the per-run context. The project type comes from `type_override`,
    /// then the config file, then detection.
    pub fn build_context(
        &self,
        project_path: &Path,
        type_override: Option<&str>,
        registry: &RuleRegistry,
    ) -> Result<Context, RulesError> {
        let project_type = type_override
            .map(str::to_string)
            .or_else(|| self.project_type.clone())
            .unwrap_or_else(|| detect_project_type(project_path).to_string());

        Ok(Context {
            project_path: project_path.to_path_buf(),
            project_info: ProjectInfo::load_or_detect(project_path)?,
            rules: self.resolve_active_rules(registry)?,
            project_type,
        })
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the project's configuration and build its context against the built-in registry.
pub fn load_context(
    project_path: &Path,
    config_path: Option<&Path>,
    type_override: Option<&str>,
) -> Result<Context, RulesError> {
    let (config, _) = LintConfig::load_for_project(project_path, config_path)?;
    config.build_context(project_path, type_override, &RuleRegistry::default())
}

fn parse_severity(rule: &str, value: &str) -> Result<Severity, RulesError> {
    value
        .parse::<Severity>()
        .map_err(|_| RulesError::InvalidSeverity {
            rule: rule.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_preset() {
        let config = LintConfig::minimal();
        let active = config
            .resolve_active_rules(&RuleRegistry::default())
            .unwrap();

        assert_eq!(active.len(), 3);
        assert_eq!(active["readme"].severity, Severity::Error);
        assert_eq!(active["license"].severity, Severity::Warning);
        assert_eq!(active["gitignore"].severity, Severity::Warning);
    }

    #[test]
    fn test_standard_covers_registry() {
        let registry = RuleRegistry::default();
        let config = LintConfig::standard();
        assert_eq!(config.rules.len(), registry.len());
    }

    #[test]
    fn test_load_overrides() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".structlint.yaml");
        fs::write(
            &path,
            r#"
version: 1
project_type: go
rules:
  readme: { severity: WARNING, min_size: 20 }
  tests: { enabled: false }
  src:
    patterns:
      "*": ["source/"]
"#,
        )
        .unwrap();

        let config = LintConfig::load(&path).unwrap();
        assert_eq!(config.project_type.as_deref(), Some("go"));

        let active = config
            .resolve_active_rules(&RuleRegistry::default())
            .unwrap();
        assert_eq!(active["readme"].severity, Severity::Warning);
        assert_eq!(active["readme"].min_size, Some(20));
        assert!(!active["tests"].enabled);
        assert_eq!(
            active["src"].patterns_for("rust").unwrap(),
            &["source/".to_string()]
        );
    }

    #[test]
    fn test_unknown_rules_are_skipped() {
        let mut config = LintConfig::minimal();
        config
            .rules
            .insert("no-such-rule".to_string(), RuleOverride::default());

        let active = config
            .resolve_active_rules(&RuleRegistry::default())
            .unwrap();
        assert_eq!(active.len(), 3);
        assert!(!active.contains_key("no-such-rule"));
    }

    #[test]
    fn test_invalid_severity_is_fatal() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("structlint.yaml");
        fs::write(&path, "version: 1\nrules:\n  readme: { severity: critical }\n").unwrap();

        let err = LintConfig::load(&path).unwrap_err();
        assert!(matches!(err, RulesError::InvalidSeverity { .. }));
    }

    #[test]
    fn test_unsupported_version_is_fatal() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("structlint.yaml");
        fs::write(&path, "version: 2\n").unwrap();

        let err = LintConfig::load(&path).unwrap_err();
        assert!(matches!(err, RulesError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_unparsable_config_is_fatal() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".structlint.yaml");
        fs::write(&path, "rules: [unclosed").unwrap();

        assert!(matches!(
            LintConfig::load(&path).unwrap_err(),
            RulesError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_discovery_order_and_fallback() {
        let temp = tempdir().unwrap();
        let (config, path) = LintConfig::load_for_project(temp.path(), None).unwrap();
        assert_eq!(config, LintConfig::minimal());
        assert!(path.is_none());

        fs::write(temp.path().join("structlint.yaml"), "version: 1\n").unwrap();
        fs::write(temp.path().join(".structlint.yml"), "version: 1\n").unwrap();
        let found = LintConfig::discover(temp.path()).unwrap();
        assert!(found.ends_with(".structlint.yml"));
    }

    #[test]
    fn test_save_round_trips_presets() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".structlint.yaml");
        LintConfig::standard().save(&path).unwrap();
        assert_eq!(LintConfig::load(&path).unwrap(), LintConfig::standard());
    }

    #[test]
    fn test_type_override_wins() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/app\n").unwrap();
        let registry = RuleRegistry::default();

        let detected = LintConfig::minimal()
            .build_context(temp.path(), None, &registry)
            .unwrap();
        assert_eq!(detected.project_type, "go");

        let overridden = LintConfig::minimal()
            .build_context(temp.path(), Some("python"), &registry)
            .unwrap();
        assert_eq!(overridden.project_type, "python");
    }
}
