use crate::ProjectError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the cached project metadata file in the project root.
pub const PROJECT_CACHE_FILE: &str = ".structlint-project.yaml";

pub const EDITABLE_FIELDS: &[&str] = &[
    "name",
    "description",
    "author",
    "email",
    "license",
    "repository_url",
    "homepage_url",
];

const DEFAULT_AUTHOR: &str = "Project Maintainers";
const DEFAULT_EMAIL: &str = "maintainers@example.com";
const DEFAULT_LICENSE: &str = "MIT";

/// Metadata used to fill file templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub author: String,
    pub email: String,
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

impl ProjectInfo {
    pub fn with_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("{} project", name),
            name,
            author: DEFAULT_AUTHOR.to_string(),
            email: DEFAULT_EMAIL.to_string(),
            license: DEFAULT_LICENSE.to_string(),
            repository_url: None,
            homepage_url: None,
        }
    }

    /// Load the cached metadata, or detect it from the project manifests.
    pub fn load_or_detect<P: AsRef<Path>>(project_path: P) -> Result<Self, ProjectError> {
        let project_path = project_path.as_ref();
        match Self::load_cache(project_path)? {
            Some(info) => {
                tracing::debug!("Using cached project info from {}", PROJECT_CACHE_FILE);
                Ok(info)
            }
            None => Ok(Self::detect(project_path)),
        }
    }

    /// Build metadata from `Cargo.toml`, `package.json` or `go.mod`, falling back
    /// to the directory name.
    pub fn detect<P: AsRef<Path>>(project_path: P) -> Self {
        let project_path = project_path.as_ref();
        let dir_name = project_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string());

        let mut info = Self::with_name(dir_name);
        info.merge_cargo(project_path);
        info.merge_package_json(project_path);
        info.merge_go_mod(project_path);

        if let (None, Some(repo)) = (&info.homepage_url, &info.repository_url) {
            info.homepage_url = Some(repo.clone());
        }
        info
    }

    pub fn load_cache<P: AsRef<Path>>(project_path: P) -> Result<Option<Self>, ProjectError> {
        let cache_path = project_path.as_ref().join(PROJECT_CACHE_FILE);
        if !cache_path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&cache_path).map_err(|source| ProjectError::Io {
            path: cache_path.display().to_string(),
            source,
        })?;
        let info = serde_yaml::from_str(&content).map_err(|source| ProjectError::Cache {
            path: cache_path.display().to_string(),
            source,
        })?;
        Ok(Some(info))
    }

    pub fn save_cache<P: AsRef<Path>>(&self, project_path: P) -> Result<(), ProjectError> {
        let cache_path = project_path.as_ref().join(PROJECT_CACHE_FILE);
        let yaml = serde_yaml::to_string(self).map_err(|source| ProjectError::Cache {
            path: cache_path.display().to_string(),
            source,
        })?;
        fs::write(&cache_path, yaml).map_err(|source| ProjectError::Io {
            path: cache_path.display().to_string(),
            source,
        })
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn reset_cache<P: AsRef<Path>>(project_path: P) -> Result<bool, ProjectError> {
        let cache_path = project_path.as_ref().join(PROJECT_CACHE_FILE);
        if !cache_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&cache_path).map_err(|source| ProjectError::Io {
            path: cache_path.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    pub fn get_field(&self, field: &str) -> Result<String, ProjectError> {
        let value = match field {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "author" => self.author.clone(),
            "email" => self.email.clone(),
            "license" => self.license.clone(),
            "repository_url" => self.repository_url.clone().unwrap_or_default(),
            "homepage_url" => self.homepage_url.clone().unwrap_or_default(),
            other => return Err(ProjectError::UnknownField(other.to_string())),
        };
        Ok(value)
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), ProjectError> {
        let value = value.trim().to_string();
        let optional = |v: String| if v.is_empty() { None } else { Some(v) };
        match field {
            "name" => self.name = value,
            "description" => self.description = value,
            "author" => self.author = value,
            "email" => self.email = value,
            "license" => self.license = value,
            "repository_url" => self.repository_url = optional(value),
            "homepage_url" => self.homepage_url = optional(value),
            other => return Err(ProjectError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Account or organisation name taken from a GitHub/GitLab repository URL.
    pub fn owner(&self) -> Option<String> {
        let repo = self.repository_url.as_deref()?;
        let trimmed = repo.trim_end_matches(".git").trim_end_matches('/');
        let mut segments = trimmed.rsplit('/');
        let _repo_name = segments.next()?;
        let owner = segments.next()?;
        if owner.is_empty() || owner.contains(':') {
            None
        } else {
            Some(owner.to_string())
        }
    }

    /// Flat string map consumed by template substitution.
    pub fn template_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("name".to_string(), self.name.clone());
        vars.insert("description".to_string(), self.description.clone());
        vars.insert("author".to_string(), self.author.clone());
        vars.insert("email".to_string(), self.email.clone());
        vars.insert("license".to_string(), self.license.clone());
        let repository = self.repository_url.clone().unwrap_or_default();
        vars.insert(
            "issues_url".to_string(),
            if repository.is_empty() {
                String::new()
            } else {
                format!("{}/issues", repository)
            },
        );
        vars.insert("repository_url".to_string(), repository);
        vars.insert(
            "homepage_url".to_string(),
            self.homepage_url.clone().unwrap_or_default(),
        );
        vars.insert(
            "owner".to_string(),
            self.owner().unwrap_or_else(|| self.author.clone()),
        );
        vars
    }

    fn merge_cargo(&mut self, project_path: &Path) {
        let Ok(content) = fs::read_to_string(project_path.join("Cargo.toml")) else {
            return;
        };
        let Ok(manifest) = content.parse::<toml::Table>() else {
            tracing::debug!("Ignoring unparsable Cargo.toml");
            return;
        };
        let Some(package) = manifest.get("package").and_then(|p| p.as_table()) else {
            return;
        };

        if let Some(name) = package.get("name").and_then(|v| v.as_str()) {
            self.name = name.to_string();
        }
        if let Some(description) = package.get("description").and_then(|v| v.as_str()) {
            self.description = description.to_string();
        }
        if let Some(license) = package.get("license").and_then(|v| v.as_str()) {
            self.license = license.to_string();
        }
        if let Some(repo) = package.get("repository").and_then(|v| v.as_str()) {
            self.repository_url = Some(repo.to_string());
        }
        if let Some(homepage) = package.get("homepage").and_then(|v| v.as_str()) {
            self.homepage_url = Some(homepage.to_string());
        }
        if let Some(author) = package
            .get("authors")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|v| v.as_str())
        {
            self.apply_person(author);
        }
    }

    fn merge_package_json(&mut self, project_path: &Path) {
        let Ok(content) = fs::read_to_string(project_path.join("package.json")) else {
            return;
        };
        let Ok(manifest) = serde_json::from_str::<serde_json::Value>(&content) else {
            tracing::debug!("Ignoring unparsable package.json");
            return;
        };

        if let Some(name) = manifest.get("name").and_then(|v| v.as_str()) {
            self.name = name.to_string();
        }
        if let Some(description) = manifest.get("description").and_then(|v| v.as_str()) {
            self.description = description.to_string();
        }
        if let Some(license) = manifest.get("license").and_then(|v| v.as_str()) {
            self.license = license.to_string();
        }
        if let Some(homepage) = manifest.get("homepage").and_then(|v| v.as_str()) {
            self.homepage_url = Some(homepage.to_string());
        }
        match manifest.get("repository") {
            Some(serde_json::Value::String(url)) => self.repository_url = Some(clean_repo_url(url)),
            Some(serde_json::Value::Object(repo)) => {
                if let Some(url) = repo.get("url").and_then(|v| v.as_str()) {
                    self.repository_url = Some(clean_repo_url(url));
                }
            }
            _ => {}
        }
        match manifest.get("author") {
            Some(serde_json::Value::String(person)) => self.apply_person(person),
            Some(serde_json::Value::Object(person)) => {
                if let Some(name) = person.get("name").and_then(|v| v.as_str()) {
                    self.author = name.to_string();
                }
                if let Some(email) = person.get("email").and_then(|v| v.as_str()) {
                    self.email = email.to_string();
                }
            }
            _ => {}
        }
    }

    fn merge_go_mod(&mut self, project_path: &Path) {
        let Ok(content) = fs::read_to_string(project_path.join("go.mod")) else {
            return;
        };
        let Some(module) = content
            .lines()
            .find_map(|line| line.trim().strip_prefix("module "))
            .map(|m| m.trim().trim_matches('"'))
        else {
            return;
        };

        if let Some(last) = module.rsplit('/').next() {
            self.name = last.to_string();
        }
        let host = module.split('/').next().unwrap_or_default();
        if host.contains('.') && module.matches('/').count() >= 2 {
            self.repository_url = Some(format!("https://{}", module));
        }
    }

    /// Parse `Name <email> (url)` into author and email.
    fn apply_person(&mut self, person: &str) {
        let name = person
            .split(['<', '('])
            .next()
            .map(str::trim)
            .unwrap_or_default();
        if !name.is_empty() {
            self.author = name.to_string();
        }
        if let Some(start) = person.find('<') {
            if let Some(end) = person[start..].find('>') {
                let email = person[start + 1..start + end].trim();
                if !email.is_empty() {
                    self.email = email.to_string();
                }
            }
        }
    }
}

fn clean_repo_url(url: &str) -> String {
    let url = url.trim_start_matches("git+");
    let url = url.trim_end_matches(".git");
    if let Some(rest) = url.strip_prefix("github:") {
        return format!("https://github.com/{}", rest);
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect_from_directory_name() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("widget");
        fs::create_dir(&project).unwrap();

        let info = ProjectInfo::detect(&project);
        assert_eq!(info.name, "widget");
        assert_eq!(info.license, "MIT");
        assert!(info.repository_url.is_none());
    }

    #[test]
    fn test_detect_from_cargo_manifest() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            r#"
[package]
name = "ferris"
description = "A crab"
license = "Apache-2.0"
authors = ["Ferris Crab <ferris@example.org>"]
repository = "https://github.com/crabs/ferris"
"#,
        )
        .unwrap();

        let info = ProjectInfo::detect(temp.path());
        assert_eq!(info.name, "ferris");
        assert_eq!(info.description, "A crab");
        assert_eq!(info.license, "Apache-2.0");
        assert_eq!(info.author, "Ferris Crab");
        assert_eq!(info.email, "ferris@example.org");
        assert_eq!(info.owner().as_deref(), Some("crabs"));
        assert_eq!(
            info.homepage_url.as_deref(),
            Some("https://github.com/crabs/ferris")
        );
    }

    #[test]
    fn test_detect_from_package_json() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{
  "name": "left-pad",
  "license": "ISC",
  "author": { "name": "Pad Person", "email": "pad@example.com" },
  "repository": { "type": "git", "url": "git+https://github.com/pads/left-pad.git" }
}"#,
        )
        .unwrap();

        let info = ProjectInfo::detect(temp.path());
        assert_eq!(info.name, "left-pad");
        assert_eq!(info.license, "ISC");
        assert_eq!(info.author, "Pad Person");
        assert_eq!(
            info.repository_url.as_deref(),
            Some("https://github.com/pads/left-pad")
        );
    }

    #[test]
    fn test_detect_from_go_mod() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("go.mod"),
            "module github.com/gophers/burrow\n\ngo 1.22\n",
        )
        .unwrap();

        let info = ProjectInfo::detect(temp.path());
        assert_eq!(info.name, "burrow");
        assert_eq!(
            info.repository_url.as_deref(),
            Some("https://github.com/gophers/burrow")
        );
        assert_eq!(info.owner().as_deref(), Some("gophers"));
    }

    #[test]
    fn test_cache_roundtrip_and_reset() {
        let temp = tempdir().unwrap();
        let mut info = ProjectInfo::with_name("cached");
        info.author = "Someone".to_string();
        info.save_cache(temp.path()).unwrap();

        let loaded = ProjectInfo::load_or_detect(temp.path()).unwrap();
        assert_eq!(loaded, info);

        assert!(ProjectInfo::reset_cache(temp.path()).unwrap());
        assert!(!ProjectInfo::reset_cache(temp.path()).unwrap());
        assert!(ProjectInfo::load_cache(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_cache_is_an_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(PROJECT_CACHE_FILE), "name: [unclosed").unwrap();

        let err = ProjectInfo::load_or_detect(temp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::Cache { .. }));
    }

    #[test]
    fn test_set_and_get_field() {
        let mut info = ProjectInfo::with_name("x");
        info.set_field("email", " dev@example.com ").unwrap();
        info.set_field("repository_url", "").unwrap();

        assert_eq!(info.get_field("email").unwrap(), "dev@example.com");
        assert!(info.repository_url.is_none());
        assert!(matches!(
            info.set_field("favourite_colour", "blue"),
            Err(ProjectError::UnknownField(_))
        ));
    }

    #[test]
    fn test_template_vars() {
        let mut info = ProjectInfo::with_name("demo");
        info.repository_url = Some("https://github.com/acme/demo".to_string());

        let vars = info.template_vars();
        assert_eq!(vars["name"], "demo");
        assert_eq!(vars["owner"], "acme");
        assert_eq!(vars["issues_url"], "https://github.com/acme/demo/issues");
    }
}
