use crate::content::ContentSource;
use crate::hooks::hook_for;
use crate::multi::{self, GeneratedFile};
use crate::FixError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use structlint_core::{prompt_confirm, NonInteractiveMode};
use structlint_project::ProjectInfo;
use structlint_rules::pattern::is_glob;
use structlint_rules::{
    fix_kind, ActiveRule, Context, FixSpec, FolderSeed, MultiFileKind, PatternKind, Probe,
};

pub const DEFAULT_PREVIEW_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub dry_run: bool,
    pub interactive: bool,
    pub backup: bool,
    pub preview_lines: usize,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            interactive: false,
            backup: false,
            preview_lines: DEFAULT_PREVIEW_LINES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixContext {
    pub project_path: PathBuf,
    pub project_type: String,
    pub project_info: ProjectInfo,
    pub rules: BTreeMap<String, ActiveRule>,
    pub options: FixOptions,
}

impl FixContext {
    pub fn new(context: Context, options: FixOptions) -> Self {
        Self {
            project_path: context.project_path,
            project_type: context.project_type,
            project_info: context.project_info,
            rules: context.rules,
            options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    CreateFile,
    CreateFolder,
    ModifyFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Relative to the project root.
    pub path: PathBuf,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixStatus {
    Fixed,
    Skipped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixResult {
    pub rule_id: String,
    pub status: FixStatus,
    pub message: String,
    pub changes: Vec<Change>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FixResult {
    fn fixed(rule_id: &str, message: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            status: FixStatus::Fixed,
            message: message.into(),
            changes,
            error: None,
        }
    }

    fn skipped(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            status: FixStatus::Skipped,
            message: message.into(),
            changes: Vec::new(),
            error: None,
        }
    }

    fn failed(rule_id: &str, error: &FixError) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            status: FixStatus::Error,
            message: "Fix failed".to_string(),
            changes: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FixSummary {
    pub fixed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
    pub changes: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixPlan {
    pub dry_run: bool,
    pub results: Vec<FixResult>,
    pub change_count: usize,
}

impl FixPlan {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn push(&mut self, result: FixResult) {
        if result.status != FixStatus::Error {
            self.change_count += result.changes.len();
        }
        self.results.push(result);
    }

    pub fn summary(&self) -> FixSummary {
        let mut summary = FixSummary {
            total: self.results.len(),
            changes: self.change_count,
            ..FixSummary::default()
        };
        for result in &self.results {
            match result.status {
                FixStatus::Fixed => summary.fixed += 1,
                FixStatus::Skipped => summary.skipped += 1,
                FixStatus::Error => summary.failed += 1,
            }
        }
        summary
    }
}

/// Yes/no capability used before each mutation in interactive mode.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, question: &str) -> Result<bool, FixError>;
}

/// Asks on the terminal; fails instead of guessing when there is no TTY.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> Result<bool, FixError> {
        prompt_confirm(question, true, NonInteractiveMode::Fail)
            .map_err(|e| FixError::Prompt(e.to_string()))
    }
}

pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _question: &str) -> Result<bool, FixError> {
        Ok(true)
    }
}

/// First `lines` lines of `content`, with a marker for the rest.
pub fn preview(content: &str, lines: usize) -> String {
    let all: Vec<&str> = content.lines().collect();
    if all.len() <= lines {
        return all.join("\n");
    }
    format!(
        "{}\n... ({} more lines)",
        all[..lines].join("\n"),
        all.len() - lines
    )
}

pub struct Fixer<'a> {
    context: &'a FixContext,
    probe: &'a dyn Probe,
    content: &'a dyn ContentSource,
    confirmer: &'a dyn Confirmer,
}

impl<'a> Fixer<'a> {
    pub fn new(
        context: &'a FixContext,
        probe: &'a dyn Probe,
        content: &'a dyn ContentSource,
        confirmer: &'a dyn Confirmer,
    ) -> Self {
        Self {
            context,
            probe,
            content,
            confirmer,
        }
    }

    /// Fix rules one at a time, in the order given. A failure never stops the batch.
    pub fn fix_all<S: AsRef<str>>(&self, rule_ids: &[S]) -> FixPlan {
        let mut plan = FixPlan::new(self.context.options.dry_run);
        for id in rule_ids {
            plan.push(self.fix(id.as_ref()));
        }
        plan
    }

    pub fn can_fix(&self, rule_id: &str) -> bool {
        self.fix_target(rule_id).is_ok()
    }

    pub fn fix(&self, rule_id: &str) -> FixResult {
        let (rule, pattern) = match self.fix_target(rule_id) {
            Ok(target) => target,
            Err(reason) => return FixResult::skipped(rule_id, reason),
        };

        let outcome = match (fix_kind(&rule.rule, pattern), rule.rule.fix) {
            (PatternKind::Multiple, FixSpec::MultiFile(kind)) => {
                self.fix_multiple(rule_id, pattern, kind)
            }
            (PatternKind::Folder, FixSpec::Folder(seed)) => {
                self.fix_folder(rule_id, pattern, Some(seed))
            }
            (PatternKind::Folder, _) => self.fix_folder(rule_id, pattern, None),
            _ => self.fix_file(rule_id, pattern),
        };

        match outcome {
            Ok(result) => {
                if result.status == FixStatus::Fixed && !self.context.options.dry_run {
                    tracing::info!("Fixed {}: {}", rule_id, result.message);
                }
                result
            }
            Err(e) => {
                tracing::warn!("Failed to fix {}: {}", rule_id, e);
                FixResult::failed(rule_id, &e)
            }
        }
    }

    /// The rule and the pattern a fix would create, or why there is none.
    fn fix_target(&self, rule_id: &str) -> Result<(&'a ActiveRule, &'a str), String> {
        let rule = self
            .context
            .rules
            .get(rule_id)
            .ok_or_else(|| format!("Unknown rule '{}'", rule_id))?;
        if !rule.enabled {
            return Err(format!("Rule '{}' is disabled", rule_id));
        }
        if rule.rule.fix == FixSpec::None {
            return Err("No automatic fix available".to_string());
        }
        let patterns = rule
            .patterns_for(&self.context.project_type)
            .ok_or_else(|| format!("Not applicable to {} projects", self.context.project_type))?;
        let pattern = patterns[0].as_str();
        if is_glob(pattern) {
            return Err("No automatic fix available".to_string());
        }
        Ok((rule, pattern))
    }

    fn absolute(&self, relative: &str) -> PathBuf {
        self.context
            .project_path
            .join(relative.trim_end_matches('/'))
    }

    fn confirm(&self, question: &str) -> Result<bool, FixError> {
        if !self.context.options.interactive || self.context.options.dry_run {
            return Ok(true);
        }
        self.confirmer.confirm(question)
    }

    /// Whether a file target must be left alone: anything but a missing or
    /// zero-byte file.
    fn file_is_settled(&self, path: &Path) -> bool {
        match self.probe.stat(path) {
            Some(stat) => stat.is_dir || stat.len > 0,
            None => false,
        }
    }

    fn fix_file(&self, rule_id: &str, pattern: &str) -> Result<FixResult, FixError> {
        let target = self.absolute(pattern);
        if self.file_is_settled(&target) {
            return Ok(FixResult::skipped(
                rule_id,
                format!("{} already exists", pattern),
            ));
        }

        if !self.confirm(&format!("Create {}?", pattern))? {
            return Ok(FixResult::skipped(rule_id, "Declined"));
        }

        let content = self.content.generate(rule_id, pattern);
        let change = self.write(&GeneratedFile::new("", pattern, content))?;
        Ok(FixResult::fixed(
            rule_id,
            change.description.clone(),
            vec![change],
        ))
    }

    fn fix_folder(
        &self,
        rule_id: &str,
        pattern: &str,
        seed: Option<FolderSeed>,
    ) -> Result<FixResult, FixError> {
        let folder = pattern.trim_end_matches('/');
        let target = self.absolute(folder);
        let existing = self.probe.stat(&target);

        match existing {
            Some(stat) if !stat.is_dir => {
                return Ok(FixResult::skipped(
                    rule_id,
                    format!("{} exists and is not a folder", folder),
                ));
            }
            Some(_) => {
                let entries =
                    self.probe
                        .read_dir_len(&target)
                        .map_err(|source| FixError::Read {
                            path: target.clone(),
                            source,
                        })?;
                if entries > 0 {
                    return Ok(FixResult::skipped(
                        rule_id,
                        format!("{}/ already exists", folder),
                    ));
                }
            }
            None => {}
        }

        if !self.confirm(&format!("Create folder {}/?", folder))? {
            return Ok(FixResult::skipped(rule_id, "Declined"));
        }

        let mut changes = Vec::new();
        if existing.is_none() {
            if !self.context.options.dry_run {
                self.probe
                    .create_dir_all(&target)
                    .map_err(|source| FixError::Io {
                        path: target.clone(),
                        source,
                    })?;
            }
            changes.push(Change {
                kind: ChangeKind::CreateFolder,
                path: PathBuf::from(folder),
                description: format!("Create folder {}/", folder),
                preview: None,
            });
        }

        if let Some(seed) = seed {
            let hook = hook_for(seed);
            tracing::debug!("Seeding {} with {} hook", folder, hook.name());
            for file in hook.seed_files(folder, &self.context.project_type) {
                changes.push(self.write(&file)?);
            }
        }

        Ok(FixResult::fixed(
            rule_id,
            format!("Created {}/", folder),
            changes,
        ))
    }

    fn fix_multiple(
        &self,
        rule_id: &str,
        root: &str,
        kind: MultiFileKind,
    ) -> Result<FixResult, FixError> {
        let pending: Vec<GeneratedFile> = self
            .content
            .generate_files(kind, root)
            .into_iter()
            .filter(|file| !self.file_is_settled(&self.absolute(&file.path)))
            .collect();

        if pending.is_empty() {
            return Ok(FixResult::skipped(
                rule_id,
                format!("All {} already exist", multi::describe(kind)),
            ));
        }

        let question = format!(
            "Create {} ({} files) in {}?",
            multi::describe(kind),
            pending.len(),
            root
        );
        if !self.confirm(&question)? {
            return Ok(FixResult::skipped(rule_id, "Declined"));
        }

        let mut changes = Vec::with_capacity(pending.len());
        for file in &pending {
            changes.push(self.write(file)?);
        }

        Ok(FixResult::fixed(
            rule_id,
            format!("Created {} in {}", multi::describe(kind), root),
            changes,
        ))
    }

    /// Write one file (or describe it in dry-run), backing up a zero-byte original.
    fn write(&self, file: &GeneratedFile) -> Result<Change, FixError> {
        let target = self.absolute(&file.path);
        let options = &self.context.options;
        let overwriting = self.probe.stat(&target).is_some();

        let mut description = if overwriting {
            format!("Overwrite empty {}", file.path)
        } else {
            format!("Create {}", file.path)
        };

        if overwriting && options.backup {
            let backup = backup_path(&target);
            if !options.dry_run {
                self.probe
                    .copy_file(&target, &backup)
                    .map_err(|source| FixError::Io {
                        path: backup.clone(),
                        source,
                    })?;
            }
            description.push_str(&format!(" (backup: {}.bak)", file.path));
        }

        if !options.dry_run {
            self.probe
                .write_file(&target, &file.content)
                .map_err(|source| FixError::Io {
                    path: target.clone(),
                    source,
                })?;
        }

        Ok(Change {
            kind: if overwriting {
                ChangeKind::ModifyFile
            } else {
                ChangeKind::CreateFile
            },
            path: PathBuf::from(&file.path),
            description,
            preview: options
                .dry_run
                .then(|| preview(&file.content, options.preview_lines)),
        })
    }
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let content = "a\nb\nc\nd\ne\n";
        assert_eq!(preview(content, 2), "a\nb\n... (3 more lines)");
        assert_eq!(preview(content, 5), "a\nb\nc\nd\ne");
    }

    #[test]
    fn test_plan_counts_only_successful_changes() {
        let change = Change {
            kind: ChangeKind::CreateFile,
            path: PathBuf::from("LICENSE"),
            description: "Create LICENSE".to_string(),
            preview: None,
        };
        let mut plan = FixPlan::new(false);
        plan.push(FixResult::fixed("license", "ok", vec![change.clone()]));
        plan.push(FixResult {
            changes: vec![change],
            ..FixResult::failed("readme", &FixError::Prompt("no tty".to_string()))
        });
        plan.push(FixResult::skipped("docs", "exists"));

        let summary = plan.summary();
        assert_eq!(summary.fixed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.changes, 1);
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/p/README.md")),
            PathBuf::from("/p/README.md.bak")
        );
    }
}
