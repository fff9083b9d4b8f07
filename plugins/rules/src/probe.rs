//! Filesystem access for rules and fixes.
//!
//! Everything that stats, lists, walks or writes goes through [`Probe`], so the
//! engine and the fixer can be exercised against substitute implementations.

use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into when searching the tree.
pub const SKIPPED_DIRS: &[&str] = &[".git", "vendor", "node_modules", "build", "dist"];

/// What validators may know about a filesystem entry.
pub trait Stat {
    fn is_directory(&self) -> bool;
    fn size_in_bytes(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub len: u64,
}

impl FileStat {
    pub fn file(len: u64) -> Self {
        Self { is_dir: false, len }
    }

    pub fn dir() -> Self {
        Self { is_dir: true, len: 0 }
    }
}

impl Stat for FileStat {
    fn is_directory(&self) -> bool {
        self.is_dir
    }

    fn size_in_bytes(&self) -> u64 {
        self.len
    }
}

pub trait Probe: Send + Sync {
    /// `None` when nothing exists at `path`.
    fn stat(&self, path: &Path) -> Option<FileStat>;

    /// Number of entries in a directory.
    fn read_dir_len(&self, path: &Path) -> io::Result<usize>;

    /// Files under `root` whose file name matches `pattern`, skipping [`SKIPPED_DIRS`].
    fn find_files(&self, root: &Path, pattern: &Pattern) -> Vec<PathBuf>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Write a file, creating missing parent directories.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`Probe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl Probe for OsProbe {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        let metadata = fs::metadata(path).ok()?;
        Some(FileStat {
            is_dir: metadata.is_dir(),
            len: if metadata.is_dir() { 0 } else { metadata.len() },
        })
    }

    fn read_dir_len(&self, path: &Path) -> io::Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(path)? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    fn find_files(&self, root: &Path, pattern: &Pattern) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !SKIPPED_DIRS
                        .iter()
                        .any(|skip| entry.file_name().to_string_lossy() == *skip)
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| pattern.matches(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
            .collect()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stat_reports_kind_and_size() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();

        let probe = OsProbe;
        assert_eq!(probe.stat(&temp.path().join("a.txt")), Some(FileStat::file(5)));
        assert_eq!(probe.stat(&temp.path().join("dir")), Some(FileStat::dir()));
        assert_eq!(probe.stat(&temp.path().join("missing")), None);
    }

    #[test]
    fn test_read_dir_len_counts_files_and_dirs() {
        let temp = tempdir().unwrap();
        let probe = OsProbe;
        assert_eq!(probe.read_dir_len(temp.path()).unwrap(), 0);

        fs::create_dir(temp.path().join("nested")).unwrap();
        assert_eq!(probe.read_dir_len(temp.path()).unwrap(), 1);

        fs::write(temp.path().join("file"), "").unwrap();
        assert_eq!(probe.read_dir_len(temp.path()).unwrap(), 2);
    }

    #[test]
    fn test_find_files_skips_excluded_dirs() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("pkg/api")).unwrap();
        fs::create_dir_all(temp.path().join("vendor/lib")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules/x")).unwrap();
        fs::write(temp.path().join("pkg/api/api_test.go"), "package api").unwrap();
        fs::write(temp.path().join("vendor/lib/lib_test.go"), "package lib").unwrap();
        fs::write(temp.path().join("node_modules/x/x_test.go"), "package x").unwrap();
        fs::write(temp.path().join("main.go"), "package main").unwrap();

        let pattern = Pattern::new("*_test.go").unwrap();
        let found = OsProbe.find_files(temp.path(), &pattern);

        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("pkg/api/api_test.go"));
    }

    #[test]
    fn test_write_file_creates_parents() {
        let temp = tempdir().unwrap();
        let target = temp.path().join(".github/ISSUE_TEMPLATE/bug_report.md");

        OsProbe.write_file(&target, "# Bug").unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "# Bug");
    }
}
