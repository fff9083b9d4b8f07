use crate::probe::{Probe, Stat};
use std::path::Path;
use thiserror::Error;

/// Outcome of validating an existing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(String),
    Invalid(String),
}

/// The validator could not reach a verdict at all.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidatorError(pub String);

/// Judges a path that exists. `label` is the pattern as written in the rule and
/// is what messages refer to.
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(
        &self,
        probe: &dyn Probe,
        path: &Path,
        label: &str,
        stat: &dyn Stat,
    ) -> Result<Verdict, ValidatorError>;
}

pub struct ExistsValidator;

impl Validator for ExistsValidator {
    fn name(&self) -> &str {
        "exists"
    }

    fn validate(
        &self,
        _probe: &dyn Probe,
        _path: &Path,
        label: &str,
        _stat: &dyn Stat,
    ) -> Result<Verdict, ValidatorError> {
        Ok(Verdict::Valid(format!("Found {}", label)))
    }
}

pub struct MinSizeValidator {
    min_bytes: u64,
}

impl MinSizeValidator {
    pub fn new(min_bytes: u64) -> Self {
        Self { min_bytes }
    }

    pub fn min_bytes(&self) -> u64 {
        self.min_bytes
    }
}

impl Validator for MinSizeValidator {
    fn name(&self) -> &str {
        "min-size"
    }

    fn validate(
        &self,
        _probe: &dyn Probe,
        _path: &Path,
        label: &str,
        stat: &dyn Stat,
    ) -> Result<Verdict, ValidatorError> {
        if stat.is_directory() {
            return Ok(Verdict::Invalid(format!(
                "{} is a directory, expected a file",
                label
            )));
        }

        let size = stat.size_in_bytes();
        if size < self.min_bytes {
            Ok(Verdict::Invalid(format!(
                "{} exists but is empty or too short ({} bytes, minimum {})",
                label, size, self.min_bytes
            )))
        } else {
            Ok(Verdict::Valid(format!("Found {} ({} bytes)", label, size)))
        }
    }
}

pub struct NonEmptyDirValidator;

impl Validator for NonEmptyDirValidator {
    fn name(&self) -> &str {
        "non-empty-dir"
    }

    fn validate(
        &self,
        probe: &dyn Probe,
        path: &Path,
        label: &str,
        stat: &dyn Stat,
    ) -> Result<Verdict, ValidatorError> {
        if !stat.is_directory() {
            return Ok(Verdict::Invalid(format!(
                "{} exists but is not a directory",
                label
            )));
        }

        let entries = probe
            .read_dir_len(path)
            .map_err(|e| ValidatorError(format!("cannot check contents of {}: {}", label, e)))?;

        if entries == 0 {
            Ok(Verdict::Invalid(format!("{} exists but is empty", label)))
        } else {
            Ok(Verdict::Valid(format!("Found {} ({} entries)", label, entries)))
        }
    }
}
