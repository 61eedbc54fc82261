//! Run configuration for a bundle

use crate::error::CoreError;
use crate::error::Result;
use gobundle_ast::MinifyLevel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Directories skipped unless the caller says otherwise
pub const DEFAULT_EXCLUDES: &[&str] = &["vendor", "testdata"];

pub const BUNDLE_SUFFIX: &str = "_bundle.txt";

#[allow(clippy::unwrap_used)]
static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Project root; `go.mod` is read from here
    pub project_dir: PathBuf,

    /// Bundle path, derived from the project directory name when unset
    pub output_file: Option<PathBuf>,

    /// Relative path prefixes left out of the walk
    pub exclude: Vec<String>,

    /// Emit the package → files structure in the metadata line
    pub include_meta: bool,

    pub level: MinifyLevel,

    /// Skip files that fail to parse instead of aborting the run
    pub keep_going: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            output_file: None,
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            include_meta: false,
            level: MinifyLevel::default(),
            keep_going: false,
        }
    }
}

impl BundleConfig {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub const fn include_meta(mut self, include: bool) -> Self {
        self.include_meta = include;
        self
    }

    pub const fn with_level(mut self, level: MinifyLevel) -> Self {
        self.level = level;
        self
    }

    pub const fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join("go.mod")
    }

    /// The configured output file, or `<project name>_bundle.txt` in the
    /// current directory
    pub fn output_path(&self) -> PathBuf {
        match &self.output_file {
            Some(path) => path.clone(),
            None => PathBuf::from(default_output_name(&self.project_dir)),
        }
    }
}

/// `<sanitized directory name>_bundle.txt`. Relative names like `.` are
/// resolved against the current directory first.
pub fn default_output_name(project_dir: &Path) -> String {
    let resolved = std::fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    let name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    format!("{}{BUNDLE_SUFFIX}", sanitize_name(&name))
}

pub fn sanitize_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "_").into_owned()
}
