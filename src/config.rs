//! Configuration management for extbuild
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by the CLI).
//!
//! # Environment Variables
//!
//! - `EXTBUILD_ROOT`: Source root to scan - default: "src"
//! - `EXTBUILD_SUFFIX`: Source file suffix - default: ".pyx"
//! - `EXTBUILD_INCLUDE_DIRS`: Extra include directories, separated like `PATH`
//! - `EXTBUILD_INCLUDE_PROBE`: Command printing include directories
//! - `EXTBUILD_COMPILE_FLAGS`: Compiler flags, shell-quoted - default: "-O3 -Wall"
//! - `EXTBUILD_NAMESPACE_DEPTH`: Leading segments dropped from module names - default: "1"
//! - `EXTBUILD_MAX_DEPTH`: Maximum directory depth to scan
//! - `EXTBUILD_LOG_LEVEL`: Logging level - default: "info"
//! - `EXTBUILD_LOG_JSON`: Emit logs as JSON - default: "false"
//!
//! # Example
//!
//! ```toml
//! root = "src"
//! suffix = ".pyx"
//! compile_flags = ["-O3", "-Wall"]
//! include_probes = ["python3 -c 'import numpy; print(numpy.get_include())'"]
//!
//! [discovery]
//! sorted = true
//! exclude_patterns = ['^\.git$', '^__pycache__$']
//! ```

use crate::extension::{BuildError, DiscoveryOptions, IncludeProbe, ModuleNaming};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "extbuild.toml";

const DEFAULT_ROOT: &str = "src";
const DEFAULT_SUFFIX: &str = ".pyx";
const DEFAULT_COMPILE_FLAGS: &[&str] = &["-O3", "-Wall"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        BuildError::Configuration(err.to_string())
    }
}

/// Explicit configuration handed to [`crate::extension::build_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory scanned for sources; its own name is the namespace root
    pub root: PathBuf,

    /// File name suffix selecting extension sources
    pub suffix: String,

    pub include_dirs: Vec<PathBuf>,

    /// Commands resolved to include directories at build time
    pub include_probes: Vec<IncludeProbe>,

    pub compile_flags: Vec<String>,

    /// Leading path segments (counting the root itself) dropped from module names
    pub namespace_depth: usize,

    pub discovery: DiscoveryOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            suffix: DEFAULT_SUFFIX.to_string(),
            include_dirs: Vec::new(),
            include_probes: Vec::new(),
            compile_flags: DEFAULT_COMPILE_FLAGS.iter().map(|s| s.to_string()).collect(),
            namespace_depth: ModuleNaming::DEFAULT_NAMESPACE_DEPTH,
            discovery: DiscoveryOptions::default(),
        }
    }
}

impl BuildConfig {
    /// Loads defaults, the config file and the process environment.
    ///
    /// An explicit `path` must exist. Without one, `extbuild.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlays `EXTBUILD_*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("EXTBUILD_ROOT") {
            self.root = PathBuf::from(root);
        }

        if let Some(suffix) = lookup("EXTBUILD_SUFFIX") {
            self.suffix = suffix;
        }

        if let Some(dirs) = lookup("EXTBUILD_INCLUDE_DIRS") {
            self.include_dirs
                .extend(env::split_paths(&dirs).filter(|p| !p.as_os_str().is_empty()));
        }

        if let Some(command) = lookup("EXTBUILD_INCLUDE_PROBE") {
            self.include_probes.push(IncludeProbe::new(command));
        }

        if let Some(flags) = lookup("EXTBUILD_COMPILE_FLAGS") {
            self.compile_flags = shlex::split(&flags).ok_or_else(|| ConfigError::ParseError {
                field: "EXTBUILD_COMPILE_FLAGS".to_string(),
                error: "unbalanced quotes".to_string(),
            })?;
        }

        if let Some(depth) = lookup("EXTBUILD_NAMESPACE_DEPTH") {
            self.namespace_depth = parse_usize("EXTBUILD_NAMESPACE_DEPTH", &depth)?;
        }

        if let Some(depth) = lookup("EXTBUILD_MAX_DEPTH") {
            self.discovery.max_depth = Some(parse_usize("EXTBUILD_MAX_DEPTH", &depth)?);
        }

        Ok(())
    }

    /// Validates the configuration
    ///
    /// Checks that the suffix is a usable file name ending, the scan depth is
    /// positive and every exclude pattern compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffix.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Suffix must not be empty".to_string(),
            ));
        }
        if self.suffix.contains(['/', '\\']) {
            return Err(ConfigError::ValidationFailed(format!(
                "Suffix must not contain a path separator: {}",
                self.suffix
            )));
        }
        if self.discovery.max_depth == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Max depth must be at least 1".to_string(),
            ));
        }
        for pattern in &self.discovery.exclude_patterns {
            if let Err(e) = Regex::new(pattern) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid exclude pattern '{}': {}",
                    pattern, e
                )));
            }
        }

        Ok(())
    }

    pub fn naming(&self) -> ModuleNaming {
        ModuleNaming::new(self.suffix.clone()).with_namespace_depth(self.namespace_depth)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("root".to_string(), self.root.display().to_string());
        map.insert("suffix".to_string(), self.suffix.clone());
        map.insert(
            "include_dirs".to_string(),
            join_display(self.include_dirs.iter().map(|p| p.display().to_string())),
        );
        map.insert(
            "include_probes".to_string(),
            join_display(self.include_probes.iter().map(|p| p.command().to_string())),
        );
        map.insert("compile_flags".to_string(), self.compile_flags.join(" "));
        map.insert(
            "namespace_depth".to_string(),
            self.namespace_depth.to_string(),
        );
        map.insert(
            "max_depth".to_string(),
            self.discovery
                .max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unlimited".to_string()),
        );
        map.insert(
            "follow_links".to_string(),
            self.discovery.follow_links.to_string(),
        );
        map.insert("sorted".to_string(), self.discovery.sorted.to_string());
        map.insert(
            "exclude_patterns".to_string(),
            join_display(self.discovery.exclude_patterns.iter().cloned()),
        );

        map
    }
}

fn parse_usize(field: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|e| ConfigError::ParseError {
        field: field.to_string(),
        error: e.to_string(),
    })
}

fn join_display(items: impl Iterator<Item = String>) -> String {
    let joined: Vec<String> = items.collect();
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined.join(", ")
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Extbuild Configuration:")?;
        for (key, value) in self.to_display_map() {
            writeln!(f, "  {}: {}", key, value)?;
        }
        Ok(())
    }
}
