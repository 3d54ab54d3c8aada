use super::error::{BuildError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Path to a discovered extension source file.
///
/// Only produced by [`Discovery`], so it always lies under the walked root
/// and its file name ends with the configured suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourcePath(PathBuf);

impl SourcePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for SourcePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// Maximum walk depth below the root; `None` walks the whole tree
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    /// Regexes matched against entry names; matching directories are pruned.
    /// Empty by default, see [`DiscoveryOptions::common_excludes`].
    pub exclude_patterns: Vec<String>,
    /// Sort entries by file name at every level
    pub sorted: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_links: false,
            exclude_patterns: Vec::new(),
            sorted: false,
        }
    }
}

impl DiscoveryOptions {
    /// VCS metadata and Python cache/virtualenv directories
    pub fn common_excludes() -> Vec<String> {
        vec![
            r"^\.git$".to_string(),
            r"^\.hg$".to_string(),
            r"^\.svn$".to_string(),
            r"^__pycache__$".to_string(),
            r"^\.tox$".to_string(),
            r"^\.venv$".to_string(),
            r"^\.eggs$".to_string(),
        ]
    }
}

/// Lazy, restartable scan for extension sources under a root directory.
///
/// Every iteration walks the filesystem again; nothing is cached between
/// passes.
#[derive(Debug)]
pub struct Discovery {
    root: PathBuf,
    suffix: String,
    options: DiscoveryOptions,
    excludes: Vec<Regex>,
}

impl Discovery {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Result<Self> {
        Self::with_options(root, suffix, DiscoveryOptions::default())
    }

    pub fn with_options(
        root: impl Into<PathBuf>,
        suffix: impl Into<String>,
        options: DiscoveryOptions,
    ) -> Result<Self> {
        let root = root.into();
        let suffix = suffix.into();

        if !root.exists() {
            return Err(BuildError::Configuration(format!(
                "Root directory does not exist: {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(BuildError::Configuration(format!(
                "Root path is not a directory: {}",
                root.display()
            )));
        }
        if suffix.is_empty() {
            return Err(BuildError::Configuration(
                "Source suffix must not be empty".to_string(),
            ));
        }

        let excludes = options
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    BuildError::Configuration(format!(
                        "Invalid exclude pattern '{}': {}",
                        pattern, e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            root = %root.display(),
            suffix = %suffix,
            excludes = excludes.len(),
            "Discovery initialized"
        );

        Ok(Self {
            root,
            suffix,
            options,
            excludes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn iter(&self) -> DiscoveryIter<'_> {
        let mut walker = WalkDir::new(&self.root).follow_links(self.options.follow_links);
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }
        if self.options.sorted {
            walker = walker.sort_by_file_name();
        }

        DiscoveryIter {
            discovery: self,
            inner: walker.into_iter(),
        }
    }

    /// Runs one full pass and collects it, failing on the first walk error.
    pub fn collect_paths(&self) -> Result<Vec<SourcePath>> {
        self.iter().collect()
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.excludes.iter().any(|re| re.is_match(&name))
    }

    fn matches_suffix(&self, name: &OsStr) -> bool {
        name.to_string_lossy().ends_with(self.suffix.as_str())
    }
}

impl<'a> IntoIterator for &'a Discovery {
    type Item = Result<SourcePath>;
    type IntoIter = DiscoveryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One traversal pass over a [`Discovery`].
pub struct DiscoveryIter<'a> {
    discovery: &'a Discovery,
    inner: walkdir::IntoIter,
}

impl Iterator for DiscoveryIter<'_> {
    type Item = Result<SourcePath>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(BuildError::Walk(err))),
            };

            // The root itself is never subject to exclusion.
            if entry.depth() > 0 && self.discovery.is_excluded(entry.file_name()) {
                if entry.file_type().is_dir() {
                    trace!(path = %entry.path().display(), "Pruning excluded directory");
                    self.inner.skip_current_dir();
                }
                continue;
            }

            // Without follow_links a symlinked file reports as a symlink.
            let is_file = if entry.path_is_symlink() {
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                continue;
            }

            if self.discovery.matches_suffix(entry.file_name()) {
                trace!(path = %entry.path().display(), "Discovered source");
                return Some(Ok(SourcePath(entry.into_path())));
            }
        }
    }
}

/// Scans `root` for files ending in `suffix` with default options.
pub fn discover(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Result<Discovery> {
    Discovery::new(root, suffix)
}
