use super::error::{BuildError, Result};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Everything the native toolchain needs to compile one extension module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BuildDescriptor {
    module_name: String,
    sources: Vec<PathBuf>,
    include_dirs: Vec<PathBuf>,
    compile_flags: Vec<String>,
}

impl BuildDescriptor {
    pub(crate) fn new(
        module_name: String,
        sources: Vec<PathBuf>,
        include_dirs: &[PathBuf],
        compile_flags: &[String],
    ) -> Self {
        let mut unique_dirs: Vec<PathBuf> = Vec::with_capacity(include_dirs.len());
        for dir in include_dirs {
            if !unique_dirs.contains(dir) {
                unique_dirs.push(dir.clone());
            }
        }

        Self {
            module_name,
            sources,
            include_dirs: unique_dirs,
            compile_flags: compile_flags.to_vec(),
        }
    }

    /// Dotted module name, e.g. `plot.fast`
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn compile_flags(&self) -> &[String] {
        &self.compile_flags
    }
}

/// Rule for turning a source path into a dotted module name.
///
/// The path is taken relative to the root's parent, the suffix is stripped
/// from the file name and the first `namespace_depth` segments are dropped.
/// With the default depth of 1 the root directory acts as a namespace
/// container: `src/hwt/plot/fast.pyx` under root `src` becomes `hwt.plot.fast`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNaming {
    suffix: String,
    namespace_depth: usize,
}

impl ModuleNaming {
    pub const DEFAULT_NAMESPACE_DEPTH: usize = 1;

    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            namespace_depth: Self::DEFAULT_NAMESPACE_DEPTH,
        }
    }

    pub fn with_namespace_depth(mut self, depth: usize) -> Self {
        self.namespace_depth = depth;
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn namespace_depth(&self) -> usize {
        self.namespace_depth
    }

    pub fn derive(&self, source: &Path, root: &Path) -> Result<String> {
        let relative = source.strip_prefix(root).map_err(|_| BuildError::Path {
            path: source.to_path_buf(),
            root: root.to_path_buf(),
        })?;

        let mut segments = Vec::new();

        // Depth 0 keeps the root's own name as the leading segment.
        if self.namespace_depth == 0 {
            let root_name = root.file_name().ok_or_else(|| {
                BuildError::naming(source, "root directory has no name to use as a namespace")
            })?;
            segments.push(segment(root_name, source)?);
        }

        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(segment(part, source)?),
                Component::CurDir => {}
                _ => {
                    return Err(BuildError::naming(
                        source,
                        "relative path contains a non-normal component",
                    ))
                }
            }
        }

        let file_name = segments
            .pop()
            .ok_or_else(|| BuildError::naming(source, "source path is the root directory"))?;
        let stem = file_name.strip_suffix(self.suffix.as_str()).ok_or_else(|| {
            BuildError::naming(
                source,
                format!("file name does not end with '{}'", self.suffix),
            )
        })?;
        if stem.is_empty() {
            return Err(BuildError::naming(source, "empty file stem"));
        }
        segments.push(stem.to_string());

        // The root segment is implicit (never pushed) for depth >= 1.
        let skip = self.namespace_depth.saturating_sub(1);
        if skip >= segments.len() {
            return Err(BuildError::naming(
                source,
                format!(
                    "namespace depth {} leaves no module name segments",
                    self.namespace_depth
                ),
            ));
        }

        let kept = &segments[skip..];
        if let Some(bad) = kept.iter().find(|s| s.contains('.')) {
            return Err(BuildError::naming(
                source,
                format!("segment '{}' contains '.'", bad),
            ));
        }

        Ok(kept.join("."))
    }
}

fn segment(part: &OsStr, source: &Path) -> Result<String> {
    let part = part
        .to_str()
        .ok_or_else(|| BuildError::naming(source, "path segment is not valid UTF-8"))?;
    if part.is_empty() {
        return Err(BuildError::naming(source, "empty path segment"));
    }
    Ok(part.to_string())
}

/// Derives the module name for `source` and assembles its descriptor.
///
/// Pure: include directories are not checked for existence and flags are
/// passed through untouched.
pub fn build_descriptor(
    source: &Path,
    root: &Path,
    naming: &ModuleNaming,
    include_dirs: &[PathBuf],
    compile_flags: &[String],
) -> Result<BuildDescriptor> {
    let module_name = naming.derive(source, root)?;
    Ok(BuildDescriptor::new(
        module_name,
        vec![source.to_path_buf()],
        include_dirs,
        compile_flags,
    ))
}
