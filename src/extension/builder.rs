use super::descriptor::{build_descriptor, BuildDescriptor};
use super::discovery::Discovery;
use super::error::{BuildError, Result};
use crate::config::BuildConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Creates the discovery pass described by `config` for `root`.
pub fn discover_sources(root: &Path, config: &BuildConfig) -> Result<Discovery> {
    config.validate()?;
    Discovery::with_options(root, config.suffix.clone(), config.discovery.clone())
}

/// Static include dirs followed by the output of every include probe.
pub fn resolve_include_dirs(config: &BuildConfig) -> Result<Vec<PathBuf>> {
    let mut dirs = config.include_dirs.clone();
    for probe in &config.include_probes {
        dirs.extend(probe.resolve()?);
    }
    Ok(dirs)
}

/// Scans `root` and builds one descriptor per discovered source.
///
/// All-or-nothing: the first discovery, probe or naming failure aborts the
/// whole run. Each call walks the filesystem again.
pub fn build_all(root: &Path, config: &BuildConfig) -> Result<Vec<BuildDescriptor>> {
    let start = Instant::now();
    let discovery = discover_sources(root, config)?;
    let include_dirs = resolve_include_dirs(config)?;
    let naming = config.naming();

    info!(
        root = %root.display(),
        suffix = %config.suffix,
        namespace_depth = naming.namespace_depth(),
        "Generating build descriptors"
    );

    let mut descriptors = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for source in &discovery {
        let source = source?;
        let descriptor = build_descriptor(
            source.as_path(),
            root,
            &naming,
            &include_dirs,
            &config.compile_flags,
        )?;

        if let Some(previous) = seen.get(descriptor.module_name()) {
            return Err(BuildError::naming(
                source.as_path(),
                format!(
                    "module name '{}' is already derived from {}",
                    descriptor.module_name(),
                    previous.display()
                ),
            ));
        }
        seen.insert(
            descriptor.module_name().to_string(),
            source.as_path().to_path_buf(),
        );

        debug!(
            module = descriptor.module_name(),
            source = %source,
            "Built descriptor"
        );
        descriptors.push(descriptor);
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(
        descriptors = descriptors.len(),
        elapsed_ms, "Descriptor generation completed"
    );

    Ok(descriptors)
}
