use super::commands::{BuildArgs, ConfigArgs, DiscoverArgs, ScanArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::BuildConfig;
use crate::extension::{build_all, discover_sources, DiscoveryOptions, IncludeProbe};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// Builds the effective configuration: file and environment, then CLI flags.
pub fn load_config(config_path: Option<&Path>) -> Result<BuildConfig> {
    let config = BuildConfig::load(config_path).context("Failed to load configuration")?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}

fn apply_scan_args(config: &mut BuildConfig, scan: &ScanArgs) {
    if let Some(root) = &scan.root {
        config.root = root.clone();
    }
    if let Some(suffix) = &scan.suffix {
        config.suffix = suffix.clone();
    }
    if let Some(depth) = scan.max_depth {
        config.discovery.max_depth = Some(depth);
    }
    if scan.sorted {
        config.discovery.sorted = true;
    }
    if scan.follow_links {
        config.discovery.follow_links = true;
    }
    if scan.exclude_common {
        config
            .discovery
            .exclude_patterns
            .extend(DiscoveryOptions::common_excludes());
    }
    config
        .discovery
        .exclude_patterns
        .extend(scan.excludes.iter().cloned());
}

fn apply_build_args(config: &mut BuildConfig, args: &BuildArgs) {
    apply_scan_args(config, &args.scan);
    config.include_dirs.extend(args.include_dirs.iter().cloned());
    config
        .include_probes
        .extend(args.include_probes.iter().map(IncludeProbe::new));
    if !args.flags.is_empty() {
        config.compile_flags = args.flags.clone();
    }
    if let Some(depth) = args.namespace_depth {
        config.namespace_depth = depth;
    }
}

fn write_output(rendered: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!(path = %path.display(), "Output written");
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }
    Ok(())
}

fn ensure_trailing_newline(rendered: &str) -> String {
    if rendered.ends_with('\n') {
        rendered.to_string()
    } else {
        format!("{}\n", rendered)
    }
}

fn run_build(args: &BuildArgs, config_path: Option<&Path>) -> Result<usize> {
    let mut config = load_config(config_path)?;
    apply_build_args(&mut config, args);

    let descriptors = build_all(&config.root, &config)?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let rendered = formatter.format(&descriptors)?;
    write_output(&rendered, args.output.as_deref())?;

    Ok(descriptors.len())
}

fn run_discover(args: &DiscoverArgs, config_path: Option<&Path>) -> Result<usize> {
    let mut config = load_config(config_path)?;
    apply_scan_args(&mut config, &args.scan);

    let discovery = discover_sources(&config.root, &config)?;
    let sources = discovery.collect_paths()?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    write_output(&formatter.format_sources(&sources)?, None)?;

    Ok(sources.len())
}

fn run_config(args: &ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    write_output(&formatter.format_config(&config)?, None)
}

pub fn handle_build(args: &BuildArgs, config_path: Option<&Path>) -> i32 {
    info!("Starting descriptor generation");
    match run_build(args, config_path) {
        Ok(count) => {
            info!(descriptors = count, "Build descriptors generated");
            0
        }
        Err(e) => {
            error!("Build failed: {:#}", e);
            1
        }
    }
}

pub fn handle_discover(args: &DiscoverArgs, config_path: Option<&Path>) -> i32 {
    match run_discover(args, config_path) {
        Ok(count) => {
            debug!(sources = count, "Discovery finished");
            0
        }
        Err(e) => {
            error!("Discovery failed: {:#}", e);
            1
        }
    }
}

pub fn handle_config(args: &ConfigArgs, config_path: Option<&Path>) -> i32 {
    match run_config(args, config_path) {
        Ok(()) => 0,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            1
        }
    }
}
