//! Output formatting for multiple formats
//!
//! This module provides formatters for JSON, YAML and human-readable text.
//! Descriptors, discovered source lists and the effective configuration all
//! go through the same [`OutputFormatter`].
//!
//! # Example
//!
//! ```no_run
//! use extbuild::cli::output::{OutputFormat, OutputFormatter};
//! use extbuild::{build_all, BuildConfig};
//! use std::path::Path;
//!
//! let config = BuildConfig::default();
//! let descriptors = build_all(Path::new("src"), &config).unwrap();
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format(&descriptors).unwrap());
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::BuildConfig;
use crate::extension::{BuildDescriptor, SourcePath};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for build descriptors
pub struct OutputFormatter {
    format: OutputFormat,
}

#[derive(Serialize)]
struct DescriptorReport<'a> {
    count: usize,
    extensions: &'a [BuildDescriptor],
}

#[derive(Serialize)]
struct SourceReport<'a> {
    count: usize,
    sources: &'a [SourcePath],
}

impl OutputFormatter {
    /// Creates a new output formatter with the specified format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats generated descriptors according to the configured format
    pub fn format(&self, descriptors: &[BuildDescriptor]) -> Result<String> {
        let report = DescriptorReport {
            count: descriptors.len(),
            extensions: descriptors,
        };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize build descriptors to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&report)
                .context("Failed to serialize build descriptors to YAML"),
            OutputFormat::Human => Ok(self.format_human(descriptors)),
        }
    }

    /// Formats a list of discovered sources
    pub fn format_sources(&self, sources: &[SourcePath]) -> Result<String> {
        let report = SourceReport {
            count: sources.len(),
            sources,
        };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize source list to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&report)
                .context("Failed to serialize source list to YAML"),
            OutputFormat::Human => Ok(self.format_sources_human(sources)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &BuildConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_human(&self, descriptors: &[BuildDescriptor]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\u{2713} Extension Modules ({})\n",
            descriptors.len()
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        if descriptors.is_empty() {
            output.push_str("No extension sources found\n");
            return output;
        }

        for descriptor in descriptors {
            output.push_str(&format!("{}\n", descriptor.module_name()));
            for source in descriptor.sources() {
                output.push_str(&format!("\u{251C}\u{2500} Source:   {}\n", source.display()));
            }
            if descriptor.include_dirs().is_empty() {
                output.push_str("\u{251C}\u{2500} Include:  (none)\n");
            } else {
                for dir in descriptor.include_dirs() {
                    output.push_str(&format!("\u{251C}\u{2500} Include:  {}\n", dir.display()));
                }
            }
            output.push_str(&format!(
                "\u{2514}\u{2500} Flags:    {}\n\n",
                if descriptor.compile_flags().is_empty() {
                    "(none)".to_string()
                } else {
                    descriptor.compile_flags().join(" ")
                }
            ));
        }

        output
    }

    fn format_sources_human(&self, sources: &[SourcePath]) -> String {
        let mut output = String::new();

        output.push_str(&format!("Discovered Sources ({})\n", sources.len()));
        output.push_str(RULE);
        output.push('\n');
        for source in sources {
            output.push_str(&format!("  {}\n", source));
        }

        output
    }
}
