use super::error::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Command whose stdout names include directories, one per line.
///
/// Used for headers that only a runtime knows the location of, e.g.
/// `python3 -c "import numpy; print(numpy.get_include())"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncludeProbe {
    command: String,
}

impl IncludeProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        let argv = shlex::split(&self.command).ok_or_else(|| {
            BuildError::Configuration(format!(
                "Cannot parse include probe command: {}",
                self.command
            ))
        })?;
        let (program, args) = argv.split_first().ok_or_else(|| {
            BuildError::Configuration("Include probe command is empty".to_string())
        })?;

        debug!(program = %program, args = ?args, "Running include probe");

        let output = Command::new(program).args(args).output().map_err(|e| {
            BuildError::Configuration(format!(
                "Failed to run include probe '{}': {}",
                self.command, e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::Configuration(format!(
                "Include probe '{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let dirs: Vec<PathBuf> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();

        if dirs.is_empty() {
            return Err(BuildError::Configuration(format!(
                "Include probe '{}' printed no directories",
                self.command
            )));
        }

        info!(command = %self.command, dirs = ?dirs, "Resolved include directories");
        Ok(dirs)
    }
}
