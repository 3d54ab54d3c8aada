use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering sources or deriving build descriptors.
///
/// Every variant is fatal: a build either produces the complete descriptor
/// set or aborts.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Invalid or missing root directory, bad suffix, failed include probe
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A source path does not lie under the root directory
    #[error("Path {path} is not under root directory {root}")]
    Path { path: PathBuf, root: PathBuf },

    /// Derived module name is empty, malformed or duplicated
    #[error("Cannot derive module name for {path}: {reason}")]
    Naming { path: PathBuf, reason: String },

    /// Filesystem traversal failure
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl BuildError {
    pub(crate) fn naming(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BuildError::Naming {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::Configuration("Root directory does not exist: /nope".to_string());
        assert!(err.to_string().contains("/nope"));

        let err = BuildError::Path {
            path: PathBuf::from("/other/a.pyx"),
            root: PathBuf::from("/src"),
        };
        assert_eq!(
            err.to_string(),
            "Path /other/a.pyx is not under root directory /src"
        );

        let err = BuildError::naming("/src/.pyx", "empty file stem");
        assert!(err.to_string().contains("/src/.pyx"));
        assert!(err.to_string().contains("empty file stem"));
    }
}
