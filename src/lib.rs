//! extbuild - build descriptors for native extension modules
//!
//! This library scans a source tree for extension sources (Cython `.pyx`
//! files by default) and produces one [`BuildDescriptor`] per file. A
//! descriptor carries the dotted module name derived from the file's path,
//! its sources, include directories and compiler flags, ready to be handed to
//! a native build toolchain.
//!
//! # Example Usage
//!
//! ```no_run
//! use extbuild::{build_all, BuildConfig};
//! use std::path::Path;
//!
//! let config = BuildConfig::default();
//! for descriptor in build_all(Path::new("src"), &config)? {
//!     println!("{} <- {:?}", descriptor.module_name(), descriptor.sources());
//! }
//! # Ok::<(), extbuild::BuildError>(())
//! ```
//!
//! # Module Naming
//!
//! Names are taken relative to the root's parent with the suffix stripped and
//! the root directory's own name dropped, so `src/hwt/plot/fast.pyx` under
//! root `src` becomes `hwt.plot.fast`. The number of dropped leading segments
//! is configurable through [`BuildConfig::namespace_depth`].
//!
//! # Project Structure
//!
//! - [`extension`]: discovery, naming and descriptor generation
//! - [`config`]: layered configuration (defaults, TOML, environment)
//! - [`cli`]: command-line parsing, handlers and output formatting

pub mod cli;
pub mod config;
pub mod extension;
pub mod util;

pub use config::{BuildConfig, ConfigError};
pub use extension::{
    build_all, build_descriptor, discover, BuildDescriptor, BuildError, Discovery,
    DiscoveryOptions, IncludeProbe, ModuleNaming, SourcePath,
};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_extbuild() {
        assert_eq!(NAME, "extbuild");
    }
}
