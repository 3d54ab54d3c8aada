//! Extension source discovery and build descriptor generation

mod builder;
mod descriptor;
mod discovery;
mod error;
mod probe;

pub use builder::{build_all, discover_sources, resolve_include_dirs};
pub use descriptor::{build_descriptor, BuildDescriptor, ModuleNaming};
pub use discovery::{discover, Discovery, DiscoveryIter, DiscoveryOptions, SourcePath};
pub use error::{BuildError, Result};
pub use probe::IncludeProbe;
