//! Utility modules for extbuild
//!
//! Currently this is the structured logging setup shared by the binary and
//! by library consumers that want the same log format.

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
