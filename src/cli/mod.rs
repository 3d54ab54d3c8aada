pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildArgs, CliArgs, Commands, ConfigArgs, DiscoverArgs, ScanArgs};
pub use output::{OutputFormat, OutputFormatter};
