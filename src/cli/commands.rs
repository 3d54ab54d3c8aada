use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Discovers native extension sources and generates build descriptors
#[derive(Parser, Debug)]
#[command(
    name = "extbuild",
    about = "Discovers native extension sources and generates build descriptors",
    version,
    long_about = "extbuild scans a source tree for extension sources (Cython .pyx files by \
                  default) and emits one build descriptor per file: a dotted module name, \
                  the sources, include directories and compiler flags for the native \
                  toolchain."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "FILE",
        help = "Configuration file (defaults to ./extbuild.toml when present)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate build descriptors for every extension source",
        long_about = "Scans the source root and prints one build descriptor per discovered \
                      source file.\n\n\
                      Examples:\n  \
                      extbuild build\n  \
                      extbuild build src --format json\n  \
                      extbuild build --include-probe \"python3 -c 'import numpy; print(numpy.get_include())'\"\n  \
                      extbuild build --flag=-O2 --flag=-g"
    )]
    Build(BuildArgs),

    #[command(
        about = "List extension sources without building descriptors",
        long_about = "Scans the source root and lists every file matching the suffix.\n\n\
                      Examples:\n  \
                      extbuild discover\n  \
                      extbuild discover lib --suffix .ext --sorted"
    )]
    Discover(DiscoverArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

/// Options shared by every command that scans a source tree
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[arg(
        value_name = "ROOT",
        help = "Source root to scan (defaults to the configured root, usually 'src')"
    )]
    pub root: Option<PathBuf>,

    #[arg(long, value_name = "SUFFIX", help = "Source file suffix, e.g. '.pyx'")]
    pub suffix: Option<String>,

    #[arg(long, value_name = "N", help = "Maximum directory depth to scan")]
    pub max_depth: Option<usize>,

    #[arg(long, help = "Sort entries by file name for reproducible output")]
    pub sorted: bool,

    #[arg(long, help = "Follow symbolic links while scanning")]
    pub follow_links: bool,

    #[arg(
        long = "exclude",
        value_name = "REGEX",
        help = "Skip directories whose name matches REGEX (repeatable)"
    )]
    pub excludes: Vec<String>,

    #[arg(
        long,
        help = "Skip VCS and Python cache directories (.git, __pycache__, .venv, ...)"
    )]
    pub exclude_common: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    #[arg(
        short = 'I',
        long = "include-dir",
        value_name = "DIR",
        help = "Additional include directory (repeatable)"
    )]
    pub include_dirs: Vec<PathBuf>,

    #[arg(
        long = "include-probe",
        value_name = "COMMAND",
        help = "Command printing include directories, one per line (repeatable)"
    )]
    pub include_probes: Vec<String>,

    #[arg(
        long = "flag",
        value_name = "FLAG",
        allow_hyphen_values = true,
        help = "Compiler flag (repeatable; replaces the configured flags)"
    )]
    pub flags: Vec<String>,

    #[arg(
        long,
        value_name = "N",
        help = "Leading path segments dropped from module names, counting the root itself"
    )]
    pub namespace_depth: Option<usize>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::Yaml => Self::Yaml,
            OutputFormatArg::Human => Self::Human,
        }
    }
}
