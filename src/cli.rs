use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statcsv",
    about = "Convert columnar data files (Parquet, Arrow IPC) to CSV",
    version
)]
pub struct Cli {
    /// Input files or glob patterns; the format is taken from the file suffix
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Rows decoded per batch
    #[arg(long, short = 'b', default_value_t = statcsv::DEFAULT_BATCH_SIZE)]
    pub batch_size: NonZeroUsize,

    /// Output field delimiter (single character, or \t)
    #[arg(long, short = 'd', default_value = ",")]
    pub delimiter: String,

    /// Write one CSV per input into this directory instead of standard output
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Compress files written to --out-dir (gz, zst, bz2, xz)
    #[arg(long, requires = "out_dir")]
    pub compress: Option<String>,

    /// Parallel conversions when writing to --out-dir (defaults to CPU count)
    #[arg(long, short = 'j', requires = "out_dir")]
    pub jobs: Option<usize>,

    /// Save a JSON conversion report to this path
    #[arg(long, value_name = "PATH")]
    pub metrics: Option<PathBuf>,

    /// Enable verbose logging on stderr (honours RUST_LOG)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logging
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}
