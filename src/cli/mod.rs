use clap::Parser;

/// A console prayer journal with guided sessions
#[derive(Parser, Debug)]
#[clap(name = "vigil", about = "A console prayer journal with guided sessions")]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Directory holding the journal's data files (defaults to VIGIL_DIR or ~/.vigil)
    #[clap(short = 'd', long)]
    pub data_dir: Option<String>,

    /// Seed for the review-selection RNG; fixes the selection order for testing
    #[clap(long)]
    pub seed: Option<u64>,

    /// Print verbose output
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, value_parser = ["text", "json"], default_value = "text")]
    pub log_format: String,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}
