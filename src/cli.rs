use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};

mod run_impl;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug, Clone)]
#[command(name = "sciname", version, about = "Fast scientific name parser", long_about = None)]
pub struct Args {
    /// Names to parse (each argument is one name)
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Read names from a file, one per line (`-` for stdin)
    #[arg(long = "input", short = 'i', value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Indented JSON instead of one document per line
    #[arg(long = "pretty", action = ArgAction::SetTrue, conflicts_with_all = ["csv", "table"])]
    pub pretty: bool,

    /// Output CSV instead of JSON
    #[arg(long = "csv", action = ArgAction::SetTrue, conflicts_with_all = ["pretty", "table"])]
    pub csv: bool,

    /// Output an aligned table instead of JSON
    #[arg(long = "table", action = ArgAction::SetTrue, conflicts_with_all = ["pretty", "csv"])]
    pub table: bool,

    /// Set rayon thread pool size (0 = default)
    #[arg(long = "threads", value_name = "N", default_value_t = 0)]
    pub threads: usize,

    /// Verbose logging
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Show a progress bar
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    pub progress: bool,

    /// Memory-map input files at least this large in bytes (default: 4 MiB)
    #[arg(long = "mmap-large", value_name = "BYTES")]
    pub mmap_large: Option<u64>,

    /// Disable memory-mapping of input files
    #[arg(long = "no-mmap", action = ArgAction::SetTrue)]
    pub no_mmap: bool,
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if reading input or writing output fails.
pub fn run() -> Result<()> {
    let args = Args::parse();
    run_impl::run_with_args(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_flags_conflict() {
        assert!(Args::try_parse_from(["sciname", "--csv", "--table"]).is_err());
        assert!(Args::try_parse_from(["sciname", "--pretty", "--csv"]).is_err());
        let a = Args::try_parse_from(["sciname", "-vv", "--csv", "Aus bus", "Cus dus"]).unwrap();
        assert_eq!(a.verbose, 2);
        assert_eq!(a.names, vec!["Aus bus", "Cus dus"]);
    }
}
