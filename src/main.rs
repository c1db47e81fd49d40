use anyhow::Result;
use clap::Parser;
use tracing::error;

use term_streaks::utils::{setup_logging, validate_args};
use term_streaks::{analyze_term_usage, print_analysis_results, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    match analyze_term_usage(&args) {
        Ok(result) => print_analysis_results(&result),
        Err(e) => {
            let message = format!("{:#}", e);
            error!(action = "abort", component = "analysis", error = %message, "Analysis failed");
            std::process::exit(1);
        }
    }
}
