use std::io;
use time::macros::format_description;
use tracing_subscriber::{fmt::time::LocalTime, EnvFilter};

/// Log to stderr so stdout stays clean for the JSON dump.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_target(false)
        .init();
}

pub fn format_number(num: usize) -> String {
    num.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.term_len <= 0 {
        anyhow::bail!("--term-len must be greater than 0");
    }

    if args.output_dir.is_file() {
        anyhow::bail!("--output-dir {:?} is a file", args.output_dir);
    }

    crate::sqlite::parse_since(&args.since)?;
    Ok(())
}
