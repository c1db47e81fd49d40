use clap::Parser;
use std::path::PathBuf;

use crate::sqlite::ShareMetric;
use crate::threshold::ThresholdConfig;

#[derive(Parser, Debug)]
#[command(
    name = "term-streaks",
    about = "Find terms that hold a minimum yearly author share over consecutive years",
    version,
    long_about = None
)]
pub struct Args {
    /// SQLite database holding the yearly aggregate tables
    pub database: PathBuf,

    /// Directory where result files are written
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Threshold as PERCENT:YEARS, strictest first (repeatable)
    ///
    /// Defaults to 0.10:5, 0.075:4 and 0.05:3.
    #[arg(short, long = "filter", value_name = "PERCENT:YEARS")]
    pub filters: Vec<ThresholdConfig>,

    /// Term length in characters
    #[arg(long, default_value_t = 1)]
    pub term_len: i64,

    /// Term attribute value (0 is the plain term form)
    #[arg(long, default_value_t = 0)]
    pub attr: i64,

    /// Ignore data on or before this point (unix timestamp or YYYY-MM-DD)
    #[arg(long, default_value = "1450000000")]
    pub since: String,

    /// Yearly aggregate used as the share
    #[arg(long, value_enum, default_value_t = ShareMetric::Authors)]
    pub metric: ShareMetric,

    /// Skip the JSON dump of loaded series on stdout
    #[arg(long)]
    pub no_dump: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Filters to run, falling back to the defaults when none were given.
    pub fn thresholds(&self) -> Vec<ThresholdConfig> {
        if self.filters.is_empty() {
            ThresholdConfig::defaults()
        } else {
            self.filters.clone()
        }
    }
}
