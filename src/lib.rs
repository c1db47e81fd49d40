pub mod args;
pub mod batch;
pub mod report;
pub mod series;
pub mod sqlite;
pub mod streak;
pub mod threshold;
pub mod usage;
pub mod utils;

pub use args::Args;
pub use batch::{run_batch, BatchOutcome, ThresholdOutcome};
pub use series::{Share, Term, TermSeries, Year, YearSeries};
pub use streak::{find_streaks, StreakResult};
pub use threshold::ThresholdConfig;
pub use usage::{analyze_term_usage, print_analysis_results, AnalysisResult};
