use anyhow::Result;
use std::time::Instant;
use tracing::info;

use crate::batch::{check_order, run_batch};
use crate::report::{self, WrittenReport};
use crate::sqlite::{self, QueryFilter};
use crate::utils::format_number;
use crate::{Args, BatchOutcome};

#[derive(Debug)]
pub struct AnalysisResult {
    pub outcome: BatchOutcome,
    pub written: Vec<WrittenReport>,
    /// Indices of filters that can never claim a term
    pub shadowed: Vec<usize>,
}

pub fn analyze_term_usage(args: &Args) -> Result<AnalysisResult> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting term usage analysis");

    let filter = QueryFilter {
        term_len: args.term_len,
        attr: args.attr,
        since: sqlite::parse_since(&args.since)?,
        metric: args.metric,
    };

    let conn = sqlite::open_database(&args.database)?;
    let series = sqlite::load_yearly_shares(&conn, &filter)?;
    drop(conn);

    info!(
        action = "loaded",
        component = "analysis",
        term_count = format_number(series.term_count()),
        point_count = format_number(series.point_count()),
        "Series ready for filtering"
    );

    if !args.no_dump {
        report::dump_series(&series)?;
    }

    let thresholds = args.thresholds();
    let shadowed = check_order(&thresholds);
    let outcome = run_batch(&series, &thresholds);
    let written = report::write_outcome_files(&outcome, &args.output_dir)?;

    let total_time = total_start_time.elapsed();
    info!(
        action = "complete",
        component = "analysis",
        files_written = written.len(),
        duration_ms = total_time.as_millis(),
        "Analysis completed successfully"
    );

    Ok(AnalysisResult {
        outcome,
        written,
        shadowed,
    })
}

pub fn print_analysis_results(result: &AnalysisResult) -> Result<()> {
    report::print_summary(&result.outcome, &result.written, &result.shadowed)
}
