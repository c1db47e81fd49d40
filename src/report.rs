use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::batch::{BatchOutcome, ThresholdOutcome};
use crate::series::TermSeries;
use crate::streak::StreakResult;
use crate::threshold::format_percent;

/// A result file written for one threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub path: PathBuf,
    pub term_count: usize,
}

/// `term: min% - max%`, as written to result files.
pub fn format_result_line(result: &StreakResult) -> String {
    format!(
        "{}: {} - {}",
        result.term,
        format_percent(result.min_streak_share),
        format_percent(result.max_streak_share)
    )
}

pub fn write_results<W: Write>(mut writer: W, results: &[StreakResult]) -> io::Result<()> {
    for result in results {
        writeln!(writer, "{}", format_result_line(result))?;
    }
    writer.flush()
}

/// Write one file per configuration that claimed at least one term.
pub fn write_outcome_files(outcome: &BatchOutcome, output_dir: &Path) -> Result<Vec<WrittenReport>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let mut written = Vec::new();
    for ThresholdOutcome { config, new_terms } in &outcome.outcomes {
        if new_terms.is_empty() {
            continue;
        }

        let path = output_dir.join(config.file_name());
        let file =
            File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        write_results(BufWriter::new(file), new_terms)
            .with_context(|| format!("Failed to write {:?}", path))?;

        info!(action = "write", component = "report", file_path = ?path, term_count = new_terms.len(), "Result file written");
        written.push(WrittenReport {
            path,
            term_count: new_terms.len(),
        });
    }
    Ok(written)
}

/// Pretty-printed, key-sorted JSON of any serializable value.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize JSON")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Dump the loaded series to stdout for inspection.
pub fn dump_series(series: &TermSeries) -> Result<()> {
    let stdout = io::stdout();
    write_json(BufWriter::new(stdout.lock()), series)
}

/// Per-filter summary of a batch run. `shadowed` holds indices of filters
/// that an earlier filter makes unable to claim any term.
pub fn write_summary<W: Write>(
    mut writer: W,
    outcome: &BatchOutcome,
    written: &[WrittenReport],
    shadowed: &[usize],
) -> io::Result<()> {
    writeln!(writer, "\n--- Term Streak Analysis ---")?;
    for (index, ThresholdOutcome { config, new_terms }) in outcome.outcomes.iter().enumerate() {
        let note = if shadowed.contains(&index) {
            " (shadowed by an earlier filter)"
        } else {
            ""
        };
        if new_terms.is_empty() {
            writeln!(writer, "{}: no new terms{}", config, note)?;
            continue;
        }
        let file = written
            .iter()
            .find(|report| report.path.ends_with(config.file_name()))
            .map(|report| report.path.display().to_string())
            .unwrap_or_else(|| config.file_name());
        writeln!(
            writer,
            "{}: {} new terms -> {}{}",
            config,
            new_terms.len(),
            file,
            note
        )?;
    }
    writeln!(writer, "Total terms reported: {}", outcome.total_terms())?;
    if !shadowed.is_empty() {
        writeln!(writer, "Shadowed filters: {}", shadowed.len())?;
    }
    writer.flush()
}

/// Summary goes to stderr; stdout only ever carries the JSON dump.
pub fn print_summary(
    outcome: &BatchOutcome,
    written: &[WrittenReport],
    shadowed: &[usize],
) -> Result<()> {
    let stderr = io::stderr();
    write_summary(stderr.lock(), outcome, written, shadowed).context("Failed to print summary")
}
