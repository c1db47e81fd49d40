use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use rusqlite::{named_params, Connection, OpenFlags};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::series::{Share, TermSeries, Year};

/// Rows with a `day` at or before this timestamp are ignored by default.
pub const DEFAULT_SINCE: i64 = 1_450_000_000;

/// Which yearly aggregate becomes a term's share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShareMetric {
    /// Fraction of distinct authors using the term
    #[default]
    Authors,
    /// Fraction of all hits attributed to the term
    Hits,
}

/// Restrictions applied to the yearly aggregate query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryFilter {
    pub term_len: i64,
    pub attr: i64,
    pub since: i64,
    pub metric: ShareMetric,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            term_len: 1,
            attr: 0,
            since: DEFAULT_SINCE,
            metric: ShareMetric::Authors,
        }
    }
}

// The LEFT JOIN is narrowed back to an inner join by the total_yearly
// conditions in WHERE; COALESCE only matters for a zero denominator.
const YEARLY_SHARES_QUERY: &str = "
    WITH YearlyPct AS (
        SELECT
            y.term_id,
            y.attr,
            CAST(strftime('%Y', y.day, 'unixepoch') AS INTEGER) AS year,
            COALESCE((y.hits * 1.0) / t.hits, 0) AS hits_pct,
            COALESCE((y.authors * 1.0) / t.authors, 0) AS authors_pct
        FROM
            yearly y
            LEFT JOIN total_yearly t ON y.day = t.day
        WHERE
            t.term_len = :term_len AND
            t.attr = :attr AND
            y.day > :since
    )
    SELECT
        t.text,
        yp.year,
        yp.hits_pct,
        yp.authors_pct
    FROM
        YearlyPct yp
        JOIN term t ON yp.term_id = t.id
    WHERE
        t.len = :term_len AND
        yp.attr = :attr
";

/// Parse a `--since` value: epoch seconds, or a `YYYY-MM-DD` date taken as
/// UTC midnight.
pub fn parse_since(value: &str) -> Result<i64> {
    let value = value.trim();
    if let Ok(timestamp) = value.parse::<i64>() {
        return Ok(timestamp);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| {
        format!(
            "'{}' is neither a unix timestamp nor a YYYY-MM-DD date",
            value
        )
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Failed to build midnight for cutoff date")?;
    Ok(midnight.and_utc().timestamp())
}

/// Human readable form of a unix timestamp cutoff.
pub fn describe_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| format!("timestamp {}", timestamp))
}

pub fn open_database(path: &Path) -> Result<Connection> {
    if !path.exists() {
        anyhow::bail!("Database file not found at {:?}", path);
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open database {:?}", path))?;

    info!(action = "open", component = "database", path = ?path, "Connected to database");
    Ok(conn)
}

/// Load the per-term yearly share series from the aggregate tables.
pub fn load_yearly_shares(conn: &Connection, filter: &QueryFilter) -> Result<TermSeries> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "yearly_shares_query",
        term_len = filter.term_len,
        attr = filter.attr,
        since = describe_timestamp(filter.since),
        metric = ?filter.metric,
        "Querying yearly shares"
    );

    let mut stmt = conn
        .prepare(YEARLY_SHARES_QUERY)
        .context("Failed to prepare yearly shares query")?;
    let mut rows = stmt
        .query(named_params! {
            ":term_len": filter.term_len,
            ":attr": filter.attr,
            ":since": filter.since,
        })
        .context("Failed to run yearly shares query")?;

    let mut series = TermSeries::new();
    let mut row_count = 0usize;
    while let Some(row) = rows.next()? {
        let text: String = row.get(0)?;
        let year: Year = row.get(1)?;
        let share: Share = match filter.metric {
            ShareMetric::Hits => row.get(2)?,
            ShareMetric::Authors => row.get(3)?,
        };
        series.insert(text, year, share);
        row_count += 1;
    }

    let query_time = start_time.elapsed();
    if series.is_empty() {
        warn!(
            action = "complete",
            component = "yearly_shares_query",
            duration_ms = query_time.as_millis(),
            "No yearly data matched the query"
        );
    } else {
        let (first_year, last_year) = series.year_range().unwrap_or_default();
        info!(
            action = "complete",
            component = "yearly_shares_query",
            row_count,
            term_count = series.term_count(),
            first_year,
            last_year,
            duration_ms = query_time.as_millis(),
            "Yearly shares loaded"
        );
    }

    Ok(series)
}
