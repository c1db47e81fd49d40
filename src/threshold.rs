use anyhow::{Context, Result};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::series::Share;

/// Default filter set, strictest first.
pub const DEFAULT_FILTERS: [(Share, usize); 3] = [(0.10, 5), (0.075, 4), (0.05, 3)];

/// Minimum share a term must hold for a minimum number of consecutive years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub min_percent: Share,
    pub min_consecutive: NonZeroUsize,
}

impl ThresholdConfig {
    pub fn new(min_percent: Share, min_consecutive: usize) -> Result<Self> {
        if !min_percent.is_finite() {
            anyhow::bail!("minimum percentage must be a finite number, got {}", min_percent);
        }
        let min_consecutive = NonZeroUsize::new(min_consecutive)
            .context("minimum consecutive years must be greater than 0")?;
        Ok(Self {
            min_percent,
            min_consecutive,
        })
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_FILTERS
            .iter()
            .map(|&(min_percent, years)| Self {
                min_percent,
                min_consecutive: NonZeroUsize::new(years).unwrap_or(NonZeroUsize::MIN),
            })
            .collect()
    }

    /// Output file name for this configuration, `terms_<percent>_<years>.txt`.
    pub fn file_name(&self) -> String {
        format!(
            "terms_{}_{}.txt",
            format_decimal(self.min_percent),
            self.min_consecutive
        )
    }

    /// Truth that any streak passing `other` also passes `self`.
    pub fn is_at_most_as_strict_as(&self, other: &Self) -> bool {
        self.min_percent <= other.min_percent && self.min_consecutive <= other.min_consecutive
    }
}

impl fmt::Display for ThresholdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ">= {} for {} consecutive years",
            format_percent(self.min_percent),
            self.min_consecutive
        )
    }
}

/// Parses `PERCENT:YEARS`, e.g. `0.075:4`.
impl FromStr for ThresholdConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (percent, years) = s
            .split_once(':')
            .with_context(|| format!("filter '{}' must look like PERCENT:YEARS", s))?;
        let min_percent: Share = percent
            .trim()
            .parse()
            .with_context(|| format!("invalid percentage '{}' in filter '{}'", percent, s))?;
        let years: usize = years
            .trim()
            .parse()
            .with_context(|| format!("invalid year count '{}' in filter '{}'", years, s))?;
        Self::new(min_percent, years).with_context(|| format!("invalid filter '{}'", s))
    }
}

/// Shortest round-trip decimal, keeping a `.0` on integral values.
///
/// `0.075` stays `0.075` rather than drifting into `0.07500000000000001`.
/// Values whose decimal exponent falls outside `-4..16` switch to exponent
/// form with a signed two-digit exponent, `0.00001 -> "1e-05"`.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if value != 0.0 && !(-4..16).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Fraction rendered as a percentage with two decimals, `0.1234 -> "12.34%"`.
pub fn format_percent(share: Share) -> String {
    format!("{:.2}%", share * 100.0)
}
