use serde::Serialize;
use std::collections::BTreeMap;

pub type Term = String;
pub type Year = i32;

/// Fraction of the yearly total attributed to a term, nominally in `[0, 1]`.
///
/// Values are not validated here. NaN or negative shares are the loader's
/// problem and will flow through streak tracking untouched.
pub type Share = f64;

/// Share returned for a year the series has no entry for.
pub const MISSING_SHARE: Share = 0.0;

/// Sparse year -> share series for a single term.
///
/// Years without data are absent rather than zero. Iteration is always in
/// ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearSeries(BTreeMap<Year, Share>);

impl YearSeries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record the share for `year`, replacing any previous value.
    pub fn insert(&mut self, year: Year, share: Share) {
        self.0.insert(year, share);
    }

    /// Share recorded for `year`, or [`MISSING_SHARE`] if absent.
    pub fn share(&self, year: Year) -> Share {
        self.0.get(&year).copied().unwrap_or(MISSING_SHARE)
    }

    pub fn contains_year(&self, year: Year) -> bool {
        self.0.contains_key(&year)
    }

    /// Present years and their shares, ascending by year.
    pub fn iter(&self) -> impl Iterator<Item = (Year, Share)> + '_ {
        self.0.iter().map(|(year, share)| (*year, *share))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.0.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.0.keys().next_back().copied()
    }
}

impl FromIterator<(Year, Share)> for YearSeries {
    fn from_iter<I: IntoIterator<Item = (Year, Share)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Two-level term -> year -> share mapping produced by the loader.
///
/// Terms iterate in sorted order, which also fixes the tie order of streak
/// results and the key order of the JSON dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TermSeries(BTreeMap<Term, YearSeries>);

impl TermSeries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, term: impl Into<Term>, year: Year, share: Share) {
        self.0.entry(term.into()).or_default().insert(year, share);
    }

    /// Insert or replace a whole series for `term`.
    pub fn insert_series(&mut self, term: impl Into<Term>, series: YearSeries) {
        self.0.insert(term.into(), series);
    }

    pub fn get(&self, term: &str) -> Option<&YearSeries> {
        self.0.get(term)
    }

    /// Share for `(term, year)`, or [`MISSING_SHARE`] when either is absent.
    pub fn share(&self, term: &str, year: Year) -> Share {
        self.0
            .get(term)
            .map(|series| series.share(year))
            .unwrap_or(MISSING_SHARE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YearSeries)> + '_ {
        self.0.iter().map(|(term, series)| (term.as_str(), series))
    }

    pub fn term_count(&self) -> usize {
        self.0.len()
    }

    /// Number of (term, year) data points across all series.
    pub fn point_count(&self) -> usize {
        self.0.values().map(YearSeries::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Earliest and latest year present across all terms.
    pub fn year_range(&self) -> Option<(Year, Year)> {
        let first = self.0.values().filter_map(YearSeries::first_year).min()?;
        let last = self.0.values().filter_map(YearSeries::last_year).max()?;
        Some((first, last))
    }
}
