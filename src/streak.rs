use crate::series::{Share, Term, TermSeries, YearSeries};
use crate::threshold::ThresholdConfig;

/// A term that held the threshold long enough, with the share bounds observed
/// over the streak that qualified it.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakResult {
    pub term: Term,
    pub min_streak_share: Share,
    pub max_streak_share: Share,
}

/// Running state over the current streak of passing years.
#[derive(Debug, Default)]
struct Streak {
    count: usize,
    bounds: Option<(Share, Share)>,
}

impl Streak {
    fn extend(&mut self, share: Share) {
        self.count += 1;
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(share), max.max(share)),
            None => (share, share),
        });
    }

    fn reset(&mut self) {
        self.count = 0;
        self.bounds = None;
    }
}

/// Scan one series for its first streak of `min_consecutive` passing years.
///
/// Consecutive means adjacent among the years present in the series; missing
/// calendar years do not break a streak. Returns the `(min, max)` share of the
/// qualifying streak.
pub fn first_streak(series: &YearSeries, config: &ThresholdConfig) -> Option<(Share, Share)> {
    let mut streak = Streak::default();
    for (_year, share) in series.iter() {
        if share >= config.min_percent {
            streak.extend(share);
            if streak.count >= config.min_consecutive.get() {
                return streak.bounds;
            }
        } else {
            streak.reset();
        }
    }
    None
}

/// Terms whose share meets `config` for enough consecutive years, sorted by
/// descending streak minimum. Ties keep term order.
pub fn find_streaks(series: &TermSeries, config: &ThresholdConfig) -> Vec<StreakResult> {
    let mut results: Vec<StreakResult> = series
        .iter()
        .filter_map(|(term, years)| {
            first_streak(years, config).map(|(min, max)| StreakResult {
                term: term.to_string(),
                min_streak_share: min,
                max_streak_share: max,
            })
        })
        .collect();

    // Stable, and total_cmp keeps a stray NaN from panicking the sort
    results.sort_by(|a, b| b.min_streak_share.total_cmp(&a.min_streak_share));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_percent: Share, years: usize) -> ThresholdConfig {
        ThresholdConfig::new(min_percent, years).unwrap()
    }

    fn single(term: &str, points: &[(i32, Share)]) -> TermSeries {
        let mut series = TermSeries::new();
        series.insert_series(term, points.iter().copied().collect());
        series
    }

    #[test]
    fn broken_streak_restarts() {
        let series = single(
            "a",
            &[
                (2015, 0.12),
                (2016, 0.11),
                (2017, 0.09),
                (2018, 0.15),
                (2019, 0.20),
            ],
        );

        assert!(find_streaks(&series, &config(0.10, 3)).is_empty());

        // 2015-2016 already satisfy a two-year streak
        let results = find_streaks(&series, &config(0.10, 2));
        assert_eq!(
            results,
            vec![StreakResult {
                term: "a".into(),
                min_streak_share: 0.11,
                max_streak_share: 0.12,
            }]
        );
    }

    #[test]
    fn streak_bounds_ignore_years_before_the_break() {
        let series = single(
            "a",
            &[(2015, 0.12), (2016, 0.09), (2018, 0.15), (2019, 0.20)],
        );

        let results = find_streaks(&series, &config(0.10, 2));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].min_streak_share, 0.15);
        assert_eq!(results[0].max_streak_share, 0.20);
    }

    #[test]
    fn threshold_is_inclusive() {
        let series = single("a", &[(2020, 0.05), (2021, 0.06), (2022, 0.07)]);

        let results = find_streaks(&series, &config(0.05, 3));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].min_streak_share, 0.05);
        assert_eq!(results[0].max_streak_share, 0.07);
    }

    #[test]
    fn empty_series_yields_nothing() {
        let series = single("a", &[]);
        assert!(find_streaks(&series, &config(0.05, 1)).is_empty());
        assert!(find_streaks(&TermSeries::new(), &config(0.05, 1)).is_empty());
    }

    #[test]
    fn missing_years_do_not_break_streaks() {
        let series = single("a", &[(2015, 0.2), (2019, 0.3), (2020, 0.4)]);

        let results = find_streaks(&series, &config(0.10, 3));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].min_streak_share, 0.2);
        assert_eq!(results[0].max_streak_share, 0.4);
    }

    #[test]
    fn first_qualifying_streak_wins() {
        // The later streak is higher but never examined
        let series = single(
            "a",
            &[
                (2015, 0.11),
                (2016, 0.12),
                (2017, 0.01),
                (2018, 0.50),
                (2019, 0.60),
            ],
        );

        let results = find_streaks(&series, &config(0.10, 2));
        assert_eq!(results[0].min_streak_share, 0.11);
        assert_eq!(results[0].max_streak_share, 0.12);
    }

    #[test]
    fn stops_at_required_length() {
        // Qualifies at 2017, so 2018 must not widen the bounds
        let series = single(
            "a",
            &[(2015, 0.2), (2016, 0.3), (2017, 0.4), (2018, 0.9)],
        );

        let results = find_streaks(&series, &config(0.10, 3));
        assert_eq!(results[0].max_streak_share, 0.4);
    }

    #[test]
    fn results_sorted_by_descending_minimum() {
        let mut series = TermSeries::new();
        series.insert_series("a", [(2016, 0.06), (2017, 0.07)].into_iter().collect());
        series.insert_series("b", [(2016, 0.30), (2017, 0.20)].into_iter().collect());
        series.insert_series("c", [(2016, 0.10), (2017, 0.12)].into_iter().collect());
        series.insert_series("d", [(2016, 0.10), (2017, 0.15)].into_iter().collect());

        let terms: Vec<String> = find_streaks(&series, &config(0.05, 2))
            .into_iter()
            .map(|result| result.term)
            .collect();
        // c and d tie on 0.10 and keep term order
        assert_eq!(terms, vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut series = TermSeries::new();
        series.insert_series("x", [(2016, 0.2), (2017, 0.2)].into_iter().collect());
        series.insert_series("y", [(2016, 0.3), (2017, 0.1)].into_iter().collect());

        let cfg = config(0.1, 2);
        assert_eq!(find_streaks(&series, &cfg), find_streaks(&series, &cfg));
    }

    #[test]
    fn out_of_range_shares_pass_through() {
        let mut series = TermSeries::new();
        series.insert_series("a", [(2016, 1.5), (2017, 2.0)].into_iter().collect());
        series.insert_series("b", [(2016, -0.5), (2017, -0.2)].into_iter().collect());
        // NaN never meets a threshold, so it breaks the streak like a low year
        series.insert_series(
            "c",
            [(2016, Share::NAN), (2017, 0.3), (2018, 0.4)]
                .into_iter()
                .collect(),
        );

        let results = find_streaks(&series, &config(-1.0, 2));
        assert_eq!(
            results,
            vec![
                StreakResult {
                    term: "a".into(),
                    min_streak_share: 1.5,
                    max_streak_share: 2.0,
                },
                StreakResult {
                    term: "c".into(),
                    min_streak_share: 0.3,
                    max_streak_share: 0.4,
                },
                StreakResult {
                    term: "b".into(),
                    min_streak_share: -0.5,
                    max_streak_share: -0.2,
                },
            ]
        );

        assert!(find_streaks(&series, &config(0.1, 3)).is_empty());
    }

    #[test]
    fn all_passing_series_reports_true_bounds() {
        let points: Vec<(i32, Share)> = (0..8)
            .map(|i| (2010 + i, 0.10 + (i as Share % 3.0) * 0.01))
            .collect();
        let series = single("a", &points);

        for years in 1..=8 {
            let results = find_streaks(&series, &config(0.10, years));
            let window = &points[..years];
            let min = window.iter().map(|p| p.1).fold(Share::INFINITY, Share::min);
            let max = window.iter().map(|p| p.1).fold(Share::NEG_INFINITY, Share::max);
            assert_eq!(results.len(), 1, "years = {}", years);
            assert_eq!(results[0].min_streak_share, min);
            assert_eq!(results[0].max_streak_share, max);
        }
        assert!(find_streaks(&series, &config(0.10, 9)).is_empty());
    }
}
