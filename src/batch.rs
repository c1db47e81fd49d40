use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};

use crate::series::TermSeries;
use crate::streak::{find_streaks, StreakResult};
use crate::threshold::ThresholdConfig;

/// Terms first claimed by one threshold configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    pub config: ThresholdConfig,
    pub new_terms: Vec<StreakResult>,
}

/// Per-configuration results of a batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub outcomes: Vec<ThresholdOutcome>,
}

impl BatchOutcome {
    pub fn get(&self, config: &ThresholdConfig) -> Option<&[StreakResult]> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.config == *config)
            .map(|outcome| outcome.new_terms.as_slice())
    }

    pub fn total_terms(&self) -> usize {
        self.outcomes.iter().map(|o| o.new_terms.len()).sum()
    }
}

/// Run every configuration in order, keeping each term only under the first
/// configuration it satisfies.
///
/// `configs` should go from strictest to most lenient; order is honored as
/// given either way.
pub fn run_batch(series: &TermSeries, configs: &[ThresholdConfig]) -> BatchOutcome {
    let start_time = Instant::now();
    let mut seen: HashSet<String> = HashSet::new();
    let mut outcomes = Vec::with_capacity(configs.len());

    for config in configs {
        let streaks = find_streaks(series, config);
        let qualifying = streaks.len();

        let new_terms: Vec<StreakResult> = streaks
            .into_iter()
            .filter(|result| !seen.contains(&result.term))
            .collect();
        seen.extend(new_terms.iter().map(|result| result.term.clone()));

        info!(
            action = "filter",
            component = "batch",
            min_percent = config.min_percent,
            min_consecutive = config.min_consecutive.get(),
            qualifying,
            new_terms = new_terms.len(),
            "Threshold processed"
        );

        outcomes.push(ThresholdOutcome {
            config: *config,
            new_terms,
        });
    }

    info!(
        action = "complete",
        component = "batch",
        config_count = configs.len(),
        term_count = seen.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Batch run completed"
    );

    BatchOutcome { outcomes }
}

/// Warn about configurations that come after a strictly less strict one.
///
/// Such a configuration can never claim a term, since anything it accepts was
/// already claimed earlier.
pub fn check_order(configs: &[ThresholdConfig]) -> Vec<usize> {
    let mut shadowed = Vec::new();
    for (index, config) in configs.iter().enumerate() {
        if let Some(earlier) = configs[..index]
            .iter()
            .find(|earlier| earlier.is_at_most_as_strict_as(config))
        {
            warn!(
                action = "validate",
                component = "batch",
                filter = %config,
                shadowed_by = %earlier,
                "Filter can never report new terms"
            );
            shadowed.push(index);
        }
    }
    shadowed
}
