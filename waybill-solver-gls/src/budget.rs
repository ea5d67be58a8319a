//! Wall-clock and iteration limits for one search.

use std::time::{Duration, Instant};

use waybill_core::SearchParameters;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    started: Instant,
    time_limit: Duration,
    iterations: u64,
    iteration_limit: Option<u64>,
}

impl Budget {
    pub(crate) fn new(params: &SearchParameters) -> Self {
        Self {
            started: Instant::now(),
            time_limit: params.time_limit,
            iterations: 0,
            iteration_limit: params.iteration_limit,
        }
    }

    /// Whether the wall-clock budget has run out.
    pub(crate) fn expired(&self) -> bool {
        self.started.elapsed() >= self.time_limit
    }

    /// Whether either limit has been reached.
    pub(crate) fn exhausted(&self) -> bool {
        self.expired()
            || self
                .iteration_limit
                .is_some_and(|limit| self.iterations >= limit)
    }

    pub(crate) const fn tick(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    pub(crate) const fn iterations(&self) -> u64 {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn iteration_limit_exhausts_the_budget() {
        let params = SearchParameters::default().with_iteration_limit(2);
        let mut budget = Budget::new(&params);
        assert!(!budget.exhausted());
        budget.tick();
        budget.tick();
        assert!(budget.exhausted());
        assert_eq!(budget.iterations(), 2);
    }

    #[rstest]
    fn zero_time_limit_expires_immediately() {
        let params = SearchParameters::default().with_time_limit(Duration::ZERO);
        assert!(Budget::new(&params).expired());
    }
}
