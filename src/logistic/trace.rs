//! Display sampling of the optimizer's iteration log.

use super::{IterationRecord, LogisticCalculationStep};
use crate::decimal::{COEFFICIENT_DECIMALS, PROBABILITY_DECIMALS, round_half_up};

/// Which iterations of a fit are kept for display.
///
/// An iteration with zero-based index `i` is kept when `i < head`, when
/// `every > 0` and `i % every == 0`, or when it is the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSampling {
    /// Leading iterations that are always kept
    pub head: usize,
    /// Keep every `every`-th iteration after the head; 0 disables
    pub every: usize,
}

impl Default for TraceSampling {
    fn default() -> Self {
        Self {
            head: 10,
            every: 100,
        }
    }
}

impl TraceSampling {
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = head;
        self
    }

    pub fn with_every(mut self, every: usize) -> Self {
        self.every = every;
        self
    }

    fn keeps(&self, index: usize, last: usize) -> bool {
        index < self.head || (self.every > 0 && index % self.every == 0) || index == last
    }
}

/// Select and round the iterations to show.
pub fn sample_trace(
    log: &[IterationRecord],
    sampling: &TraceSampling,
) -> Vec<LogisticCalculationStep> {
    let last = log.len().saturating_sub(1);
    log.iter()
        .enumerate()
        .filter(|&(index, _)| sampling.keeps(index, last))
        .map(|(_, record)| LogisticCalculationStep {
            iteration: record.iteration,
            b0: round_half_up(record.b0, COEFFICIENT_DECIMALS),
            b1: round_half_up(record.b1, COEFFICIENT_DECIMALS),
            log_likelihood: round_half_up(record.log_likelihood, COEFFICIENT_DECIMALS),
            predictions: record
                .predictions
                .iter()
                .map(|&p| round_half_up(p, PROBABILITY_DECIMALS))
                .collect(),
        })
        .collect()
}
