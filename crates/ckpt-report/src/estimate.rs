//! Chance that queued primality tests will find a prime.
//!
//! Each queued Lucas-Lehmer, double-check or PRP test contributes
//!
//! ```text
//! p = (bits - 1) * 1.733 * error_rate * pminus1 / log2(k * b^n)
//! ```
//!
//! where `bits` is the trial factoring depth (at least 32), `error_rate` is
//! one for first-time tests and the configured error rate for double-checks,
//! and `pminus1` is 1.04 when P-1 factoring was already done. The reported
//! odds are `1 / sum(p)`.

use std::fmt;

use ckpt_model::{QueuedWork, WorkKind};
use serde::Serialize;

use crate::options::EstimatorOptions;
use crate::queue::WorkQueue;

/// Message used when no qualifying work is queued.
pub const NO_WORK_QUEUED: &str = "No work queued up.";

/// Trial factoring depth assumed for shallower or unknown sieving.
const MIN_SIEVE_BITS: f64 = 32.0;

const PRIME_DENSITY: f64 = 1.733;
const PMINUS1_BONUS: f64 = 1.04;

/// Probability that `item` is prime, or `None` when its kind is not a
/// primality test.
#[must_use]
pub fn item_probability(item: &QueuedWork, options: &EstimatorOptions) -> Option<f64> {
    if !item.kind.is_primality_test() {
        return None;
    }
    let error_rate = match item.kind {
        WorkKind::DoubleCheck => options.double_check_error_rate,
        WorkKind::Prp if item.spec.prp_double_check => options.prp_double_check_error_rate,
        _ => 1.0,
    };
    let bits = item.spec.sieve_depth.trunc().max(MIN_SIEVE_BITS);
    let pminus1 = if item.spec.pminus1ed { PMINUS1_BONUS } else { 1.0 };
    let size = item.spec.log2_size();
    if size.is_nan() || size <= 0.0 {
        return None;
    }
    Some((bits - 1.0) * PRIME_DENSITY * error_rate * pminus1 / size)
}

/// Running estimate over a set of queued items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessEstimate {
    /// Qualifying items seen.
    pub count: usize,
    /// Sum of per-item probabilities.
    pub probability: f64,
    /// Whether every qualifying item is a Mersenne number.
    pub all_mersenne: bool,
}

impl Default for SuccessEstimate {
    fn default() -> Self {
        Self {
            count: 0,
            probability: 0.0,
            all_mersenne: true,
        }
    }
}

impl SuccessEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` to the estimate. Returns whether it qualified.
    pub fn add(&mut self, item: &QueuedWork, options: &EstimatorOptions) -> bool {
        let Some(p) = item_probability(item, options) else {
            return false;
        };
        self.count += 1;
        self.probability += p;
        self.all_mersenne &= item.spec.is_mersenne_form();
        true
    }

    /// Odds as "1 in N", or `None` when nothing qualified.
    #[must_use]
    pub fn odds(&self) -> Option<i64> {
        if self.count == 0 || self.probability <= 0.0 {
            return None;
        }
        Some((1.0 / self.probability) as i64)
    }
}

impl fmt::Display for SuccessEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(odds) = self.odds() else {
            return f.write_str(NO_WORK_QUEUED);
        };
        let flavor = if self.all_mersenne { "Mersenne " } else { "" };
        if self.count == 1 {
            write!(
                f,
                "The chance that the exponent you are testing will yield a {flavor}prime is about 1 in {odds}."
            )
        } else {
            write!(
                f,
                "The chance that one of the {} exponents you are testing will yield a {flavor}prime is about 1 in {odds}.",
                self.count
            )
        }
    }
}

/// Estimate over every worker's queue.
///
/// Items are read one at a time, so a queue that changes during the walk is
/// read up to wherever it currently ends.
pub fn estimate_queue<Q: WorkQueue + ?Sized>(queue: &Q, options: &EstimatorOptions) -> SuccessEstimate {
    let mut estimate = SuccessEstimate::new();
    for worker in 0..queue.worker_count() {
        let mut index = 0;
        while let Some(item) = queue.item(worker, index) {
            estimate.add(&item, options);
            index += 1;
        }
    }
    estimate
}
