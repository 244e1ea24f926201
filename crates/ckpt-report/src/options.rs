//! Configuration options for status reports.

use serde::{Deserialize, Serialize};

use crate::buffer::DEFAULT_RESERVE;

/// Average width of one status line, used to derive the default line budget.
const BYTES_PER_STATUS_LINE: usize = 62;

/// Tunables for the success-probability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorOptions {
    /// Chance that a first Lucas-Lehmer result was wrong, applied to
    /// double-checks.
    pub double_check_error_rate: f64,

    /// Chance that a first PRP result was wrong, applied to PRP double-checks.
    pub prp_double_check_error_rate: f64,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            double_check_error_rate: 0.018,
            prp_double_check_error_rate: 0.0001,
        }
    }
}

/// Options controlling report size and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Capacity of the backup status report in bytes.
    pub restore_buffer_len: usize,

    /// Capacity of the queue status report in bytes.
    pub range_buffer_len: usize,

    /// Headroom kept free while writing records.
    pub reserve: usize,

    /// Total lines shared by all workers in the queue report.
    /// Default: `range_buffer_len / 62`.
    pub status_lines: Option<usize>,

    /// Probability estimate settings.
    pub estimator: EstimatorOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            restore_buffer_len: 1000,
            range_buffer_len: 2000,
            reserve: DEFAULT_RESERVE,
            status_lines: None,
            estimator: EstimatorOptions::default(),
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status_lines(mut self, lines: usize) -> Self {
        self.status_lines = Some(lines);
        self
    }

    pub fn with_range_buffer_len(mut self, len: usize) -> Self {
        self.range_buffer_len = len;
        self
    }

    pub fn with_restore_buffer_len(mut self, len: usize) -> Self {
        self.restore_buffer_len = len;
        self
    }

    /// Total status lines for the queue report.
    #[must_use]
    pub fn effective_status_lines(&self) -> usize {
        self.status_lines
            .unwrap_or(self.range_buffer_len / BYTES_PER_STATUS_LINE)
    }

    /// Lines each worker may use, never fewer than three.
    #[must_use]
    pub fn lines_per_worker(&self, workers: usize) -> usize {
        (self.effective_status_lines() / workers.max(1)).max(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = ReportOptions::default();
        assert_eq!(options.restore_buffer_len, 1000);
        assert_eq!(options.range_buffer_len, 2000);
        assert_eq!(options.reserve, 200);
        assert_eq!(options.effective_status_lines(), 32);
        assert!((options.estimator.double_check_error_rate - 0.018).abs() < f64::EPSILON);
    }

    #[test]
    fn lines_per_worker_has_a_floor() {
        let options = ReportOptions::new().with_status_lines(10);
        assert_eq!(options.lines_per_worker(1), 10);
        assert_eq!(options.lines_per_worker(2), 5);
        assert_eq!(options.lines_per_worker(8), 3);
        assert_eq!(options.lines_per_worker(0), 10);
    }
}
