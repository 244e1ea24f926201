//! The number under test, `k*b^n+c`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the number a computation works on, `k*b^n+c`.
///
/// Read once from a checkpoint header (or a queued work unit) and not
/// modified afterwards, apart from the derived fields the header validator
/// may fill in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationSpec {
    /// Coefficient `k`.
    pub k: f64,
    /// Base `b`.
    pub b: u32,
    /// Exponent `n`.
    pub n: u32,
    /// Additive term `c`.
    pub c: i32,
    /// Known factors excluded from the test (decimal strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_factors: Option<Vec<String>>,
    /// Bits of trial factoring already done.
    #[serde(default)]
    pub sieve_depth: f64,
    /// Whether P-1 factoring has already been run.
    #[serde(default)]
    pub pminus1ed: bool,
    /// Whether a PRP test is a double-check.
    #[serde(default)]
    pub prp_double_check: bool,
}

impl ComputationSpec {
    /// Create a spec for `k*b^n+c` with no derived fields.
    #[must_use]
    pub fn new(k: f64, b: u32, n: u32, c: i32) -> Self {
        Self {
            k,
            b,
            n,
            c,
            known_factors: None,
            sieve_depth: 0.0,
            pminus1ed: false,
            prp_double_check: false,
        }
    }

    /// Create a spec for the Mersenne number `2^n-1`.
    #[must_use]
    pub fn mersenne(n: u32) -> Self {
        Self::new(1.0, 2, n, -1)
    }

    /// Set the trial-factoring depth.
    #[must_use]
    pub fn with_sieve_depth(mut self, bits: f64) -> Self {
        self.sieve_depth = bits;
        self
    }

    /// Mark the number as already P-1 factored.
    #[must_use]
    pub fn with_pminus1ed(mut self, done: bool) -> Self {
        self.pminus1ed = done;
        self
    }

    /// Set the known factors.
    #[must_use]
    pub fn with_known_factors(mut self, factors: Vec<String>) -> Self {
        self.known_factors = if factors.is_empty() {
            None
        } else {
            Some(factors)
        };
        self
    }

    /// True for `2^n-1` with no known factors.
    #[must_use]
    pub fn is_mersenne_form(&self) -> bool {
        self.k == 1.0 && self.b == 2 && self.c == -1 && self.known_factors.is_none()
    }

    /// `log2` of the number, `log2(k) + log2(b) * n`.
    #[must_use]
    pub fn log2_size(&self) -> f64 {
        self.k.log2() + f64::from(self.b).log2() * f64::from(self.n)
    }
}

/// Formats as `M<n>` for Mersenne numbers, otherwise `k*b^n+c` with `k*`
/// omitted when `k` is one.
impl fmt::Display for ComputationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.k == 1.0 && self.b == 2 && self.c == -1 {
            return write!(f, "M{}", self.n);
        }
        if self.k != 1.0 {
            write!(f, "{:.0}*", self.k)?;
        }
        let sign = if self.c < 0 { '-' } else { '+' };
        write!(f, "{}^{}{}{}", self.b, self.n, sign, self.c.unsigned_abs())
    }
}
