//! Header validation.
//!
//! The decoder hands every header to a [`HeaderValidator`] before any
//! kind-specific field is read. A validator may reject the header or fill in
//! derived spec fields (known factors, sieve depth) from its own context.

use ckpt_model::{CheckpointHeader, ComputationSpec};

use crate::error::{DecodeError, Result};

/// Validates a freshly read header.
pub trait HeaderValidator {
    /// Check the header, possibly completing `header.spec`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Invalid`] when the header content is rejected.
    fn validate(&self, header: &mut CheckpointHeader) -> Result<()>;
}

impl<V: HeaderValidator + ?Sized> HeaderValidator for &V {
    fn validate(&self, header: &mut CheckpointHeader) -> Result<()> {
        (**self).validate(header)
    }
}

/// Structural checks that need no outside context.
///
/// Rejects a non-positive or non-finite `k`, a base below 2, a zero exponent
/// and a non-finite completion fraction. The completion fraction is clamped
/// to `0.0..=1.0`. The checksum is not recomputed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHeaderValidator;

impl HeaderValidator for StandardHeaderValidator {
    fn validate(&self, header: &mut CheckpointHeader) -> Result<()> {
        let spec = &header.spec;
        if !spec.k.is_finite() || spec.k <= 0.0 {
            return Err(DecodeError::invalid(format!("k must be positive, got {}", spec.k)));
        }
        if spec.b < 2 {
            return Err(DecodeError::invalid(format!("base must be at least 2, got {}", spec.b)));
        }
        if spec.n == 0 {
            return Err(DecodeError::invalid("exponent must be non-zero"));
        }
        if !header.pct_complete.is_finite() {
            return Err(DecodeError::invalid("completion fraction is not a number"));
        }
        header.pct_complete = header.pct_complete.clamp(0.0, 1.0);
        Ok(())
    }
}

/// Validates a checkpoint against the work unit expected to own it.
///
/// Runs the standard checks, requires `k`, `b`, `n` and `c` to match, then
/// copies the work unit's derived fields into the decoded spec.
#[derive(Debug, Clone, Copy)]
pub struct WorkUnitValidator<'a> {
    expected: &'a ComputationSpec,
}

impl<'a> WorkUnitValidator<'a> {
    /// Validate against `expected`.
    #[must_use]
    pub fn new(expected: &'a ComputationSpec) -> Self {
        Self { expected }
    }
}

impl HeaderValidator for WorkUnitValidator<'_> {
    fn validate(&self, header: &mut CheckpointHeader) -> Result<()> {
        StandardHeaderValidator.validate(header)?;
        let spec = &mut header.spec;
        let expected = self.expected;
        if spec.k != expected.k || spec.b != expected.b || spec.n != expected.n || spec.c != expected.c
        {
            return Err(DecodeError::invalid(format!(
                "checkpoint is for {spec}, expected {expected}"
            )));
        }
        spec.known_factors.clone_from(&expected.known_factors);
        spec.sieve_depth = expected.sieve_depth;
        spec.pminus1ed = expected.pminus1ed;
        spec.prp_double_check = expected.prp_double_check;
        Ok(())
    }
}
