//! Work queue read from a `worktodo` file.
//!
//! Each line assigns one unit of work to the current worker:
//!
//! ```text
//! [Worker #1]
//! Test=<aid>,86243,68,1
//! DoubleCheck=86249,68,1
//! PRP=1,2,1277,-1,70,0,3,1,"2557,4733"
//! PRPDC=1,2,86243,-1
//! Pminus1=1,2,1277,-1,1000000,30000000
//! Pfactor=1,2,86243,-1,68,2
//! ECM2=1,2,1277,-1,50000,5000000,10
//! Factor=86243,60,68
//! ```
//!
//! The assignment id is optional. Lines that cannot be understood are
//! logged and skipped; they never stop the rest of the file from loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ckpt_model::{ComputationSpec, QueuedWork, WorkKind};
use ckpt_report::StaticQueue;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Squarings per unit of B1 in P-1 stage 1 (`log2(e)`).
const ITERATIONS_PER_B1: f64 = 1.4427;

/// ECM stage 1 costs this many times a P-1 stage 1 with the same B1.
const ECM_COST_FACTOR: f64 = 8.0;

/// Highest worker number a `[Worker #N]` section may name.
pub const MAX_WORKERS: usize = 512;

/// Length of a hexadecimal assignment id.
const ASSIGNMENT_ID_LEN: usize = 32;

/// Per-item time estimates from a fixed cost per iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingModel {
    /// Milliseconds for one squaring.
    pub ms_per_iteration: f64,
}

impl Default for TimingModel {
    fn default() -> Self {
        Self {
            ms_per_iteration: 10.0,
        }
    }
}

impl TimingModel {
    /// Iterations needed to finish `item`.
    #[must_use]
    pub fn iterations(&self, item: &QueuedWork) -> f64 {
        let bound1 = item.bound1.unwrap_or(0.0);
        match item.kind {
            WorkKind::LucasLehmer | WorkKind::DoubleCheck | WorkKind::Prp => {
                f64::from(item.spec.n)
            }
            WorkKind::PMinus1 => ITERATIONS_PER_B1 * bound1,
            WorkKind::Ecm => {
                ECM_COST_FACTOR * ITERATIONS_PER_B1 * bound1 * f64::from(item.curves_to_do)
            }
            WorkKind::TrialFactor | WorkKind::None => 0.0,
        }
    }

    /// Seconds needed to finish `item`.
    #[must_use]
    pub fn estimate_seconds(&self, item: &QueuedWork) -> f64 {
        self.iterations(item) * self.ms_per_iteration / 1000.0
    }
}

/// Why a worktodo line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("unknown work type {0:?}")]
    UnknownWorkType(String),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid worker section {0:?}")]
    InvalidWorker(String),
}

/// Read and parse a worktodo file.
///
/// # Errors
///
/// Returns an error when the file cannot be read.
pub fn read_worktodo(path: &Path, timing: &TimingModel) -> Result<StaticQueue> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read worktodo file {}", path.display()))?;
    Ok(parse_worktodo(&text, timing))
}

/// Parse worktodo text into per-worker queues.
#[must_use]
pub fn parse_worktodo(text: &str, timing: &TimingModel) -> StaticQueue {
    let mut queue = StaticQueue::default();
    let mut worker = 0;
    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            match parse_worker_header(line) {
                Ok(index) => worker = index,
                Err(error) => warn!(line = number + 1, %error, "skipping worktodo line"),
            }
            continue;
        }
        match parse_line(line) {
            Ok(item) => {
                let seconds = timing.estimate_seconds(&item);
                debug!(line = number + 1, worker, kind = %item.kind, spec = %item.spec, "queued");
                queue.push(worker, item.with_estimate(seconds));
            }
            Err(error) => warn!(line = number + 1, %error, "skipping worktodo line"),
        }
    }
    queue
}

/// Worker index for a `[Worker #N]` header, zero based.
fn parse_worker_header(line: &str) -> Result<usize, LineError> {
    let invalid = || LineError::InvalidWorker(line.to_string());
    let number = line
        .strip_prefix("[Worker #")
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;
    match number.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_WORKERS).contains(&n) => Ok(n - 1),
        _ => Err(invalid()),
    }
}

/// Parse one assignment line.
///
/// # Errors
///
/// Returns [`LineError`] when the line is not a known assignment.
pub fn parse_line(line: &str) -> Result<QueuedWork, LineError> {
    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| LineError::UnknownWorkType(line.to_string()))?;
    let mut fields = Fields::new(split_fields(value));
    fields.skip_assignment_id();

    match key.trim().to_ascii_lowercase().as_str() {
        "test" => mersenne_test(WorkKind::LucasLehmer, &mut fields),
        "doublecheck" => mersenne_test(WorkKind::DoubleCheck, &mut fields),
        "prp" => prp(false, &mut fields),
        "prpdc" => prp(true, &mut fields),
        "pminus1" => {
            let spec = fields.number()?;
            let bound1: f64 = fields.required("B1")?;
            let _bound2: f64 = fields.required("B2")?;
            let spec = match fields.optional::<f64>("sieve depth")? {
                Some(bits) => spec.with_sieve_depth(bits),
                None => spec,
            };
            let spec = fields.known_factors(spec);
            Ok(QueuedWork::new(WorkKind::PMinus1, spec).with_bound1(bound1))
        }
        "pfactor" => {
            let spec = fields.number()?;
            let bits: f64 = fields.required("sieve depth")?;
            Ok(QueuedWork::new(WorkKind::PMinus1, spec.with_sieve_depth(bits)))
        }
        "ecm2" => {
            let spec = fields.number()?;
            let bound1: f64 = fields.required("B1")?;
            let _bound2: f64 = fields.required("B2")?;
            let curves: u32 = fields.required("curves")?;
            let spec = fields.known_factors(spec);
            Ok(QueuedWork::new(WorkKind::Ecm, spec)
                .with_bound1(bound1)
                .with_curves(curves))
        }
        "factor" => {
            let n: u32 = fields.required("exponent")?;
            let from: f64 = fields.required("sieve depth")?;
            let to: f64 = fields.required("factor limit")?;
            let spec = ComputationSpec::mersenne(n).with_sieve_depth(from);
            Ok(QueuedWork::new(WorkKind::TrialFactor, spec).with_factor_to(to))
        }
        other => Err(LineError::UnknownWorkType(other.to_string())),
    }
}

/// `Test=` and `DoubleCheck=`: exponent, sieve depth, P-1 done flag.
fn mersenne_test(kind: WorkKind, fields: &mut Fields<'_>) -> Result<QueuedWork, LineError> {
    let n: u32 = fields.required("exponent")?;
    let mut spec = ComputationSpec::mersenne(n);
    if let Some(bits) = fields.optional::<f64>("sieve depth")? {
        spec = spec.with_sieve_depth(bits);
    }
    if let Some(done) = fields.optional::<u32>("P-1 flag")? {
        spec = spec.with_pminus1ed(done != 0);
    }
    Ok(QueuedWork::new(kind, spec))
}

/// `PRP=` and `PRPDC=`: number, then optional sieve depth and tests saved,
/// optional base and residue type, optional quoted known factors.
fn prp(double_check: bool, fields: &mut Fields<'_>) -> Result<QueuedWork, LineError> {
    let mut spec = fields.number()?;
    spec.prp_double_check = double_check;
    if let Some(bits) = fields.optional::<f64>("sieve depth")? {
        spec = spec.with_sieve_depth(bits);
    }
    if let Some(tests_saved) = fields.optional::<f64>("tests saved")? {
        spec = spec.with_pminus1ed(tests_saved == 0.0);
    }
    let spec = fields.known_factors(spec);
    Ok(QueuedWork::new(WorkKind::Prp, spec))
}

/// Split on commas outside double quotes.
fn split_fields(value: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (index, ch) in value.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                fields.push(value[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    fields.push(value[start..].trim());
    fields
}

fn is_assignment_id(field: &str) -> bool {
    field.eq_ignore_ascii_case("N/A")
        || (field.len() == ASSIGNMENT_ID_LEN && field.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Cursor over the comma separated fields of one line.
struct Fields<'a> {
    fields: Vec<&'a str>,
    next: usize,
}

impl<'a> Fields<'a> {
    fn new(fields: Vec<&'a str>) -> Self {
        Self { fields, next: 0 }
    }

    fn skip_assignment_id(&mut self) {
        if self.fields.first().is_some_and(|f| is_assignment_id(f)) {
            self.next = 1;
        }
    }

    /// Next unquoted field, if any.
    fn peek_plain(&self) -> Option<&'a str> {
        self.fields
            .get(self.next)
            .copied()
            .filter(|field| !field.starts_with('"'))
    }

    fn required<T: std::str::FromStr>(&mut self, name: &'static str) -> Result<T, LineError> {
        self.optional(name)?.ok_or(LineError::MissingField(name))
    }

    fn optional<T: std::str::FromStr>(&mut self, name: &'static str) -> Result<Option<T>, LineError> {
        let Some(field) = self.peek_plain() else {
            return Ok(None);
        };
        self.next += 1;
        field
            .parse()
            .map(Some)
            .map_err(|_| LineError::InvalidField {
                field: name,
                value: field.to_string(),
            })
    }

    /// `k,b,n,c`.
    fn number(&mut self) -> Result<ComputationSpec, LineError> {
        let k: f64 = self.required("k")?;
        let b: u32 = self.required("b")?;
        let n: u32 = self.required("n")?;
        let c: i32 = self.required("c")?;
        Ok(ComputationSpec::new(k, b, n, c))
    }

    /// Attach a trailing quoted factor list, skipping unquoted fields before it.
    fn known_factors(&self, spec: ComputationSpec) -> ComputationSpec {
        let quoted = self.fields[self.next.min(self.fields.len())..]
            .iter()
            .find(|field| field.starts_with('"'));
        let Some(quoted) = quoted else {
            return spec;
        };
        let factors: Vec<String> = quoted
            .trim_matches('"')
            .split(',')
            .map(str::trim)
            .filter(|factor| !factor.is_empty())
            .map(str::to_string)
            .collect();
        if factors.is_empty() {
            spec
        } else {
            spec.with_known_factors(factors)
        }
    }
}
