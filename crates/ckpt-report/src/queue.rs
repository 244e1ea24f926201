//! Queued work and the range status report.
//!
//! The work queue belongs to whoever schedules the work and may change while
//! a report is built. [`WorkQueue`] therefore hands out one owned item at a
//! time by position and never promises a stable snapshot.

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, TimeDelta, TimeZone};
use ckpt_model::{QueuedWork, WorkKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{RenderStatus, StatusBuffer};
use crate::estimate::{NO_WORK_QUEUED, SuccessEstimate};
use crate::options::ReportOptions;

/// Timestamps at or past this value are shown as [`POST_2038_SENTINEL`].
pub const EPOCH_LIMIT: i64 = 2_147_483_640;

/// Completion date shown when the estimate passes [`EPOCH_LIMIT`].
pub const POST_2038_SENTINEL: &str = "after Jan 19 2038";

const DATE_FORMAT: &str = "%a %b %e %H:%M %Y";

const RANGE_INTRO: &str =
    "Below is a report on the work you have queued and any expected completion dates.";

/// Read access to per-worker work queues.
pub trait WorkQueue {
    /// Number of workers.
    fn worker_count(&self) -> usize;

    /// Item `index` of `worker`'s queue, or `None` past the end.
    fn item(&self, worker: usize, index: usize) -> Option<QueuedWork>;
}

/// A fixed set of worker queues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticQueue {
    workers: Vec<Vec<QueuedWork>>,
}

impl StaticQueue {
    /// Create a queue from per-worker item lists.
    #[must_use]
    pub fn new(workers: Vec<Vec<QueuedWork>>) -> Self {
        Self { workers }
    }

    /// Append `item` to `worker`'s queue, adding empty workers as needed.
    pub fn push(&mut self, worker: usize, item: QueuedWork) {
        if self.workers.len() <= worker {
            self.workers.resize_with(worker + 1, Vec::new);
        }
        self.workers[worker].push(item);
    }

    /// Remove the first item of `worker`'s queue.
    pub fn pop_front(&mut self, worker: usize) -> Option<QueuedWork> {
        let items = self.workers.get_mut(worker)?;
        if items.is_empty() {
            return None;
        }
        Some(items.remove(0))
    }

    /// Per-worker item lists.
    #[must_use]
    pub fn workers(&self) -> &[Vec<QueuedWork>] {
        &self.workers
    }

    /// Total queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.iter().map(Vec::len).sum()
    }

    /// True when no worker has queued items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WorkQueue for StaticQueue {
    fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn item(&self, worker: usize, index: usize) -> Option<QueuedWork> {
        self.workers.get(worker)?.get(index).cloned()
    }
}

/// A queue shared with a scheduler. Each read takes the lock on its own.
impl<Q: WorkQueue> WorkQueue for RwLock<Q> {
    fn worker_count(&self) -> usize {
        self.read().map_or(0, |queue| queue.worker_count())
    }

    fn item(&self, worker: usize, index: usize) -> Option<QueuedWork> {
        self.read().ok()?.item(worker, index)
    }
}

/// Short description of the work, e.g. `ECM 3 curves B1=50000`.
#[must_use]
pub fn work_description(item: &QueuedWork) -> String {
    match item.kind {
        WorkKind::Ecm => format!(
            "ECM {} curve{} B1={:.0}",
            item.curves_to_do,
            if item.curves_to_do == 1 { "" } else { "s" },
            item.bound1.unwrap_or(0.0)
        ),
        WorkKind::PMinus1 => match item.bound1 {
            Some(bound1) => format!("P-1 B1={bound1:.0}"),
            None => "P-1".to_string(),
        },
        WorkKind::TrialFactor => format!(
            "factor from 2^{:.0} to 2^{:.0}",
            item.spec.sieve_depth.trunc(),
            item.factor_to.unwrap_or(0.0).trunc()
        ),
        WorkKind::LucasLehmer => "Lucas-Lehmer test".to_string(),
        WorkKind::DoubleCheck => "Double-check".to_string(),
        WorkKind::Prp => "PRP".to_string(),
        WorkKind::None => String::new(),
    }
}

/// Number under test, marked when a PRP test runs on its cofactor.
fn number_label(item: &QueuedWork) -> String {
    if item.kind == WorkKind::Prp && item.spec.known_factors.is_some() {
        format!("{}/known_factors", item.spec)
    } else {
        item.spec.to_string()
    }
}

/// Date `seconds` after `now`, or [`POST_2038_SENTINEL`] when that is at or
/// beyond [`EPOCH_LIMIT`].
#[must_use]
pub fn completion_date<Tz>(now: &DateTime<Tz>, seconds: f64) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if !seconds.is_finite() {
        return POST_2038_SENTINEL.to_string();
    }
    let seconds = seconds.max(0.0);
    let limit = EPOCH_LIMIT as f64;
    let finish = now.timestamp() as f64 + seconds;
    if finish >= limit {
        return POST_2038_SENTINEL.to_string();
    }
    let delta = TimeDelta::try_seconds(seconds as i64);
    delta
        .and_then(|delta| now.clone().checked_add_signed(delta))
        .map_or_else(
            || POST_2038_SENTINEL.to_string(),
            |when| when.format(DATE_FORMAT).to_string(),
        )
}

/// Write the range status report for `queue` into `buffer`.
///
/// Each worker gets at most `lines_per_worker` lines, including its
/// `[Worker thread #N]` header. The probability estimate is written last
/// as a footer, reading `No work queued up.` when no queued item is a
/// primality test.
pub fn write_range_status<Q, Tz>(
    queue: &Q,
    options: &ReportOptions,
    now: &DateTime<Tz>,
    buffer: &mut StatusBuffer,
) -> RenderStatus
where
    Q: WorkQueue + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let workers = queue.worker_count();
    let lines_per_worker = options.lines_per_worker(workers);
    let mut estimate = SuccessEstimate::new();
    let mut status = buffer.push_record(RANGE_INTRO);
    let mut any_listed = false;

    if workers == 0 && buffer.push_record(NO_WORK_QUEUED).is_truncated() {
        status = RenderStatus::Truncated;
    }

    for worker in 0..workers {
        let mut lines = 0;
        let mut listed = 0;
        let mut section_full = false;
        let mut seconds = 0.0;

        if workers > 1 {
            let header = format!("[Worker thread #{}]", worker + 1);
            if buffer.push_record(&header).is_truncated() {
                status = RenderStatus::Truncated;
            }
            lines += 1;
        }

        let mut index = 0;
        while let Some(item) = queue.item(worker, index) {
            index += 1;
            if item.kind == WorkKind::None {
                continue;
            }
            listed += 1;
            estimate.add(&item, &options.estimator);
            seconds += item.estimated_seconds;
            if section_full {
                continue;
            }
            if lines + 1 >= lines_per_worker {
                debug!(worker, lines, "worker line budget used up");
                section_full = true;
                status = RenderStatus::Truncated;
                if buffer.push_marker().is_truncated() {
                    debug!(worker, "no room for worker marker");
                }
                continue;
            }
            let line = format!(
                "{}, {}, {}",
                number_label(&item),
                work_description(&item),
                completion_date(now, seconds)
            );
            if buffer.push_record(&line).is_truncated() {
                section_full = true;
                status = RenderStatus::Truncated;
            }
            lines += 1;
        }

        any_listed |= listed > 0;
        if listed == 0 && buffer.push_record(NO_WORK_QUEUED).is_truncated() {
            status = RenderStatus::Truncated;
        }
    }

    // Idle workers already said so; the footer covers queues of non-tests.
    let footer = estimate.count > 0 || any_listed;
    if footer && buffer.push_footer(&estimate.to_string()).is_truncated() {
        status = RenderStatus::Truncated;
    }
    status
}

/// Build the range status report with a buffer sized from `options`.
#[must_use]
pub fn range_status_message<Q, Tz>(queue: &Q, options: &ReportOptions, now: &DateTime<Tz>) -> String
where
    Q: WorkQueue + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut buffer = StatusBuffer::with_reserve(options.range_buffer_len, options.reserve);
    if write_range_status(queue, options, now, &mut buffer).is_truncated() {
        debug!(len = buffer.len(), "range status truncated");
    }
    buffer.into_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ckpt_model::ComputationSpec;

    use super::*;

    fn at(timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0).unwrap()
    }

    #[test]
    fn descriptions_by_kind() {
        let spec = ComputationSpec::mersenne(1_277).with_sieve_depth(60.0);
        let ecm = QueuedWork::new(WorkKind::Ecm, spec.clone())
            .with_curves(1)
            .with_bound1(50_000.0);
        assert_eq!(work_description(&ecm), "ECM 1 curve B1=50000");
        let ecm = ecm.with_curves(3);
        assert_eq!(work_description(&ecm), "ECM 3 curves B1=50000");

        let pm1 = QueuedWork::new(WorkKind::PMinus1, spec.clone());
        assert_eq!(work_description(&pm1), "P-1");
        assert_eq!(work_description(&pm1.with_bound1(1e6)), "P-1 B1=1000000");

        let tf = QueuedWork::new(WorkKind::TrialFactor, spec.clone()).with_factor_to(67.0);
        assert_eq!(work_description(&tf), "factor from 2^60 to 2^67");

        assert_eq!(
            work_description(&QueuedWork::new(WorkKind::LucasLehmer, spec.clone())),
            "Lucas-Lehmer test"
        );
        assert_eq!(
            work_description(&QueuedWork::new(WorkKind::DoubleCheck, spec.clone())),
            "Double-check"
        );
        assert_eq!(work_description(&QueuedWork::new(WorkKind::Prp, spec)), "PRP");
    }

    #[test]
    fn known_factors_mark_prp_cofactors() {
        let spec = ComputationSpec::mersenne(1_277).with_known_factors(vec!["3".to_string()]);
        let prp = QueuedWork::new(WorkKind::Prp, spec.clone());
        assert_eq!(number_label(&prp), "M1277/known_factors");
        let ll = QueuedWork::new(WorkKind::LucasLehmer, spec);
        assert_eq!(number_label(&ll), "M1277");
    }

    #[test]
    fn completion_date_format() {
        // Mon Jan  1 00:00:00 UTC 2024
        let now = at(1_704_067_200);
        assert_eq!(completion_date(&now, 0.0), "Mon Jan  1 00:00 2024");
        assert_eq!(completion_date(&now, 86_400.0 * 10.0 + 90.0), "Thu Jan 11 00:01 2024");
    }

    #[test]
    fn completion_date_sentinel_at_epoch_limit() {
        let now = at(EPOCH_LIMIT - 100);
        assert_eq!(completion_date(&now, 99.0), "Tue Jan 19 03:13 2038");
        assert_eq!(completion_date(&now, 100.0), POST_2038_SENTINEL);
        assert_eq!(completion_date(&now, f64::INFINITY), POST_2038_SENTINEL);
    }

    #[test]
    fn rwlock_queue_reads_current_contents() {
        let spec = ComputationSpec::mersenne(127);
        let mut inner = StaticQueue::default();
        inner.push(0, QueuedWork::new(WorkKind::LucasLehmer, spec.clone()));
        inner.push(0, QueuedWork::new(WorkKind::Prp, spec));
        let shared = RwLock::new(inner);
        assert_eq!(shared.item(0, 0).map(|w| w.kind), Some(WorkKind::LucasLehmer));
        shared.write().unwrap().pop_front(0);
        assert_eq!(shared.item(0, 0).map(|w| w.kind), Some(WorkKind::Prp));
        assert!(shared.item(0, 1).is_none());
        assert!(shared.item(3, 0).is_none());
    }
}
