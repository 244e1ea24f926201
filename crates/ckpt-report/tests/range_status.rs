//! Integration tests for the queued work report.

use chrono::{DateTime, TimeZone, Utc};
use ckpt_model::{ComputationSpec, QueuedWork, WorkKind};
use ckpt_report::{
    EPOCH_LIMIT, ReportOptions, StaticQueue, StatusBuffer, range_status_message,
    write_range_status,
};

fn now() -> DateTime<Utc> {
    // Mon Jan  1 00:00:00 UTC 2024
    Utc.timestamp_opt(1_704_067_200, 0).unwrap()
}

fn ll(n: u32, hours: f64) -> QueuedWork {
    QueuedWork::new(
        WorkKind::LucasLehmer,
        ComputationSpec::mersenne(n).with_sieve_depth(75.0),
    )
    .with_estimate(hours * 3_600.0)
}

#[test]
fn single_worker_report() {
    let queue = StaticQueue::new(vec![vec![
        ll(100_000_000, 24.0),
        QueuedWork::new(
            WorkKind::Ecm,
            ComputationSpec::new(1.0, 2, 1_277, 1),
        )
        .with_curves(5)
        .with_bound1(50_000.0)
        .with_estimate(3_600.0),
    ]]);
    let text = range_status_message(&queue, &ReportOptions::default(), &now());
    insta::assert_snapshot!(text, @r"
    Below is a report on the work you have queued and any expected completion dates.
    M100000000, Lucas-Lehmer test, Tue Jan  2 00:00 2024
    2^1277+1, ECM 5 curves B1=50000, Tue Jan  2 01:00 2024
    The chance that the exponent you are testing will yield a Mersenne prime is about 1 in 779775.
    ");
}

#[test]
fn workers_get_headers_and_idle_workers_say_so() {
    let queue = StaticQueue::new(vec![vec![ll(100_000_000, 1.0)], Vec::new()]);
    let text = range_status_message(&queue, &ReportOptions::default(), &now());
    insta::assert_snapshot!(text, @r"
    Below is a report on the work you have queued and any expected completion dates.
    [Worker thread #1]
    M100000000, Lucas-Lehmer test, Mon Jan  1 01:00 2024
    [Worker thread #2]
    No work queued up.
    The chance that the exponent you are testing will yield a Mersenne prime is about 1 in 779775.
    ");
}

#[test]
fn worker_line_budget_adds_marker_but_keeps_counting() {
    let items: Vec<QueuedWork> = (0..6).map(|i| ll(100_000_000 + i, 1.0)).collect();
    let queue = StaticQueue::new(vec![items]);
    let options = ReportOptions::default().with_status_lines(3);
    let mut buffer = StatusBuffer::with_reserve(options.range_buffer_len, options.reserve);

    let status = write_range_status(&queue, &options, &now(), &mut buffer);
    assert!(status.is_truncated());
    let text = buffer.as_str();
    assert_eq!(text.lines().filter(|l| l.contains("Lucas-Lehmer")).count(), 2);
    assert_eq!(text.matches("More...").count(), 1);
    assert!(text.contains("one of the 6 exponents"));
}

#[test]
fn dates_past_2038_use_sentinel() {
    let late = Utc.timestamp_opt(EPOCH_LIMIT - 10, 0).unwrap();
    let queue = StaticQueue::new(vec![vec![ll(100_000_000, 1.0)]]);
    let text = range_status_message(&queue, &ReportOptions::default(), &late);
    assert!(text.contains("M100000000, Lucas-Lehmer test, after Jan 19 2038\n"));
}

#[test]
fn empty_queue_says_no_work_queued() {
    let queue = StaticQueue::default();
    let text = range_status_message(&queue, &ReportOptions::default(), &now());
    assert_eq!(
        text,
        "Below is a report on the work you have queued and any expected completion dates.\n\
         No work queued up.\n"
    );
}

#[test]
fn idle_single_worker_says_it_once() {
    let queue = StaticQueue::new(vec![Vec::new()]);
    let text = range_status_message(&queue, &ReportOptions::default(), &now());
    assert_eq!(text.matches("No work queued up.").count(), 1);
}

#[test]
fn factoring_only_queue_has_no_work_footer() {
    let factoring = StaticQueue::new(vec![vec![
        QueuedWork::new(WorkKind::TrialFactor, ComputationSpec::mersenne(1_277).with_sieve_depth(60.0))
            .with_factor_to(64.0),
    ]]);
    let text = range_status_message(&factoring, &ReportOptions::default(), &now());
    insta::assert_snapshot!(text, @r"
    Below is a report on the work you have queued and any expected completion dates.
    M1277, factor from 2^60 to 2^64, Mon Jan  1 00:00 2024
    No work queued up.
    ");
}

#[test]
fn small_buffer_never_overflows() {
    let items: Vec<QueuedWork> = (0..40).map(|i| ll(100_000_000 + i, 1.0)).collect();
    let queue = StaticQueue::new(vec![items]);
    let options = ReportOptions::default()
        .with_range_buffer_len(400)
        .with_status_lines(100);
    let text = range_status_message(&queue, &options, &now());
    assert!(text.len() <= 400);
    assert_eq!(text.matches("More...").count(), 1);
}
