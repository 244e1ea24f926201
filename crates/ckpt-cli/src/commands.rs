use anyhow::{Context, Result};
use chrono::Local;
use ckpt_format::decode_path;
use ckpt_model::{Checkpoint, QueuedWork};
use ckpt_report::{
    StatusBuffer, SuccessEstimate, describe, estimate_queue, progress_summary,
    range_status_message, write_restore_status,
};
use ckpt_scan::{FsDirectory, ScanReport, scan};
use serde::Serialize;
use tracing::{debug, info_span};

use ckpt_cli::config::Settings;
use ckpt_cli::worktodo::read_worktodo;

use crate::cli::{InspectArgs, OutputFormatArg, QueueArgs, StatusArgs};
use crate::summary::{print_checkpoint, print_queue_table, print_scan_table};

/// What `status` reported.
#[derive(Debug, Clone, Copy)]
pub struct StatusOutcome {
    /// The working directory could not be read; the report already says so.
    pub has_errors: bool,
}

pub fn run_status(args: &StatusArgs, settings: &Settings) -> Result<StatusOutcome> {
    let span = info_span!("status", directory = %args.directory.display());
    let _guard = span.enter();
    let directory = FsDirectory::new(&args.directory);
    let result = scan(&directory);

    if matches!(args.format, OutputFormatArg::Text) {
        let mut buffer = StatusBuffer::with_reserve(
            settings.report.restore_buffer_len,
            settings.report.reserve,
        );
        if write_restore_status(&result, &mut buffer).is_truncated() {
            debug!(len = buffer.len(), "status report truncated");
        }
        print!("{buffer}");
        return Ok(StatusOutcome {
            has_errors: result.is_err(),
        });
    }
    let report = result.context("status scan failed")?;
    match args.format {
        OutputFormatArg::Text => {}
        OutputFormatArg::Table => print_scan_table(&report),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&ScanJson::from_report(&report))
                .context("serialize scan report")?;
            println!("{json}");
        }
    }
    Ok(StatusOutcome { has_errors: false })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let checkpoint = decode_path(&args.file)
        .with_context(|| format!("decode {}", args.file.display()))?;
    match args.format {
        OutputFormatArg::Text => println!("{}", progress_summary(&checkpoint)),
        OutputFormatArg::Table => print_checkpoint(&args.file, &checkpoint),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&checkpoint).context("serialize checkpoint")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn run_queue(args: &QueueArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("queue", worktodo = %args.worktodo.display());
    let _guard = span.enter();
    let queue = read_worktodo(&args.worktodo, &settings.timing)?;
    let now = Local::now();
    match args.format {
        OutputFormatArg::Text => {
            let text = range_status_message(&queue, &settings.report, &now);
            println!("{}", text.trim_end());
        }
        OutputFormatArg::Table => print_queue_table(&queue, &settings.report, &now),
        OutputFormatArg::Json => {
            let estimate = estimate_queue(&queue, &settings.report.estimator);
            let json = QueueJson {
                workers: queue.workers(),
                summary: estimate.to_string(),
                estimate,
            };
            let json = serde_json::to_string_pretty(&json).context("serialize work queue")?;
            println!("{json}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ScanJson<'a> {
    directory: &'a str,
    cap_reached: bool,
    entries: Vec<EntryJson<'a>>,
}

#[derive(Serialize)]
struct EntryJson<'a> {
    name: &'a str,
    backup: bool,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checkpoint: Option<&'a Checkpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ScanJson<'a> {
    fn from_report(report: &'a ScanReport) -> Self {
        let entries = report
            .entries
            .iter()
            .map(|entry| EntryJson {
                name: &entry.name,
                backup: entry.backup,
                summary: describe(entry.checkpoint()),
                checkpoint: entry.checkpoint(),
                error: entry.outcome.as_ref().err().map(ToString::to_string),
            })
            .collect();
        Self {
            directory: &report.directory,
            cap_reached: report.cap_reached,
            entries,
        }
    }
}

#[derive(Serialize)]
struct QueueJson<'a> {
    workers: &'a [Vec<QueuedWork>],
    estimate: SuccessEstimate,
    summary: String,
}
