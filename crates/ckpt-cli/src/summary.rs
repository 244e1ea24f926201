use std::path::Path;

use chrono::{DateTime, TimeZone};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ckpt_model::{Checkpoint, PMinus1Stage, ProgressRecord};
use ckpt_report::{
    ReportOptions, StaticQueue, WorkQueue, completion_date, estimate_queue, progress_summary,
    work_description,
};
use ckpt_scan::{MAX_CANDIDATES, ScanReport};

pub fn print_scan_table(report: &ScanReport) {
    println!(
        "Found {} checkpoint files in {:?}",
        report.entries.len(),
        report.directory
    );
    if report.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Kind"),
        header_cell("Number"),
        header_cell("Progress"),
    ]);
    apply_table_style(&mut table);
    for entry in &report.entries {
        match &entry.outcome {
            Ok(checkpoint) => table.add_row(vec![
                Cell::new(&entry.name),
                Cell::new(checkpoint.kind().label()).fg(Color::Cyan),
                Cell::new(checkpoint.spec()),
                Cell::new(progress_summary(checkpoint)),
            ]),
            Err(error) => table.add_row(vec![
                Cell::new(&entry.name).fg(Color::Red),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(format!("unable to parse: {error}")).fg(Color::Red),
            ]),
        };
    }
    println!("{table}");
    let failed = report.failures().count();
    if failed > 0 {
        println!("{failed} file(s) could not be parsed.");
    }
    if report.cap_reached {
        println!("Only the first {MAX_CANDIDATES} candidate files were read.");
    }
}

pub fn print_checkpoint(path: &Path, checkpoint: &Checkpoint) {
    println!("Checkpoint: {}", path.display());
    let header = &checkpoint.header;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let mut row = |field: &str, value: String| {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    };
    row("Kind", checkpoint.kind().label().to_string());
    row("Number", header.spec.to_string());
    row("Magic", format!("0x{:08X}", header.magic));
    row("Version", header.version.to_string());
    row("Stage label", header.stage_label.clone());
    row("Complete", format!("{:.2}%", header.pct_complete * 100.0));
    row("Checksum", format!("0x{:08X}", header.checksum));
    match &checkpoint.progress {
        ProgressRecord::LucasLehmer(iter) | ProgressRecord::Prp(iter) => {
            row(
                "Iterations",
                format!("{}/{}", iter.iterations_done, iter.iterations_total),
            );
            row("Errors", iter.error_count.to_string());
        }
        ProgressRecord::PMinus1(pm1) => {
            row("Stage", pminus1_stage_text(pm1.stage));
            row("B1", pm1.bound1.to_string());
            row("B1 done", pm1.bound1_done.to_string());
            row("B2 start", pm1.bound2_start.to_string());
            row("B2", pm1.bound2.to_string());
            row("B2 done", pm1.bound2_done.to_string());
            row("D", pm1.stage2_step.to_string());
            row("E", pm1.relations_done.to_string());
        }
        ProgressRecord::Ecm(ecm) => {
            row("Stage", ecm.stage.number().to_string());
            row("Curve", ecm.curve_index.to_string());
            row("Sigma", format!("{:.0}", ecm.sigma));
            row("B1", ecm.bound1.to_string());
            row("B1 processed", ecm.bound1_processed.to_string());
            row("B2 processed", ecm.bound2_processed.to_string());
        }
        ProgressRecord::TrialFactor => row("Progress", "not recorded".to_string()),
    }
    row("Summary", progress_summary(checkpoint));
    println!("{table}");
}

fn pminus1_stage_text(stage: PMinus1Stage) -> String {
    match stage {
        PMinus1Stage::Stage0 { next_bit } => format!("stage 1, next bit {next_bit}"),
        PMinus1Stage::Stage1 { last_prime } => format!("stage 1, last prime {last_prime}"),
        PMinus1Stage::Stage2Running { bound1_completed } => {
            format!("stage 2, after B1={bound1_completed}")
        }
        PMinus1Stage::Done => "done".to_string(),
    }
}

pub fn print_queue_table<Tz>(queue: &StaticQueue, options: &ReportOptions, now: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Worker"),
        header_cell("Number"),
        header_cell("Work"),
        header_cell("Hours"),
        header_cell("Completes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for worker in 0..queue.worker_count() {
        let mut seconds = 0.0;
        let mut index = 0;
        while let Some(item) = queue.item(worker, index) {
            index += 1;
            seconds += item.estimated_seconds;
            table.add_row(vec![
                Cell::new(worker + 1),
                Cell::new(&item.spec),
                Cell::new(work_description(&item)),
                Cell::new(format!("{:.1}", item.estimated_seconds / 3_600.0)),
                Cell::new(completion_date(now, seconds)),
            ]);
        }
    }
    if queue.is_empty() {
        println!("No work queued up.");
        return;
    }
    println!("{table}");
    println!("{}", estimate_queue(queue, &options.estimator));
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
