//! Terminal tables for job, quality and partition results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fuel_model::{ExecutionSummary, JobReport, PipelineStatus, QualityReport, logical_type};
use fuel_quality::issues;
use fuel_store::PartitionInfo;

pub fn print_execution_summary(summary: &ExecutionSummary) {
    println!("Pipeline: {}", summary.pipeline_id);
    println!("Status: {}", status_label(summary.status));
    println!("Total: {:.2}s", summary.total_seconds);
    println!("{}", job_table(&summary.jobs));
    print_job_errors(&summary.jobs);
}

pub fn print_job_report(report: &JobReport) {
    println!("{}", job_table(std::slice::from_ref(report)));
    print_job_errors(std::slice::from_ref(report));
}

fn print_job_errors(jobs: &[JobReport]) {
    let failed: Vec<&JobReport> = jobs.iter().filter(|job| !job.is_success()).collect();
    if failed.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for job in failed {
        eprintln!("- {}: {}", job.job_name, job.error().unwrap_or_default());
    }
}

pub fn job_table(jobs: &[JobReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("Status"),
        header_cell("Records in"),
        header_cell("Records out"),
        header_cell("Partitions"),
        header_cell("Files"),
        header_cell("Quality"),
        header_cell("Seconds"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for job in jobs {
        let mut row = vec![Cell::new(&job.job_name).add_attribute(Attribute::Bold)];
        match job.metrics() {
            Some(metrics) => {
                row.push(Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold));
                row.push(Cell::new(metrics.records_input));
                row.push(Cell::new(metrics.records_output));
                row.push(Cell::new(metrics.partitions_written));
                row.push(Cell::new(metrics.files_written));
                row.push(match metrics.quality_score {
                    Some(score) => score_cell(score),
                    None => dim_cell("-"),
                });
            }
            None => {
                row.push(Cell::new("FAILED").fg(Color::Red).add_attribute(Attribute::Bold));
                row.extend((0..5).map(|_| dim_cell("-")));
            }
        }
        row.push(Cell::new(format!("{:.2}", job.elapsed_seconds)));
        table.add_row(row);
    }
    table
}

pub fn print_quality_report(report: &QualityReport) {
    let info = &report.dataset_info;
    println!(
        "Rows: {}  Columns: {}  Memory: {:.2} MB",
        info.total_rows, info.total_columns, info.memory_usage_mb
    );
    println!("{}", quality_table(report));
    if let Some(uniqueness) = report.uniqueness {
        println!("Uniqueness: {uniqueness:.3}");
    }
    println!("Overall quality score: {:.3}", report.overall_quality_score);
    let found = issues(report);
    if !found.is_empty() {
        println!();
        println!("Issues:");
        for issue in found {
            println!("- {issue}");
        }
    }
}

/// One row per column with its completeness, consistency and validity.
pub fn quality_table(report: &QualityReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Completeness"),
        header_cell("Consistency"),
        header_cell("Validity"),
    ]);
    apply_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let validity = report.validity.as_ref();
    for (column, completeness) in &report.completeness {
        let kind = logical_type(column).map_or("-", |kind| kind.as_str());
        table.add_row(vec![
            Cell::new(column),
            dim_cell(kind),
            score_cell(*completeness),
            optional_score_cell(report.consistency.get(column).copied()),
            optional_score_cell(validity.and_then(|scores| scores.get(column)).copied()),
        ]);
    }
    // Rule columns absent from the table only appear in validity.
    if let Some(scores) = validity {
        for (column, score) in scores {
            if report.completeness.contains_key(column) {
                continue;
            }
            table.add_row(vec![
                Cell::new(column).fg(Color::DarkGrey),
                dim_cell("absent"),
                dim_cell("-"),
                dim_cell("-"),
                score_cell(*score),
            ]);
        }
    }
    table
}

pub fn print_partitions(partitions: &[PartitionInfo]) {
    if partitions.is_empty() {
        println!("No partitions found.");
        return;
    }
    println!("{}", partition_table(partitions));
}

pub fn partition_table(partitions: &[PartitionInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Partition"),
        header_cell("Files"),
        header_cell("Size (MB)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_files = 0;
    let mut total_mb = 0.0;
    for partition in partitions {
        total_files += partition.files;
        total_mb += partition.size_mb;
        table.add_row(vec![
            Cell::new(partition.path.display()),
            Cell::new(partition.files),
            Cell::new(format!("{:.3}", partition.size_mb)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(total_files).add_attribute(Attribute::Bold),
        Cell::new(format!("{total_mb:.3}")).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_label(status: PipelineStatus) -> &'static str {
    match status {
        PipelineStatus::Success => "SUCCESS",
        PipelineStatus::Failed => "FAILED",
    }
}

fn score_cell(score: f64) -> Cell {
    let color = if score >= 0.9 {
        Color::Green
    } else if score >= 0.8 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{score:.3}")).fg(color)
}

fn optional_score_cell(score: Option<f64>) -> Cell {
    score.map_or_else(|| dim_cell("-"), score_cell)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
