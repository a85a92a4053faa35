//! Run pipeline: discover, load, build, render, write.
//!
//! Each stage takes the previous stage's output by reference. The output
//! workbook is written only once everything before it has succeeded.

use anyhow::{Context, Result};
use classgrid_core::{MatrixCalendar, Renderer};
use classgrid_grid::build_calendar;
use classgrid_parser::{load_directory, Timetable};
use classgrid_render::{MatrixRenderer, TextRenderer};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;

/// What a successful build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub students: usize,
    pub records: usize,
    pub skipped_rows: usize,
    pub skipped_files: usize,
}

/// Load every matching input file.
///
/// The output workbook is excluded from discovery so it is never read back
/// as a student timetable.
pub fn load(config: &Config) -> Result<Timetable> {
    let timetable = load_directory(
        &config.input_dir,
        &config.pattern,
        Some(config.output.as_path()),
        config.load_options(),
    )?;
    Ok(timetable)
}

/// Build the render model from loaded records
pub fn calendar(config: &Config, timetable: &Timetable) -> Result<MatrixCalendar> {
    let calendar = build_calendar(
        &timetable.records,
        &timetable.students,
        &config.grid_options(),
    )?;
    Ok(calendar)
}

/// Full run: load, build, render and write the workbook
pub fn build(config: &Config) -> Result<BuildSummary> {
    let timetable = load(config)?;
    let calendar = calendar(config, &timetable)?;
    let bytes = MatrixRenderer::new()
        .render(&calendar)
        .context("Failed to render workbook")?;

    std::fs::write(&config.output, bytes)
        .with_context(|| format!("Cannot write {}", config.output.display()))?;

    let summary = BuildSummary {
        output: config.output.clone(),
        students: calendar.students.len(),
        records: timetable.records.len(),
        skipped_rows: timetable.skipped_rows.len(),
        skipped_files: timetable.skipped_files.len(),
    };
    info!(
        output = %summary.output.display(),
        students = summary.students,
        records = summary.records,
        "workbook written"
    );
    Ok(summary)
}

/// Text preview of the matrix
pub fn preview(config: &Config, busy_only: bool, width: usize) -> Result<String> {
    let timetable = load(config)?;
    let calendar = calendar(config, &timetable)?;
    let mut renderer = TextRenderer::new().column_width(width);
    if busy_only {
        renderer = renderer.busy_only();
    }
    Ok(renderer.render(&calendar)?)
}

/// Human-readable validation report
pub fn check_report(timetable: &Timetable) -> String {
    let mut out = String::new();
    let name_width = timetable
        .students
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Students: {}", timetable.students.len());
    for student in &timetable.students {
        let classes = timetable.records_for(student).count();
        let noun = if classes == 1 { "class" } else { "classes" };
        let _ = writeln!(out, "  {student:<name_width$}  {classes} {noun}");
    }

    let _ = writeln!(out, "Skipped rows: {}", timetable.skipped_rows.len());
    for skipped in &timetable.skipped_rows {
        let _ = writeln!(
            out,
            "  {} row {}: {}",
            skipped.student, skipped.row, skipped.reason
        );
    }

    if !timetable.skipped_files.is_empty() {
        let _ = writeln!(out, "Skipped files: {}", timetable.skipped_files.len());
        for skipped in &timetable.skipped_files {
            let _ = writeln!(out, "  {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    out
}

/// Loaded timetable as pretty JSON
pub fn check_json(timetable: &Timetable) -> Result<String> {
    serde_json::to_string_pretty(timetable).context("Failed to serialize timetable")
}
