//! # classgrid-render
//!
//! Rendering backends for classgrid matrix calendars.
//!
//! This crate provides:
//! - Excel workbook with Matrix and Legend sheets (`MatrixRenderer`)
//! - Plain text preview for terminals (`TextRenderer`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use classgrid_core::Renderer;
//! use classgrid_render::{MatrixRenderer, TextRenderer};
//!
//! let xlsx_bytes = MatrixRenderer::new().render(&calendar)?;
//! std::fs::write("student_matrix_calendar.xlsx", xlsx_bytes)?;
//!
//! println!("{}", TextRenderer::new().render(&calendar)?);
//! ```

pub mod excel;

pub use excel::MatrixRenderer;

use classgrid_core::{format_minutes, MatrixCalendar, RenderError, Renderer, TimeSlot, Weekday};

/// One row of the matrix body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixRow {
    Slot { day: Weekday, slot: TimeSlot },
    /// Blank row between two days
    Separator,
}

/// Body rows in display order: days outer, slots inner, a separator
/// between consecutive days
pub fn layout_rows(calendar: &MatrixCalendar) -> Vec<MatrixRow> {
    let mut rows = Vec::new();
    for (idx, day) in calendar.days.iter().enumerate() {
        if idx > 0 {
            rows.push(MatrixRow::Separator);
        }
        rows.extend(
            calendar
                .grid
                .slots()
                .map(|slot| MatrixRow::Slot { day: *day, slot }),
        );
    }
    rows
}

/// Plain text matrix renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of each student column
    pub column_width: usize,
    /// Whether free slots are printed
    pub show_free_rows: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            column_width: 14,
            show_free_rows: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set student column width (minimum 3)
    pub fn column_width(mut self, width: usize) -> Self {
        self.column_width = width.max(3);
        self
    }

    /// Only print rows where someone has a class
    pub fn busy_only(mut self) -> Self {
        self.show_free_rows = false;
        self
    }

    fn fit(&self, text: &str) -> String {
        let width = self.column_width;
        if text.chars().count() <= width {
            format!("{text:<width$}")
        } else {
            let cut: String = text.chars().take(width - 1).collect();
            format!("{cut}~")
        }
    }

    /// Course names in a cell, joined with `/`
    fn cell(
        &self,
        calendar: &MatrixCalendar,
        day: Weekday,
        slot: TimeSlot,
        student: &str,
    ) -> String {
        let courses = calendar
            .occupancy
            .get(day, slot, student)
            .map(|labels| {
                labels
                    .iter()
                    .map(|l| l.lines().next().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_else(|| ".".to_string());
        self.fit(&courses)
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, calendar: &MatrixCalendar) -> Result<String, RenderError> {
        if calendar.students.is_empty() {
            return Err(RenderError::InvalidData("No students to render".into()));
        }

        let mut out = String::new();
        out.push_str(&format!("{:<10} {:<5}", "Day", "Time"));
        for student in &calendar.students {
            out.push(' ');
            out.push_str(&self.fit(student));
        }
        out.push('\n');

        for row in layout_rows(calendar) {
            match row {
                MatrixRow::Separator => {
                    if self.show_free_rows {
                        out.push('\n');
                    }
                }
                MatrixRow::Slot { day, slot } => {
                    let busy = calendar
                        .students
                        .iter()
                        .any(|s| calendar.occupancy.is_occupied(day, slot, s));
                    if !busy && !self.show_free_rows {
                        continue;
                    }
                    out.push_str(&format!("{:<10} {:<5}", day.name(), format_minutes(slot)));
                    for student in &calendar.students {
                        out.push(' ');
                        out.push_str(&self.cell(calendar, day, slot, student));
                    }
                    out.push('\n');
                }
            }
        }

        Ok(out
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
