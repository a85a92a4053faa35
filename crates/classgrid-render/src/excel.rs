//! Excel matrix calendar renderer
//!
//! Generates an XLSX workbook with two sheets:
//! - Matrix: one row per (day, slot), one column per student, occupied
//!   cells filled with the student's color
//! - Legend: every student with their color swatch
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Matrix
//! | Day    | Time  | alice              | bob                |
//! |--------|-------|--------------------|--------------------|
//! | Monday | 09:00 | Math\n09:00-10:00  |                    |
//! | Monday | 09:15 | Math\n09:00-10:00  | Art\n09:15-09:45   |
//! | ...    |       |                    |                    |
//! |        |       |                    |                    |   <- separator
//! | Friday | 08:00 |                    | ...                |
//!
//! Sheet: Legend
//! | Student | Color  |
//! |---------|--------|
//! | alice   | F1C9A0 |
//! ```

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashMap;
use classgrid_core::{format_minutes, MatrixCalendar, RenderError, Renderer};

use crate::{layout_rows, MatrixRow};

/// Excel matrix calendar renderer
#[derive(Clone, Debug)]
pub struct MatrixRenderer {
    /// Name of the matrix sheet
    pub matrix_sheet: String,
    /// Name of the legend sheet
    pub legend_sheet: String,
    /// Height of matrix data rows in points
    pub row_height: f64,
    /// Width of student columns
    pub student_width: f64,
}

impl Default for MatrixRenderer {
    fn default() -> Self {
        Self {
            matrix_sheet: "Matrix".into(),
            legend_sheet: "Legend".into(),
            row_height: 42.0,
            student_width: 28.0,
        }
    }
}

impl MatrixRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set matrix sheet name
    pub fn matrix_sheet(mut self, name: impl Into<String>) -> Self {
        self.matrix_sheet = name.into();
        self
    }

    /// Set legend sheet name
    pub fn legend_sheet(mut self, name: impl Into<String>) -> Self {
        self.legend_sheet = name.into();
        self
    }

    /// Set data row height
    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, calendar: &MatrixCalendar) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats(calendar);

        self.add_matrix_sheet(&mut workbook, calendar, &formats)?;
        self.add_legend_sheet(&mut workbook, calendar, &formats)?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Create reusable formats
    fn create_formats(&self, calendar: &MatrixCalendar) -> ExcelFormats {
        let border = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(0x999999);

        let header = border
            .clone()
            .set_bold()
            .set_background_color(0xF2F2F2)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let center = border
            .clone()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let empty_cell = border
            .clone()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top)
            .set_text_wrap();

        let left = empty_cell.clone();

        // One fill per student: occupied matrix cells are bold, legend swatches centered
        let mut occupied = HashMap::new();
        let mut swatch = HashMap::new();
        for (student, color) in &calendar.colors {
            occupied.insert(
                student.clone(),
                empty_cell
                    .clone()
                    .set_bold()
                    .set_background_color(color.as_u32()),
            );
            swatch.insert(
                student.clone(),
                center.clone().set_background_color(color.as_u32()),
            );
        }

        ExcelFormats {
            header,
            center,
            left,
            empty_cell,
            occupied,
            swatch,
        }
    }

    /// Add the Day/Time/students matrix sheet
    fn add_matrix_sheet(
        &self,
        workbook: &mut Workbook,
        calendar: &MatrixCalendar,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.matrix_sheet)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        // Headers
        let headers = ["Day", "Time"]
            .into_iter()
            .map(String::from)
            .chain(calendar.students.iter().cloned());
        for (col, header) in headers.enumerate() {
            let col = column(col)?;
            sheet
                .write_with_format(0, col, header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        // Column widths
        sheet.set_column_width(0, 14).ok(); // Day
        sheet.set_column_width(1, 10).ok(); // Time
        for idx in 0..calendar.students.len() {
            sheet
                .set_column_width(column(idx + 2)?, self.student_width)
                .ok();
        }

        let mut row = 1u32;
        for entry in layout_rows(calendar) {
            match entry {
                MatrixRow::Separator => {}
                MatrixRow::Slot { day, slot } => {
                    sheet
                        .write_with_format(row, 0, day.name(), &formats.center)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                    sheet
                        .write_with_format(row, 1, format_minutes(slot), &formats.center)
                        .map_err(|e| RenderError::Format(e.to_string()))?;

                    for (idx, student) in calendar.students.iter().enumerate() {
                        let col = column(idx + 2)?;
                        match calendar.cell_text(day, slot, student) {
                            Some(text) => {
                                let format =
                                    formats.occupied.get(student).unwrap_or(&formats.left);
                                sheet
                                    .write_with_format(row, col, text, format)
                                    .map_err(|e| RenderError::Format(e.to_string()))?;
                            }
                            None => {
                                sheet
                                    .write_blank(row, col, &formats.empty_cell)
                                    .map_err(|e| RenderError::Format(e.to_string()))?;
                            }
                        }
                    }
                    sheet.set_row_height(row, self.row_height).ok();
                }
            }
            row += 1;
        }

        // Freeze header row and the Day/Time columns
        sheet.set_freeze_panes(1, 2).ok();

        Ok(())
    }

    /// Add the Student/Color legend sheet
    fn add_legend_sheet(
        &self,
        workbook: &mut Workbook,
        calendar: &MatrixCalendar,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.legend_sheet)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (col, header) in ["Student", "Color"].iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        sheet.set_column_width(0, 45).ok();
        sheet.set_column_width(1, 18).ok();

        for (i, student) in calendar.students.iter().enumerate() {
            let row = (i + 1) as u32;
            write_legend_row(sheet, row, student, calendar, formats)?;
        }

        sheet.set_freeze_panes(1, 0).ok();

        Ok(())
    }
}

fn write_legend_row(
    sheet: &mut Worksheet,
    row: u32,
    student: &str,
    calendar: &MatrixCalendar,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    sheet
        .write_with_format(row, 0, student, &formats.left)
        .map_err(|e| RenderError::Format(e.to_string()))?;

    let hex = calendar
        .color_of(student)
        .map(|c| c.hex())
        .unwrap_or_default();
    let swatch = formats.swatch.get(student).unwrap_or(&formats.center);
    sheet
        .write_with_format(row, 1, hex, swatch)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

/// Checked conversion to an Excel column index
fn column(idx: usize) -> Result<u16, RenderError> {
    u16::try_from(idx)
        .ok()
        .filter(|c| *c < 16_384)
        .ok_or_else(|| RenderError::InvalidData(format!("Too many columns: {}", idx + 1)))
}

/// Reusable Excel formats
struct ExcelFormats {
    header: Format,
    center: Format,
    left: Format,
    // Unoccupied student cells keep the grid border
    empty_cell: Format,
    // Per-student fills
    occupied: HashMap<String, Format>,
    swatch: HashMap<String, Format>,
}

impl Renderer for MatrixRenderer {
    type Output = Vec<u8>;

    fn render(&self, calendar: &MatrixCalendar) -> Result<Vec<u8>, RenderError> {
        if calendar.students.is_empty() {
            return Err(RenderError::InvalidData("No students to render".into()));
        }
        self.render_to_bytes(calendar)
    }
}
