//! Column standardization.
//!
//! Maps an arbitrary sheet onto the four timetable roles (course, day,
//! start, end). Header names are matched when every role can be found in a
//! distinct column; otherwise the first four non-empty columns are taken in
//! order.

use classgrid_core::{CellValue, RawTable};
use serde::Serialize;
use thiserror::Error;

/// Number of semantic columns a timetable needs
pub const REQUIRED_COLUMNS: usize = 4;

/// Structural problem with a whole sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error(
        "Sheet has only {found} non-empty columns after cleaning; need at least 4: course, day, start, end"
    )]
    InsufficientColumns { found: usize },
}

/// A semantic column role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Course,
    Day,
    Start,
    End,
}

impl Role {
    /// Output column order
    pub const ALL: [Role; 4] = [Role::Course, Role::Day, Role::Start, Role::End];

    /// Header labels accepted for this role, most specific first
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Role::Course => &["course", "course name", "subject"],
            Role::Day => &["day", "day of the week", "weekday"],
            Role::Start => &["start", "start time", "time from", "from", "time start"],
            Role::End => &["end", "end time", "time to", "to", "time end"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Course => "course",
            Role::Day => "day",
            Role::Start => "start",
            Role::End => "end",
        }
    }
}

/// How the role columns were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnLayout {
    /// Matched by header label; the header row is not data
    Header,
    /// First four columns in order; every row is data
    Positional,
}

/// One data row reduced to the four roles
#[derive(Debug, Clone, PartialEq)]
pub struct StandardRow {
    /// 1-based row number in the cleaned sheet, for diagnostics
    pub row: usize,
    pub course: CellValue,
    pub day: CellValue,
    pub start: CellValue,
    pub end: CellValue,
}

/// A sheet in canonical course/day/start/end form
#[derive(Debug, Clone, PartialEq)]
pub struct StandardTable {
    pub layout: ColumnLayout,
    /// Source column index (after cleaning) for each role, in `Role::ALL` order
    pub columns: [usize; 4],
    pub rows: Vec<StandardRow>,
}

impl StandardTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drop fully empty rows and columns.
///
/// When more than one row survives, the first one is the label row and a
/// value there alone does not keep a column. The result is rectangular:
/// short rows are padded with empty cells.
pub fn clean(table: &RawTable) -> RawTable {
    let kept_rows: Vec<usize> = (0..table.height())
        .filter(|&row| table.rows[row].iter().any(|cell| !cell.is_empty()))
        .collect();
    let body = match kept_rows.as_slice() {
        [_, rest @ ..] if !rest.is_empty() => rest,
        all => all,
    };

    let keep_cols: Vec<usize> = (0..table.width())
        .filter(|&col| body.iter().any(|&row| !table.get(row, col).is_empty()))
        .collect();

    let rows = kept_rows
        .iter()
        .map(|&row| {
            keep_cols
                .iter()
                .map(|&col| table.get(row, col).clone())
                .collect()
        })
        .collect();

    RawTable::new(rows)
}

/// Trimmed string labels of the first row
pub fn column_labels(table: &RawTable) -> Vec<String> {
    table
        .rows
        .first()
        .map(|row| row.iter().map(|c| c.to_label().trim().to_string()).collect())
        .unwrap_or_default()
}

/// Find a distinct column for every role by header label.
///
/// Repeated labels resolve to the rightmost column. Returns `None` unless
/// all four roles match.
pub fn match_headers(labels: &[String]) -> Option<[usize; 4]> {
    let lowered: Vec<String> = labels.iter().map(|l| l.trim().to_lowercase()).collect();
    let mut picked = [usize::MAX; 4];

    for (slot, role) in Role::ALL.iter().enumerate() {
        let found = role.candidates().iter().find_map(|candidate| {
            lowered
                .iter()
                .enumerate()
                .rev()
                .find(|(idx, label)| label.as_str() == *candidate && !picked.contains(idx))
                .map(|(idx, _)| idx)
        })?;
        picked[slot] = found;
    }

    Some(picked)
}

/// Reduce a raw sheet to the canonical four columns.
pub fn standardize(raw: &RawTable) -> Result<StandardTable, TableError> {
    let table = clean(raw);
    let width = table.width();
    if width < REQUIRED_COLUMNS {
        return Err(TableError::InsufficientColumns { found: width });
    }

    let labels = column_labels(&table);
    let (layout, columns, first_data_row) = match match_headers(&labels) {
        Some(columns) => (ColumnLayout::Header, columns, 1),
        None => (ColumnLayout::Positional, [0, 1, 2, 3], 0),
    };

    let rows = (first_data_row..table.height())
        .map(|row| StandardRow {
            row: row + 1,
            course: table.get(row, columns[0]).clone(),
            day: table.get(row, columns[1]).clone(),
            start: table.get(row, columns[2]).clone(),
            end: table.get(row, columns[3]).clone(),
        })
        .collect();

    Ok(StandardTable {
        layout,
        columns,
        rows,
    })
}
