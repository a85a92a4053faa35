//! Record loading.
//!
//! One workbook per student. Rows that cannot be interpreted are dropped and
//! reported; structural problems with a whole file follow [`FilePolicy`].

use classgrid_core::{FieldError, RawTable, ScheduleRecord, StudentId, TimeOfDay};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::discover::{discover_inputs, student_id};
use crate::fields::{normalize_day, parse_time};
use crate::table::{standardize, ColumnLayout, Role, StandardRow, TableError};
use crate::workbook::{read_table, SheetSelection};
use crate::LoadError;

/// What to do when a whole file cannot be used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilePolicy {
    /// Log a warning and continue with the remaining files
    #[default]
    Skip,
    /// Fail the whole run
    Abort,
}

/// Loader settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub sheet: SheetSelection,
    pub file_policy: FilePolicy,
}

/// Why a row was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    EmptyCourse,
    Missing(Role),
    Field(FieldError),
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::EmptyCourse => write!(f, "empty course"),
            RowIssue::Missing(role) => write!(f, "missing {}", role.name()),
            RowIssue::Field(err) => write!(f, "{err}"),
            RowIssue::InvalidInterval { start, end } => {
                write!(f, "start {start} is not before end {end}")
            }
        }
    }
}

impl Serialize for RowIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<FieldError> for RowIssue {
    fn from(err: FieldError) -> Self {
        RowIssue::Field(err)
    }
}

/// A dropped row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub student: StudentId,
    /// 1-based row number in the cleaned sheet
    pub row: usize,
    pub reason: RowIssue,
}

/// A dropped file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of interpreting one student's table
#[derive(Debug, Clone, PartialEq)]
pub struct TableLoad {
    pub layout: ColumnLayout,
    pub records: Vec<ScheduleRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// All students' records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timetable {
    /// Sorted by (day, start, student, course)
    pub records: Vec<ScheduleRecord>,
    /// Every successfully read student, sorted and unique, including
    /// students without any valid rows
    pub students: Vec<StudentId>,
    pub skipped_rows: Vec<SkippedRow>,
    pub skipped_files: Vec<SkippedFile>,
}

impl Timetable {
    pub fn records_for<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a ScheduleRecord> {
        self.records.iter().filter(move |r| r.student == student)
    }
}

/// Canonical record order: day, start, student, course
pub fn sort_records(records: &mut [ScheduleRecord]) {
    records.sort_by(|a, b| {
        (a.day, a.start, &a.student, &a.course).cmp(&(b.day, b.start, &b.student, &b.course))
    });
}

fn parse_row(student: &str, row: &StandardRow) -> Result<ScheduleRecord, RowIssue> {
    let course = row.course.to_label().trim().to_string();
    if course.is_empty() {
        return Err(RowIssue::EmptyCourse);
    }
    if row.day.is_empty() {
        return Err(RowIssue::Missing(Role::Day));
    }
    let day = normalize_day(&row.day.to_label())?;
    let start = parse_time(&row.start)?.ok_or(RowIssue::Missing(Role::Start))?;
    let end = parse_time(&row.end)?.ok_or(RowIssue::Missing(Role::End))?;
    if start >= end {
        return Err(RowIssue::InvalidInterval { start, end });
    }
    Ok(ScheduleRecord::new(student, course, day, start, end))
}

/// Interpret a raw sheet for one student.
///
/// Fails only when the sheet lacks four usable columns; bad rows end up in
/// [`TableLoad::skipped`].
pub fn load_table(student: &str, raw: &RawTable) -> Result<TableLoad, TableError> {
    let table = standardize(raw)?;
    let mut records = Vec::with_capacity(table.len());
    let mut skipped = Vec::new();

    for row in &table.rows {
        match parse_row(student, row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!(student, row = row.row, %reason, "skipping row");
                skipped.push(SkippedRow {
                    student: student.to_string(),
                    row: row.row,
                    reason,
                });
            }
        }
    }

    Ok(TableLoad {
        layout: table.layout,
        records,
        skipped,
    })
}

/// Read and interpret one workbook
pub fn load_file(path: &Path, sheet: SheetSelection) -> Result<TableLoad, LoadError> {
    let student = student_id(path);
    let (sheet_name, raw) = read_table(path, sheet)?;
    let load = load_table(&student, &raw).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        student = %student,
        sheet = %sheet_name,
        layout = ?load.layout,
        records = load.records.len(),
        skipped = load.skipped.len(),
        "loaded timetable"
    );
    Ok(load)
}

/// Load every file in order and merge the results.
///
/// Files are read one at a time; each workbook is closed before the next is
/// opened.
pub fn load_all(paths: &[PathBuf], options: LoadOptions) -> Result<Timetable, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInputFiles {
            location: "the given input list".into(),
        });
    }

    let mut timetable = Timetable::default();
    for path in paths {
        match load_file(path, options.sheet) {
            Ok(load) => {
                timetable.students.push(student_id(path));
                timetable.records.extend(load.records);
                timetable.skipped_rows.extend(load.skipped);
            }
            Err(err) if err.is_per_file() && options.file_policy == FilePolicy::Skip => {
                warn!(path = %path.display(), error = %err, "skipping file");
                timetable.skipped_files.push(SkippedFile {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    if timetable.records.is_empty() {
        return Err(LoadError::NoValidRecords);
    }

    timetable.students.sort();
    timetable.students.dedup();
    sort_records(&mut timetable.records);

    info!(
        files = paths.len(),
        students = timetable.students.len(),
        records = timetable.records.len(),
        skipped_rows = timetable.skipped_rows.len(),
        skipped_files = timetable.skipped_files.len(),
        "timetables loaded"
    );
    Ok(timetable)
}

/// Discover inputs in `dir` matching `pattern` and load them.
///
/// `NoInputFiles` is raised before any workbook is opened.
pub fn load_directory(
    dir: &Path,
    pattern: &str,
    exclude: Option<&Path>,
    options: LoadOptions,
) -> Result<Timetable, LoadError> {
    let paths = discover_inputs(dir, pattern, exclude)?;
    if paths.is_empty() {
        return Err(LoadError::NoInputFiles {
            location: dir.join(pattern).display().to_string(),
        });
    }
    debug!(count = paths.len(), "input files discovered");
    load_all(&paths, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgrid_core::Weekday;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn valid_rows_become_records() {
        let raw = RawTable::from_strings(&[
            &["Course", "Day", "Start", "End"],
            &["  Math ", "mon", "9.00", "10:00"],
            &["Art", "Thurs", "13:15", "14:45:00"],
        ]);
        let load = load_table("alice", &raw).unwrap();
        assert_eq!(load.layout, ColumnLayout::Header);
        assert_eq!(
            load.records,
            vec![
                ScheduleRecord::new("alice", "Math", Weekday::Monday, t(9, 0), t(10, 0)),
                ScheduleRecord::new("alice", "Art", Weekday::Thursday, t(13, 15), t(14, 45)),
            ]
        );
        assert!(load.skipped.is_empty());
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let raw = RawTable::from_strings(&[
            &["Course", "Day", "Start", "End"],
            &["Math", "Funday", "09:00", "10:00"],
            &["", "Mon", "09:00", "10:00"],
            &["Art", "Mon", "noon", "13:00"],
            &["Bio", "Mon", "11:00", ""],
            &["Chem", "Tue", "12:00", "11:00"],
            &["Music", "Fri", "08:00", "08:45"],
        ]);
        let load = load_table("bob", &raw).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].course, "Music");

        let reasons: Vec<(usize, RowIssue)> = load
            .skipped
            .iter()
            .map(|s| (s.row, s.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (2, RowIssue::Field(FieldError::UnrecognizedDay("Funday".into()))),
                (3, RowIssue::EmptyCourse),
                (4, RowIssue::Field(FieldError::UnrecognizedTime("noon".into()))),
                (5, RowIssue::Missing(Role::End)),
                (
                    6,
                    RowIssue::InvalidInterval {
                        start: t(12, 0),
                        end: t(11, 0)
                    }
                ),
            ]
        );
    }

    #[test]
    fn positional_header_row_is_dropped_by_parsing() {
        let raw = RawTable::from_strings(&[
            &["Class", "Day", "Begins", "Ends"],
            &["Math", "Mon", "09:00", "10:00"],
        ]);
        let load = load_table("carol", &raw).unwrap();
        assert_eq!(load.layout, ColumnLayout::Positional);
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.skipped.len(), 1);
        assert_eq!(load.skipped[0].row, 1);
    }

    #[test]
    fn empty_labelled_column_does_not_shift_positional_columns() {
        let raw = RawTable::from_strings(&[
            &["Class", "Room", "Day", "Begins", "Ends"],
            &["Math", "", "Mon", "09:00", "10:00"],
            &["Art", "", "Tue", "11:00", "12:00"],
        ]);
        let load = load_table("alice", &raw).unwrap();
        assert_eq!(load.layout, ColumnLayout::Positional);
        assert_eq!(
            load.records,
            vec![
                ScheduleRecord::new("alice", "Math", Weekday::Monday, t(9, 0), t(10, 0)),
                ScheduleRecord::new("alice", "Art", Weekday::Tuesday, t(11, 0), t(12, 0)),
            ]
        );
        // only the label row is rejected
        assert_eq!(load.skipped.len(), 1);
        assert_eq!(load.skipped[0].row, 1);
    }

    #[test]
    fn narrow_table_is_a_table_error() {
        let raw = RawTable::from_strings(&[&["Math", "Mon", "09:00"]]);
        assert_eq!(
            load_table("dave", &raw),
            Err(TableError::InsufficientColumns { found: 3 })
        );
    }

    #[test]
    fn canonical_sort_order() {
        let mut records = vec![
            ScheduleRecord::new("bob", "Math", Weekday::Tuesday, t(9, 0), t(10, 0)),
            ScheduleRecord::new("bob", "Art", Weekday::Monday, t(9, 0), t(10, 0)),
            ScheduleRecord::new("alice", "Math", Weekday::Monday, t(9, 0), t(10, 0)),
            ScheduleRecord::new("alice", "Bio", Weekday::Monday, t(8, 0), t(9, 0)),
            ScheduleRecord::new("alice", "Art", Weekday::Monday, t(9, 0), t(10, 0)),
        ];
        sort_records(&mut records);
        let order: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.student.as_str(), r.course.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("alice", "Bio"),
                ("alice", "Art"),
                ("alice", "Math"),
                ("bob", "Art"),
                ("bob", "Math"),
            ]
        );
    }

    #[test]
    fn empty_input_list() {
        assert!(matches!(
            load_all(&[], LoadOptions::default()),
            Err(LoadError::NoInputFiles { .. })
        ));
    }

    #[test]
    fn row_issue_messages() {
        assert_eq!(RowIssue::Missing(Role::Start).to_string(), "missing start");
        assert_eq!(
            RowIssue::InvalidInterval {
                start: t(12, 0),
                end: t(11, 0)
            }
            .to_string(),
            "start 12:00 is not before end 11:00"
        );
    }
}
