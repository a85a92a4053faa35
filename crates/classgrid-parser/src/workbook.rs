//! Spreadsheet reading via calamine.
//!
//! Converts the first usable sheet of a workbook into a [`RawTable`]. This
//! is the only place that knows about calamine's cell types.

use calamine::{open_workbook_auto, Data, Range, Reader};
use classgrid_core::{CellValue, RawTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::table::{clean, column_labels, REQUIRED_COLUMNS};
use crate::LoadError;

/// Keywords that mark a sheet as a likely timetable
const TIMETABLE_KEYWORDS: &[&str] = &["course", "subject", "day", "start", "end", "time"];

/// Which sheet of a workbook holds the timetable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSelection {
    /// First sheet that reads successfully and is not blank
    #[default]
    First,
    /// Highest scoring sheet: column count, plus a bonus for timetable-like headers
    Best,
}

impl std::str::FromStr for SheetSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(SheetSelection::First),
            "best" => Ok(SheetSelection::Best),
            other => Err(format!("unknown sheet selection '{other}' (expected first or best)")),
        }
    }
}

/// Convert one calamine cell
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            // Time-only cells are serial values below one day
            if dt.as_f64() < 1.0 || dt.is_duration() {
                dt.as_datetime()
                    .map(|d| CellValue::Time(d.time()))
                    .unwrap_or(CellValue::Number(dt.as_f64()))
            } else {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Number(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convert a calamine range, keeping relative cell positions
pub fn range_to_table(range: &Range<Data>) -> RawTable {
    RawTable::new(
        range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect(),
    )
}

/// Score a sheet for [`SheetSelection::Best`]; `None` if it is unusable
pub fn score_sheet(table: &RawTable) -> Option<usize> {
    let cleaned = clean(table);
    let width = cleaned.width();
    if cleaned.is_empty() || width < REQUIRED_COLUMNS {
        return None;
    }

    let header_text = column_labels(&cleaned)
        .iter()
        .take(6)
        .map(|l| l.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let bonus = if TIMETABLE_KEYWORDS.iter().any(|k| header_text.contains(k)) {
        10
    } else {
        0
    };
    Some(width + bonus)
}

/// Pick a sheet from already-read `(name, table)` pairs
pub fn select_sheet(
    sheets: Vec<(String, RawTable)>,
    selection: SheetSelection,
) -> Option<(String, RawTable)> {
    match selection {
        SheetSelection::First => sheets.into_iter().find(|(_, table)| !table.is_empty()),
        SheetSelection::Best => {
            let mut best: Option<(usize, (String, RawTable))> = None;
            for (name, table) in sheets {
                let Some(score) = score_sheet(&table) else {
                    continue;
                };
                if best.as_ref().map_or(true, |(top, _)| score > *top) {
                    best = Some((score, (name, table)));
                }
            }
            best.map(|(_, sheet)| sheet)
        }
    }
}

/// Open a workbook and return the selected sheet as a raw table.
///
/// Sheets that fail to load are skipped; the workbook handle is dropped
/// before returning.
pub fn read_table(path: &Path, selection: SheetSelection) -> Result<(String, RawTable), LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let table = range_to_table(&range);
                if selection == SheetSelection::First && !table.is_empty() {
                    return Ok((name, table));
                }
                sheets.push((name, table));
            }
            Err(e) => debug!(path = %path.display(), sheet = %name, error = %e, "unreadable sheet"),
        }
    }

    select_sheet(sheets, selection).ok_or_else(|| LoadError::NoSheet {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_conversion() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            convert_cell(&Data::String("Math".into())),
            CellValue::Text("Math".into())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn sheet_selection_parses() {
        assert_eq!("first".parse::<SheetSelection>(), Ok(SheetSelection::First));
        assert_eq!(" Best ".parse::<SheetSelection>(), Ok(SheetSelection::Best));
        assert!("largest".parse::<SheetSelection>().is_err());
    }

    #[test]
    fn first_skips_blank_sheets() {
        let sheets = vec![
            ("Cover".to_string(), RawTable::from_strings(&[&["", ""]])),
            (
                "Data".to_string(),
                RawTable::from_strings(&[&["Math", "Mon", "09:00", "10:00"]]),
            ),
        ];
        let (name, _) = select_sheet(sheets, SheetSelection::First).unwrap();
        assert_eq!(name, "Data");
    }

    #[test]
    fn best_prefers_timetable_headers() {
        let notes = RawTable::from_strings(&[&["a", "b", "c", "d", "e", "f"]]);
        let timetable = RawTable::from_strings(&[
            &["Course", "Day", "Start", "End"],
            &["Math", "Mon", "09:00", "10:00"],
        ]);
        assert_eq!(score_sheet(&notes), Some(6));
        assert_eq!(score_sheet(&timetable), Some(14));

        let sheets = vec![
            ("Notes".to_string(), notes),
            ("Timetable".to_string(), timetable),
        ];
        let (name, _) = select_sheet(sheets, SheetSelection::Best).unwrap();
        assert_eq!(name, "Timetable");
    }

    #[test]
    fn best_ignores_narrow_sheets() {
        let narrow = RawTable::from_strings(&[&["Course", "Day"]]);
        assert_eq!(score_sheet(&narrow), None);
        assert!(select_sheet(vec![("x".into(), narrow)], SheetSelection::Best).is_none());
    }
}
