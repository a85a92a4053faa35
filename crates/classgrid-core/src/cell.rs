//! Raw spreadsheet cells.
//!
//! Whatever reader produced a sheet, downstream code only ever sees a
//! [`RawTable`] of [`CellValue`]s.

use chrono::{NaiveDateTime, NaiveTime};

/// A single cell as read from a spreadsheet
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl CellValue {
    /// Empty cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// String form of the cell, untrimmed.
    ///
    /// Integral numbers print without a fractional part so that a course
    /// code typed as `101` stays `101`.
    pub fn to_label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Time(t) => t.format("%H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// Row-major grid of cells from one sheet; rows may differ in length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build from string literals; `""` becomes [`CellValue::Empty`]
    pub fn from_strings(rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| {
                        if s.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::from(*s)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, col); missing cells read as empty
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(CellValue::is_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_text_is_empty() {
        assert!(CellValue::Text("   ".into()).is_empty());
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(CellValue::Number(101.0).to_label(), "101");
        assert_eq!(CellValue::Number(8.3).to_label(), "8.3");
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let table = RawTable::from_strings(&[&["a", "b", "c"], &["d"]]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.get(1, 2), &CellValue::Empty);
        assert_eq!(table.get(5, 0), &CellValue::Empty);
    }
}
