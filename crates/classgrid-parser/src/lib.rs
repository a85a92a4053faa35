//! # classgrid-parser
//!
//! Ingestion of per-student timetable spreadsheets.
//!
//! This crate provides:
//! - Field parsers for free-form day names and times (`fields`)
//! - Column standardization to course/day/start/end (`table`)
//! - Workbook reading via calamine (`workbook`)
//! - Input discovery by file-name glob (`discover`)
//! - The record loader that ties them together (`loader`)
//!
//! ## Example
//!
//! ```rust
//! use classgrid_core::RawTable;
//! use classgrid_parser::load_table;
//!
//! let raw = RawTable::from_strings(&[
//!     &["Subject", "Weekday", "From", "To"],
//!     &["Math", "Mon", "9.00", "10.00"],
//! ]);
//! let load = load_table("alice", &raw).unwrap();
//! assert_eq!(load.records.len(), 1);
//! ```

pub mod discover;
pub mod fields;
pub mod loader;
pub mod table;
pub mod workbook;

pub use discover::{discover_inputs, student_id, FileGlob};
pub use fields::{normalize_day, parse_time, parse_time_str};
pub use loader::{
    load_all, load_directory, load_file, load_table, sort_records, FilePolicy, LoadOptions,
    RowIssue, SkippedFile, SkippedRow, TableLoad, Timetable,
};
pub use table::{standardize, ColumnLayout, Role, StandardTable, TableError};
pub use workbook::{read_table, SheetSelection};

use std::path::PathBuf;
use thiserror::Error;

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No files matched {location}")]
    NoInputFiles { location: String },

    #[error("No valid timetable rows found across input files")]
    NoValidRecords,

    #[error("{}: {source}", path.display())]
    File { path: PathBuf, source: TableError },

    #[error("Cannot open workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("No readable sheet in {}", path.display())]
    NoSheet { path: PathBuf },

    #[error("Invalid input pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LoadError {
    /// Errors confined to a single input file
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            LoadError::File { .. } | LoadError::Workbook { .. } | LoadError::NoSheet { .. }
        )
    }
}
