//! # classgrid-core
//!
//! Core domain model and traits for the classgrid timetable merger.
//!
//! This crate provides:
//! - Domain types: `TimeOfDay`, `Weekday`, `ScheduleRecord`, `TimeGrid`,
//!   `OccupancyMap`, `MatrixCalendar`
//! - The raw ingestion contract: `CellValue`, `RawTable`
//! - The `Renderer` trait
//! - Error types shared across crates
//!
//! ## Example
//!
//! ```rust
//! use classgrid_core::{ScheduleRecord, TimeOfDay, Weekday};
//!
//! let record = ScheduleRecord::new(
//!     "alice",
//!     "Math",
//!     Weekday::Monday,
//!     TimeOfDay::new(9, 0).unwrap(),
//!     TimeOfDay::new(10, 0).unwrap(),
//! );
//! assert_eq!(record.label(), "Math\n09:00-10:00");
//! ```

pub mod cell;

pub use cell::{CellValue, RawTable};

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Minutes in one day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Unique identifier for a student (the source file stem)
pub type StudentId = String;

/// Minutes since midnight, quantized to the grid step
pub type TimeSlot = u32;

// ============================================================================
// TimeOfDay
// ============================================================================

/// Wall-clock time with minute precision.
///
/// Seconds never survive parsing, so two values that differ only in seconds
/// compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Returns `None` when hour > 23 or minute > 59
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Build from minutes since midnight (must be < 1440)
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::new(minutes / 60, minutes % 60)
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    /// Always zero; kept so callers can assert the normalization.
    pub fn second(&self) -> u32 {
        0
    }

    pub fn minutes(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Format minutes since midnight as `HH:MM`.
///
/// Grid bounds can run past midnight (`24:15`), so this does not wrap.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week; declaration order is the canonical order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in canonical order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One class of one student, as loaded from a timetable row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    pub student: StudentId,
    pub course: String,
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleRecord {
    pub fn new(
        student: impl Into<StudentId>,
        course: impl Into<String>,
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Self {
        Self {
            student: student.into(),
            course: course.into(),
            day,
            start,
            end,
        }
    }

    /// Cell label: course on the first line, `HH:MM-HH:MM` on the second
    pub fn label(&self) -> String {
        format!("{}\n{}-{}", self.course, self.start, self.end)
    }
}

// ============================================================================
// Grid model
// ============================================================================

/// Uniform time grid in minutes since midnight.
///
/// `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeGrid {
    pub start: TimeSlot,
    pub end: TimeSlot,
    pub step: u32,
}

impl TimeGrid {
    /// Slots `start, start + step, ...` strictly below `end`
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> {
        let step = self.step.max(1) as usize;
        (self.start..self.end).step_by(step)
    }

    pub fn len(&self) -> usize {
        self.slots().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Course labels per (day, slot, student)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    cells: BTreeMap<(Weekday, TimeSlot, StudentId), Vec<String>>,
}

impl OccupancyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label; earlier labels in the same cell are kept
    pub fn push(&mut self, day: Weekday, slot: TimeSlot, student: &str, label: impl Into<String>) {
        self.cells
            .entry((day, slot, student.to_string()))
            .or_default()
            .push(label.into());
    }

    pub fn get(&self, day: Weekday, slot: TimeSlot, student: &str) -> Option<&[String]> {
        self.cells
            .get(&(day, slot, student.to_string()))
            .map(Vec::as_slice)
    }

    pub fn is_occupied(&self, day: Weekday, slot: TimeSlot, student: &str) -> bool {
        self.get(day, slot, student).is_some()
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Weekday, TimeSlot, StudentId), &Vec<String>)> {
        self.cells.iter()
    }
}

/// 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `RRGGBB`, uppercase
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `0xRRGGBB`, the form spreadsheet writers take
    pub fn as_u32(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Student to color, ordered by student id
pub type ColorAssignment = BTreeMap<StudentId, Rgb>;

/// Everything a renderer needs to draw the combined calendar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixCalendar {
    /// Days that get a block of rows, in display order
    pub days: Vec<Weekday>,
    pub grid: TimeGrid,
    /// Column order: sorted, unique
    pub students: Vec<StudentId>,
    pub occupancy: OccupancyMap,
    pub colors: ColorAssignment,
}

impl MatrixCalendar {
    /// Color of a student, if one was assigned
    pub fn color_of(&self, student: &str) -> Option<Rgb> {
        self.colors.get(student).copied()
    }

    /// Cell text: labels joined by newlines, `None` if the slot is free
    pub fn cell_text(&self, day: Weekday, slot: TimeSlot, student: &str) -> Option<String> {
        self.occupancy
            .get(day, slot, student)
            .map(|labels| labels.join("\n"))
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a calendar to the output format
    fn render(&self, calendar: &MatrixCalendar) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Failure to interpret a single cell
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unrecognized day: {0:?}")]
    UnrecognizedDay(String),

    #[error("Unrecognized time format: {0:?}")]
    UnrecognizedTime(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
