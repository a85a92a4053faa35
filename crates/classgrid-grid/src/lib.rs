//! # classgrid-grid
//!
//! Turns loaded timetable records into a [`MatrixCalendar`].
//!
//! This crate provides:
//! - Grid bounds: floor of the earliest start to one step past the ceiling
//!   of the latest end
//! - Slot occupancy per (day, slot, student), with overlapping classes
//!   accumulating labels in the same cell
//! - Deterministic pastel colors per student (`color`)
//!
//! ## Example
//!
//! ```rust
//! use classgrid_core::{ScheduleRecord, TimeOfDay, Weekday};
//! use classgrid_grid::{build_calendar, GridOptions};
//!
//! let records = vec![ScheduleRecord::new(
//!     "alice",
//!     "Math",
//!     Weekday::Monday,
//!     TimeOfDay::new(9, 0).unwrap(),
//!     TimeOfDay::new(10, 0).unwrap(),
//! )];
//! let students = vec!["alice".to_string()];
//! let calendar = build_calendar(&records, &students, &GridOptions::default()).unwrap();
//! assert_eq!(calendar.days, vec![Weekday::Monday]);
//! assert_eq!(calendar.grid.start, 9 * 60);
//! assert_eq!(calendar.grid.end, 10 * 60 + 15);
//! ```

pub mod color;
pub mod occupancy;

pub use color::{assign_colors, color_for, pastelize};
pub use occupancy::{build_occupancy, occupied_slots};

use classgrid_core::{
    MatrixCalendar, ScheduleRecord, StudentId, TimeGrid, Weekday, MINUTES_PER_DAY,
};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Default slot width in minutes
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Grid construction error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Invalid time step: {0} minutes (must be between 1 and 1440)")]
    InvalidStep(u32),

    #[error("No records to place on the grid")]
    NoRecords,

    #[error("Day order is empty")]
    EmptyDayOrder,
}

/// Grid settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridOptions {
    /// Slot width in minutes
    pub step_minutes: u32,
    /// Display order of days; days left out are not rendered
    pub day_order: Vec<Weekday>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            day_order: Weekday::ALL.to_vec(),
        }
    }
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slot width
    pub fn step(mut self, minutes: u32) -> Self {
        self.step_minutes = minutes;
        self
    }

    /// Set day display order
    pub fn days(mut self, days: Vec<Weekday>) -> Self {
        self.day_order = days;
        self
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.step_minutes == 0 || self.step_minutes > MINUTES_PER_DAY {
            return Err(GridError::InvalidStep(self.step_minutes));
        }
        if self.day_order.is_empty() {
            return Err(GridError::EmptyDayOrder);
        }
        Ok(())
    }

    /// Position of a day in the display order
    pub fn day_index(&self, day: Weekday) -> Option<usize> {
        self.day_order.iter().position(|d| *d == day)
    }
}

pub fn floor_minutes(minutes: u32, step: u32) -> u32 {
    (minutes / step) * step
}

pub fn ceil_minutes(minutes: u32, step: u32) -> u32 {
    minutes.div_ceil(step) * step
}

/// Grid covering every record, plus one trailing slot
pub fn grid_bounds(records: &[ScheduleRecord], step: u32) -> Result<TimeGrid, GridError> {
    let min_start = records
        .iter()
        .map(|r| r.start.minutes())
        .min()
        .ok_or(GridError::NoRecords)?;
    let max_end = records
        .iter()
        .map(|r| r.end.minutes())
        .max()
        .ok_or(GridError::NoRecords)?;

    Ok(TimeGrid {
        start: floor_minutes(min_start, step),
        end: ceil_minutes(max_end, step) + step,
        step,
    })
}

/// Days with at least one record, in display order.
///
/// Falls back to the first five configured days when nothing matches.
pub fn days_present(records: &[ScheduleRecord], day_order: &[Weekday]) -> Vec<Weekday> {
    let seen: BTreeSet<Weekday> = records.iter().map(|r| r.day).collect();
    let days: Vec<Weekday> = day_order
        .iter()
        .copied()
        .filter(|d| seen.contains(d))
        .collect();
    if days.is_empty() {
        day_order.iter().copied().take(5).collect()
    } else {
        days
    }
}

/// Records in processing order: display day, start, student, course.
///
/// Records on days outside the display order are dropped.
pub fn processing_order<'a>(
    records: &'a [ScheduleRecord],
    options: &GridOptions,
) -> Vec<&'a ScheduleRecord> {
    let mut ordered: Vec<(usize, &ScheduleRecord)> = records
        .iter()
        .filter_map(|r| options.day_index(r.day).map(|idx| (idx, r)))
        .collect();
    ordered.sort_by(|(ia, a), (ib, b)| {
        (ia, a.start, &a.student, &a.course).cmp(&(ib, b.start, &b.student, &b.course))
    });
    ordered.into_iter().map(|(_, r)| r).collect()
}

/// Build the full render model.
///
/// `students` lists every column to render; it is sorted and deduplicated
/// here, and students that only appear in `records` are added.
pub fn build_calendar(
    records: &[ScheduleRecord],
    students: &[StudentId],
    options: &GridOptions,
) -> Result<MatrixCalendar, GridError> {
    options.validate()?;
    let step = options.step_minutes;

    let grid = grid_bounds(records, step)?;
    let days = days_present(records, &options.day_order);
    let ordered = processing_order(records, options);
    let occupancy = build_occupancy(&ordered, step);

    let students: Vec<StudentId> = students
        .iter()
        .cloned()
        .chain(records.iter().map(|r| r.student.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let colors = assign_colors(&students);

    debug!(
        grid_start = grid.start,
        grid_end = grid.end,
        step,
        days = days.len(),
        students = students.len(),
        occupied = occupancy.len(),
        "calendar built"
    );

    Ok(MatrixCalendar {
        days,
        grid,
        students,
        occupancy,
        colors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgrid_core::TimeOfDay;
    use pretty_assertions::assert_eq;

    fn rec(
        student: &str,
        course: &str,
        day: Weekday,
        start: (u32, u32),
        end: (u32, u32),
    ) -> ScheduleRecord {
        ScheduleRecord::new(
            student,
            course,
            day,
            TimeOfDay::new(start.0, start.1).unwrap(),
            TimeOfDay::new(end.0, end.1).unwrap(),
        )
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(floor_minutes(485, 15), 480);
        assert_eq!(floor_minutes(480, 15), 480);
        assert_eq!(ceil_minutes(530, 15), 540);
        assert_eq!(ceil_minutes(540, 15), 540);
        assert_eq!(ceil_minutes(0, 15), 0);
    }

    #[test]
    fn bounds_floor_start_and_pad_end() {
        let records = vec![
            rec("a", "X", Weekday::Monday, (8, 5), (8, 50)),
            rec("b", "Y", Weekday::Tuesday, (10, 0), (11, 10)),
        ];
        let grid = grid_bounds(&records, 15).unwrap();
        assert_eq!(grid.start, 8 * 60);
        assert_eq!(grid.end, 11 * 60 + 15 + 15);
        assert_eq!(grid.step, 15);
    }

    #[test]
    fn bounds_late_class_runs_past_midnight() {
        let records = vec![rec("a", "Night", Weekday::Friday, (23, 0), (23, 59))];
        let grid = grid_bounds(&records, 15).unwrap();
        assert_eq!(grid.end, MINUTES_PER_DAY + 15);
    }

    #[test]
    fn bounds_require_records() {
        assert_eq!(grid_bounds(&[], 15), Err(GridError::NoRecords));
    }

    #[test]
    fn days_follow_display_order() {
        let records = vec![
            rec("a", "X", Weekday::Friday, (9, 0), (10, 0)),
            rec("a", "X", Weekday::Monday, (9, 0), (10, 0)),
        ];
        assert_eq!(
            days_present(&records, &Weekday::ALL),
            vec![Weekday::Monday, Weekday::Friday]
        );

        let custom = [Weekday::Sunday, Weekday::Friday, Weekday::Monday];
        assert_eq!(
            days_present(&records, &custom),
            vec![Weekday::Friday, Weekday::Monday]
        );
    }

    #[test]
    fn days_default_to_first_five() {
        assert_eq!(
            days_present(&[], &Weekday::ALL),
            Weekday::ALL[..5].to_vec()
        );
    }

    #[test]
    fn invalid_options() {
        let records = vec![rec("a", "X", Weekday::Monday, (9, 0), (10, 0))];
        let students = vec!["a".to_string()];
        assert_eq!(
            build_calendar(&records, &students, &GridOptions::new().step(0)),
            Err(GridError::InvalidStep(0))
        );
        assert_eq!(
            build_calendar(&records, &students, &GridOptions::new().step(2000)),
            Err(GridError::InvalidStep(2000))
        );
        assert_eq!(
            build_calendar(&records, &students, &GridOptions::new().days(vec![])),
            Err(GridError::EmptyDayOrder)
        );
    }

    #[test]
    fn days_outside_display_order_are_not_placed() {
        let records = vec![
            rec("a", "Weekday", Weekday::Monday, (9, 0), (10, 0)),
            rec("a", "Weekend", Weekday::Saturday, (9, 0), (10, 0)),
        ];
        let options = GridOptions::new().days(Weekday::ALL[..5].to_vec());
        let calendar = build_calendar(&records, &["a".to_string()], &options).unwrap();
        assert_eq!(calendar.days, vec![Weekday::Monday]);
        assert!(calendar.occupancy.get(Weekday::Saturday, 540, "a").is_none());
    }

    #[test]
    fn students_without_records_keep_a_column() {
        let records = vec![rec("bob", "X", Weekday::Monday, (9, 0), (10, 0))];
        let students = vec!["erin".to_string(), "bob".to_string(), "bob".to_string()];
        let calendar = build_calendar(&records, &students, &GridOptions::default()).unwrap();
        assert_eq!(calendar.students, vec!["bob", "erin"]);
        assert_eq!(calendar.colors.len(), 2);
    }

    #[test]
    fn processing_order_sorts_by_day_then_start() {
        let records = vec![
            rec("b", "Late", Weekday::Monday, (11, 0), (12, 0)),
            rec("a", "Tue", Weekday::Tuesday, (8, 0), (9, 0)),
            rec("b", "Early", Weekday::Monday, (8, 0), (9, 0)),
            rec("a", "Early", Weekday::Monday, (8, 0), (9, 0)),
        ];
        let options = GridOptions::default();
        let courses: Vec<(&str, &str)> = processing_order(&records, &options)
            .iter()
            .map(|r| (r.student.as_str(), r.course.as_str()))
            .collect();
        assert_eq!(
            courses,
            vec![("a", "Early"), ("b", "Early"), ("b", "Late"), ("a", "Tue")]
        );
    }
}
