//! Slot occupancy.
//!
//! A record occupies every slot from the floor of its start up to, but not
//! including, the ceiling of its end. Partially covered slots therefore
//! count as occupied: on a 15 minute grid, 08:05-08:50 fills 08:00, 08:15,
//! 08:30 and 08:45.

use classgrid_core::{OccupancyMap, ScheduleRecord, TimeSlot};

use crate::{ceil_minutes, floor_minutes};

/// Slots covered by one record
pub fn occupied_slots(record: &ScheduleRecord, step: u32) -> impl Iterator<Item = TimeSlot> {
    let first = floor_minutes(record.start.minutes(), step);
    let last = ceil_minutes(record.end.minutes(), step);
    (first..last).step_by(step.max(1) as usize)
}

/// Expand records, in the given order, into an occupancy map.
///
/// Overlapping records of one student stack their labels in the same cell.
pub fn build_occupancy(records: &[&ScheduleRecord], step: u32) -> OccupancyMap {
    let mut map = OccupancyMap::new();
    for record in records {
        let label = record.label();
        for slot in occupied_slots(record, step) {
            map.push(record.day, slot, &record.student, label.clone());
        }
    }
    map
}
