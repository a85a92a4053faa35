//! Calendar construction properties
//!
//! These hold for any input:
//! 1. Every record's floored start slot is occupied, its ceiled end slot is not
//!    (unless another record covers it)
//! 2. Every occupied slot lies inside the grid
//! 3. Building twice from the same records gives the same calendar

use classgrid_core::{ScheduleRecord, TimeOfDay, Weekday};
use classgrid_grid::{build_calendar, ceil_minutes, floor_minutes, GridOptions};
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

fn students(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn sample() -> Vec<ScheduleRecord> {
    vec![
        rec("alice", "Math", Weekday::Monday, (9, 0), (10, 0)),
        rec("alice", "Lab", Weekday::Monday, (9, 40), (11, 5)),
        rec("bob", "History", Weekday::Wednesday, (13, 10), (14, 0)),
        rec("carol", "Art", Weekday::Friday, (8, 5), (8, 50)),
        rec("bob", "Sport", Weekday::Saturday, (17, 30), (19, 0)),
    ]
}

#[test]
fn two_students_same_class() {
    let records = vec![
        rec("alice", "Math", Weekday::Monday, (9, 0), (10, 0)),
        rec("bob", "Math", Weekday::Monday, (9, 0), (10, 0)),
    ];
    let calendar =
        build_calendar(&records, &students(&["alice", "bob"]), &GridOptions::default()).unwrap();

    for student in ["alice", "bob"] {
        assert_eq!(
            calendar.occupancy.get(Weekday::Monday, 9 * 60, student),
            Some(&["Math\n09:00-10:00".to_string()][..])
        );
        for slot in calendar.grid.slots() {
            let occupied = calendar.occupancy.is_occupied(Weekday::Monday, slot, student);
            assert_eq!(occupied, (9 * 60..10 * 60).contains(&slot), "slot {slot}");
        }
    }
    assert_eq!(calendar.days, vec![Weekday::Monday]);
    assert_eq!(calendar.grid.slots().count(), 5);
}

#[test]
fn start_and_end_slots() {
    let records = sample();
    let calendar = build_calendar(
        &records,
        &students(&["alice", "bob", "carol"]),
        &GridOptions::default(),
    )
    .unwrap();
    let step = calendar.grid.step;

    for r in &records {
        let first = floor_minutes(r.start.minutes(), step);
        assert!(calendar.occupancy.is_occupied(r.day, first, &r.student));

        let after = ceil_minutes(r.end.minutes(), step);
        let covered_by_other = records.iter().any(|o| {
            o != r
                && o.student == r.student
                && o.day == r.day
                && floor_minutes(o.start.minutes(), step) <= after
                && after < ceil_minutes(o.end.minutes(), step)
        });
        if !covered_by_other {
            assert!(!calendar.occupancy.is_occupied(r.day, after, &r.student));
        }
    }
}

#[test]
fn occupancy_stays_inside_grid() {
    let calendar = build_calendar(
        &sample(),
        &students(&["alice", "bob", "carol"]),
        &GridOptions::new().step(30),
    )
    .unwrap();
    assert_eq!(calendar.grid.start, 8 * 60);
    assert_eq!(calendar.grid.end, 19 * 60 + 30);

    for ((day, slot, _), labels) in calendar.occupancy.iter() {
        assert!(calendar.days.contains(day));
        assert!(*slot >= calendar.grid.start && *slot < calendar.grid.end);
        assert_eq!((*slot - calendar.grid.start) % 30, 0);
        assert!(!labels.is_empty());
    }
}

#[test]
fn build_is_deterministic_regardless_of_input_order() {
    let records = sample();
    let mut reversed = records.clone();
    reversed.reverse();
    let names = students(&["carol", "alice", "bob"]);

    let a = build_calendar(&records, &names, &GridOptions::default()).unwrap();
    let b = build_calendar(&reversed, &names, &GridOptions::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn custom_step_granularity() {
    let records = vec![rec("carol", "Art", Weekday::Friday, (8, 5), (8, 50))];
    let calendar =
        build_calendar(&records, &students(&["carol"]), &GridOptions::new().step(10)).unwrap();

    let occupied: Vec<u32> = calendar
        .grid
        .slots()
        .filter(|s| calendar.occupancy.is_occupied(Weekday::Friday, *s, "carol"))
        .collect();
    assert_eq!(occupied, vec![480, 490, 500, 510, 520]);
    assert_eq!(calendar.grid.end, 540);
}
