//! Deterministic pastel colors per student.
//!
//! The color is a pure function of the identifier: the first three bytes of
//! its MD5 digest, each averaged toward white. Two students can end up
//! with the same color; nothing tries to prevent that.

use classgrid_core::{ColorAssignment, Rgb, StudentId};
use md5::{Digest, Md5};

/// Average a channel toward white
pub fn pastelize(channel: u8) -> u8 {
    ((u16::from(channel) + 255) / 2) as u8
}

/// Color for one student
pub fn color_for(student: &str) -> Rgb {
    let digest = Md5::digest(student.as_bytes());
    Rgb::new(
        pastelize(digest[0]),
        pastelize(digest[1]),
        pastelize(digest[2]),
    )
}

/// Colors for every student
pub fn assign_colors(students: &[StudentId]) -> ColorAssignment {
    students
        .iter()
        .map(|s| (s.clone(), color_for(s)))
        .collect()
}
