//! Core data model types for rollcall.
//!
//! A [`Student`] carries its own attendance marks, one per date. The roster
//! that owns students lives in [`crate::roster`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Student identifier. Any integer is accepted.
pub type StudentId = i64;

/// Attendance status for one student on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Interpret a single-key mark as typed at the register prompt.
    ///
    /// Anything starting with `p` or `P` is present; every other answer,
    /// including an empty one, counts as absent.
    pub fn from_mark(input: &str) -> Self {
        match input.trim_start().chars().next() {
            Some('p' | 'P') => AttendanceStatus::Present,
            _ => AttendanceStatus::Absent,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

/// One student and their per-date attendance marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier. Never changes once the student exists.
    pub(crate) id: StudentId,
    /// Display name.
    pub name: String,
    /// Marks keyed by date string (`YYYY-MM-DD` by convention).
    #[serde(default)]
    pub attendance: BTreeMap<String, AttendanceStatus>,
}

impl Student {
    /// Create a student with no attendance marks.
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attendance: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    /// Record `status` for `date`, replacing any earlier mark for that date.
    ///
    /// The date is stored as given.
    pub fn mark_attendance(&mut self, date: impl Into<String>, status: AttendanceStatus) {
        self.attendance.insert(date.into(), status);
    }

    /// Number of dates marked present.
    pub fn present_days(&self) -> usize {
        self.attendance
            .values()
            .filter(|s| **s == AttendanceStatus::Present)
            .count()
    }

    /// Number of dates with any mark.
    pub fn marked_days(&self) -> usize {
        self.attendance.len()
    }

    /// Percentage of marked days on which the student was present.
    ///
    /// Returns `None` when no day has been marked yet.
    pub fn attendance_percentage(&self) -> Option<f64> {
        let total = self.marked_days();
        if total == 0 {
            return None;
        }
        Some(100.0 * self.present_days() as f64 / total as f64)
    }
}
