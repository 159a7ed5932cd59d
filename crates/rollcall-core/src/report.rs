//! Result types returned by roster queries and mutations.
//!
//! These are plain owned values so that callers can print or serialize them
//! after the store has moved on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AttendanceStatus, Student, StudentId};

/// Whether an add-or-update call created a student or renamed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Added,
    Updated,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Added => write!(f, "added"),
            UpsertOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Who was marked present and absent on one date, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// The date the marks were recorded under.
    pub date: String,
    /// Names of students marked present.
    pub present: Vec<String>,
    /// Names of students marked absent.
    pub absent: Vec<String>,
    /// Names of students the caller supplied no status for. They are left
    /// without a mark for this date.
    #[serde(default)]
    pub unmarked: Vec<String>,
}

impl DailyReport {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, name: &str, status: Option<AttendanceStatus>) {
        let bucket = match status {
            Some(AttendanceStatus::Present) => &mut self.present,
            Some(AttendanceStatus::Absent) => &mut self.absent,
            None => &mut self.unmarked,
        };
        bucket.push(name.to_string());
    }
}

/// A single (date, status) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub date: String,
    pub status: AttendanceStatus,
}

/// One student's full attendance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentHistory {
    pub id: StudentId,
    pub name: String,
    /// Marks in ascending date order.
    pub marks: Vec<AttendanceMark>,
}

impl From<&Student> for StudentHistory {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id(),
            name: student.name.clone(),
            marks: student
                .attendance
                .iter()
                .map(|(date, status)| AttendanceMark {
                    date: date.clone(),
                    status: *status,
                })
                .collect(),
        }
    }
}

/// Attendance totals for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub id: StudentId,
    pub name: String,
    pub present_days: usize,
    pub marked_days: usize,
    /// `None` when the student has no marks yet.
    pub percentage: Option<f64>,
}

impl From<&Student> for SummaryRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id(),
            name: student.name.clone(),
            present_days: student.present_days(),
            marked_days: student.marked_days(),
            percentage: student.attendance_percentage(),
        }
    }
}

/// Attendance summary for the whole roster, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn total_students(&self) -> usize {
        self.rows.len()
    }

    /// Format the summary as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("**Total students:** {}\n\n", self.total_students()));

        if !self.rows.is_empty() {
            md.push_str("| ID | Name | Present | Marked | Attendance |\n");
            md.push_str("|----|------|---------|--------|------------|\n");
            for r in &self.rows {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    r.id,
                    r.name,
                    r.present_days,
                    r.marked_days,
                    format_percentage(r.percentage)
                ));
            }
        }

        md
    }
}

/// Render a percentage for display, or `no data` for a student with no marks.
pub fn format_percentage(percentage: Option<f64>) -> String {
    match percentage {
        Some(p) => format!("{p:.1}%"),
        None => "no data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: StudentId, name: &str, marks: &[(&str, AttendanceStatus)]) -> Student {
        let mut s = Student::new(id, name);
        for (date, status) in marks {
            s.mark_attendance(*date, *status);
        }
        s
    }

    #[test]
    fn history_is_date_ordered() {
        let s = student(
            1,
            "Ada",
            &[
                ("2024-03-01", AttendanceStatus::Absent),
                ("2024-01-15", AttendanceStatus::Present),
            ],
        );
        let history = StudentHistory::from(&s);
        let dates: Vec<&str> = history.marks.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-15", "2024-03-01"]);
        assert_eq!(history.marks[1].status, AttendanceStatus::Absent);
    }

    #[test]
    fn summary_row_counts() {
        let s = student(
            4,
            "Linus",
            &[
                ("d1", AttendanceStatus::Present),
                ("d2", AttendanceStatus::Present),
                ("d3", AttendanceStatus::Absent),
            ],
        );
        let row = SummaryRow::from(&s);
        assert_eq!(row.present_days, 2);
        assert_eq!(row.marked_days, 3);
        assert!((row.percentage.unwrap() - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn daily_report_buckets() {
        let mut report = DailyReport::new("2024-01-01");
        report.record("Ada", Some(AttendanceStatus::Present));
        report.record("Grace", Some(AttendanceStatus::Absent));
        report.record("Linus", None);
        assert_eq!(report.present, ["Ada"]);
        assert_eq!(report.absent, ["Grace"]);
        assert_eq!(report.unmarked, ["Linus"]);
    }

    #[test]
    fn markdown_lists_every_row() {
        let summary = Summary {
            rows: vec![
                SummaryRow::from(&student(1, "Ada", &[("d1", AttendanceStatus::Present)])),
                SummaryRow::from(&student(2, "Grace", &[])),
            ],
        };
        let md = summary.to_markdown();
        assert!(md.contains("**Total students:** 2"));
        assert!(md.contains("| 1 | Ada | 1 | 1 | 100.0% |"));
        assert!(md.contains("| 2 | Grace | 0 | 0 | no data |"));
    }

    #[test]
    fn percentage_formatting() {
        assert_eq!(format_percentage(Some(66.666)), "66.7%");
        assert_eq!(format_percentage(None), "no data");
        assert_eq!(UpsertOutcome::Updated.to_string(), "updated");
    }
}
