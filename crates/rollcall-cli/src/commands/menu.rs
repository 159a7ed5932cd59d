//! The interactive `rollcall menu` session.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;

use rollcall_core::report::UpsertOutcome;
use rollcall_core::{AttendanceStatus, RosterStore, StoreError, StudentId};

use super::summary::summary_table;

const RULE: &str = "============================================================";

pub fn execute(store: RosterStore, date: String, first_run_entry: bool) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(store, stdin.lock(), stdout.lock(), date);
    session.run(first_run_entry)
}

/// A numbered option from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddOrUpdate,
    MarkToday,
    View,
    Summary,
    Clear,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::AddOrUpdate),
            "2" => Ok(MenuChoice::MarkToday),
            "3" => Ok(MenuChoice::View),
            "4" => Ok(MenuChoice::Summary),
            "5" => Ok(MenuChoice::Clear),
            "6" => Ok(MenuChoice::Exit),
            other => Err(format!("invalid option: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingChoice,
    Exiting,
}

/// Menu loop over arbitrary line-based input and output.
///
/// End of input at any prompt ends the session as if exit had been confirmed.
pub struct Session<R, W> {
    store: RosterStore,
    input: R,
    out: W,
    date: String,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: RosterStore, input: R, out: W, date: String) -> Self {
        Self {
            store,
            input,
            out,
            date,
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (RosterStore, W) {
        (self.store, self.out)
    }

    /// Run until the user confirms exit or input runs out.
    pub fn run(&mut self, first_run_entry: bool) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.out, "No previous data found. Starting fresh.")?;
            if first_run_entry && self.bulk_entry()? == State::Exiting {
                return Ok(());
            }
        }

        let mut state = State::AwaitingChoice;
        while state == State::AwaitingChoice {
            state = self.step()?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn step(&mut self) -> Result<State> {
        self.print_menu()?;
        let Some(line) = self.prompt("Enter your choice: ")? else {
            return Ok(State::Exiting);
        };

        match line.parse::<MenuChoice>() {
            Ok(MenuChoice::AddOrUpdate) => self.add_or_update(),
            Ok(MenuChoice::MarkToday) => self.mark_today(),
            Ok(MenuChoice::View) => self.view(),
            Ok(MenuChoice::Summary) => self.summary(),
            Ok(MenuChoice::Clear) => self.clear(),
            Ok(MenuChoice::Exit) => self.confirm_exit(),
            Err(_) => {
                writeln!(self.out, "Invalid option.")?;
                Ok(State::AwaitingChoice)
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "\nPlease choose an option from the menu below:")?;
        writeln!(self.out, "1. Add or Update a student")?;
        writeln!(self.out, "2. Mark today's attendance")?;
        writeln!(self.out, "3. View attendance for a student")?;
        writeln!(self.out, "4. View all students' attendance summary")?;
        writeln!(self.out, "5. Clear all data")?;
        writeln!(self.out, "6. Exit the system")?;
        writeln!(self.out, "{RULE}")
    }

    /// First-run step: ask how many students there are, then each one's details.
    fn bulk_entry(&mut self) -> Result<State> {
        let Some(line) = self.prompt("Enter the number of students: ")? else {
            return Ok(State::Exiting);
        };
        let Ok(count) = line.parse::<usize>() else {
            writeln!(self.out, "Invalid number of students.")?;
            return Ok(State::AwaitingChoice);
        };

        for _ in 0..count {
            if self.add_or_update()? == State::Exiting {
                return Ok(State::Exiting);
            }
        }
        Ok(State::AwaitingChoice)
    }

    fn add_or_update(&mut self) -> Result<State> {
        let Some(id) = self.read_student_id()? else {
            return Ok(State::Exiting);
        };
        let Some(id) = id else {
            return Ok(State::AwaitingChoice);
        };
        let Some(name) = self.prompt("Enter student name: ")? else {
            return Ok(State::Exiting);
        };

        let (outcome, persisted) = self.store.add_or_update(id, &name).into_parts();
        match outcome {
            UpsertOutcome::Added => writeln!(self.out, "Student added: {name}")?,
            UpsertOutcome::Updated => writeln!(self.out, "Student updated: {name}")?,
        }
        self.report_save(persisted)?;
        Ok(State::AwaitingChoice)
    }

    fn mark_today(&mut self) -> Result<State> {
        let date = self.date.clone();
        writeln!(
            self.out,
            "Mark attendance for all students today ({date}). Enter 'p' for Present or 'a' for Absent."
        )?;

        let students: Vec<(StudentId, String)> = self
            .store
            .students()
            .iter()
            .map(|s| (s.id(), s.name.clone()))
            .collect();

        let mut statuses = HashMap::with_capacity(students.len());
        for (id, name) in students {
            let Some(answer) = self.prompt(&format!("{name}: "))? else {
                return Ok(State::Exiting);
            };
            statuses.insert(id, AttendanceStatus::from_mark(&answer));
        }

        let (report, persisted) = self.store.mark_daily(&date, &statuses).into_parts();
        writeln!(self.out, "Attendance marked for {date}")?;
        self.report_save(persisted)?;

        writeln!(self.out, "\nStudents Present Today: ")?;
        if report.present.is_empty() {
            writeln!(self.out, "No students were present.")?;
        }
        for name in &report.present {
            writeln!(self.out, "{name}")?;
        }

        writeln!(self.out, "\nStudents Absent Today: ")?;
        if report.absent.is_empty() {
            writeln!(self.out, "No students were absent.")?;
        }
        for name in &report.absent {
            writeln!(self.out, "{name}")?;
        }
        Ok(State::AwaitingChoice)
    }

    fn view(&mut self) -> Result<State> {
        let Some(id) = self.read_student_id()? else {
            return Ok(State::Exiting);
        };
        let Some(id) = id else {
            return Ok(State::AwaitingChoice);
        };

        match self.store.view(id) {
            Ok(history) => {
                writeln!(self.out, "Attendance for {}:", history.name)?;
                for mark in &history.marks {
                    writeln!(self.out, "{} - {}", mark.date, mark.status)?;
                }
            }
            Err(StoreError::NotFound(_)) => writeln!(self.out, "Student not found.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(State::AwaitingChoice)
    }

    fn summary(&mut self) -> Result<State> {
        let summary = self.store.summary();
        writeln!(self.out, "Total students: {}", summary.total_students())?;
        writeln!(self.out, "Attendance summary: ")?;
        if !summary.rows.is_empty() {
            writeln!(self.out, "{}", summary_table(&summary))?;
        }
        Ok(State::AwaitingChoice)
    }

    fn clear(&mut self) -> Result<State> {
        let removed = self.store.clear();
        writeln!(self.out, "All data has been cleared.")?;
        if let Err(e) = removed {
            writeln!(self.out, "Warning: {e}")?;
        }
        Ok(State::AwaitingChoice)
    }

    fn confirm_exit(&mut self) -> Result<State> {
        let Some(answer) = self.prompt("Are you sure you want to exit? (yes/no): ")? else {
            return Ok(State::Exiting);
        };
        if answer.eq_ignore_ascii_case("yes") {
            writeln!(self.out, "Exiting system.")?;
            Ok(State::Exiting)
        } else {
            Ok(State::AwaitingChoice)
        }
    }

    /// Prompt for an id. The outer `None` means input ended, the inner one
    /// that the answer was not a number.
    fn read_student_id(&mut self) -> Result<Option<Option<StudentId>>> {
        let Some(line) = self.prompt("Enter student ID: ")? else {
            return Ok(None);
        };
        match line.parse::<StudentId>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                writeln!(self.out, "Invalid student ID.")?;
                Ok(Some(None))
            }
        }
    }

    fn report_save(&mut self, persisted: Result<(), StoreError>) -> io::Result<()> {
        if let Err(e) = persisted {
            writeln!(self.out, "Error saving data: {e}")?;
        }
        Ok(())
    }

    /// Print `text` without a newline and read one trimmed line.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    const DATE: &str = "2024-01-01";

    fn run_session(store: RosterStore, script: &str, first_run_entry: bool) -> (RosterStore, String) {
        run_bytes(store, script.as_bytes(), first_run_entry)
    }

    fn run_bytes(store: RosterStore, script: &[u8], first_run_entry: bool) -> (RosterStore, String) {
        let mut session = Session::new(
            store,
            Cursor::new(script.to_vec()),
            Vec::new(),
            DATE.to_string(),
        );
        session.run(first_run_entry).unwrap();
        let (store, out) = session.into_parts();
        (store, String::from_utf8(out).unwrap())
    }

    fn seeded(dir: &TempDir) -> RosterStore {
        let mut store = RosterStore::open(dir.path().join("attendance.json"));
        store.add_or_update(1, "Ada").persisted.unwrap();
        store.add_or_update(2, "Grace").persisted.unwrap();
        store
    }

    #[test]
    fn menu_choice_parse() {
        assert_eq!("1".parse::<MenuChoice>().unwrap(), MenuChoice::AddOrUpdate);
        assert_eq!(" 6 ".parse::<MenuChoice>().unwrap(), MenuChoice::Exit);
        assert!("7".parse::<MenuChoice>().is_err());
        assert!("two".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn first_run_bulk_entry_then_exit() {
        let dir = TempDir::new().unwrap();
        let store = RosterStore::open(dir.path().join("attendance.json"));
        let (store, out) = run_session(store, "2\n1\nAda Lovelace\n2\nGrace\n6\nyes\n", true);

        assert!(out.contains("No previous data found. Starting fresh."));
        assert!(out.contains("Student added: Ada Lovelace"));
        assert!(out.contains("Student added: Grace"));
        assert!(out.contains("Exiting system."));
        assert_eq!(store.roster().len(), 2);
    }

    #[test]
    fn first_run_entry_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let store = RosterStore::open(dir.path().join("attendance.json"));
        let (store, out) = run_session(store, "6\nyes\n", false);
        assert!(!out.contains("Enter the number of students"));
        assert!(store.is_empty());
    }

    #[test]
    fn exit_requires_yes() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_session(seeded(&dir), "6\nno\n6\nYES\n", true);
        assert_eq!(out.matches("Are you sure you want to exit?").count(), 2);
        assert!(out.contains("Exiting system."));
    }

    #[test]
    fn invalid_choice_returns_to_menu() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_session(seeded(&dir), "9\nabc\n6\nyes\n", true);
        assert_eq!(out.matches("Invalid option.").count(), 2);
    }

    #[test]
    fn end_of_input_exits_quietly() {
        let dir = TempDir::new().unwrap();
        let (store, out) = run_session(seeded(&dir), "1\n", true);
        assert!(out.contains("Enter student ID: "));
        assert!(!out.contains("Exiting system."));
        assert_eq!(store.roster().len(), 2);
    }

    #[test]
    fn update_existing_student() {
        let dir = TempDir::new().unwrap();
        let (store, out) = run_session(seeded(&dir), "1\n2\nGrace Hopper\n6\nyes\n", true);
        assert!(out.contains("Student updated: Grace Hopper"));
        assert_eq!(store.roster().get(2).unwrap().name, "Grace Hopper");
        assert_eq!(store.roster().len(), 2);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, out) = run_session(seeded(&dir), "1\nseven\n6\nyes\n", true);
        assert!(out.contains("Invalid student ID."));
        assert_eq!(store.roster().len(), 2);
    }

    #[test]
    fn mark_today_lists_present_and_absent() {
        let dir = TempDir::new().unwrap();
        let (store, out) = run_session(seeded(&dir), "2\np\na\n6\nyes\n", true);

        assert!(out.contains("Mark attendance for all students today (2024-01-01)"));
        assert!(out.contains("Ada: "));
        assert!(out.contains("Attendance marked for 2024-01-01"));
        assert!(out.contains("Students Present Today: \nAda\n"));
        assert!(out.contains("Students Absent Today: \nGrace\n"));
        assert_eq!(
            store.roster().get(1).unwrap().attendance.get(DATE),
            Some(&AttendanceStatus::Present)
        );
    }

    #[test]
    fn mark_today_with_nobody_present() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_session(seeded(&dir), "2\na\nx\n6\nyes\n", true);
        assert!(out.contains("No students were present."));
        assert!(!out.contains("No students were absent."));
    }

    #[test]
    fn view_history_and_unknown_student() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_session(seeded(&dir), "2\np\na\n3\n1\n3\n99\n6\nyes\n", true);
        assert!(out.contains("Attendance for Ada:\n2024-01-01 - Present"));
        assert!(out.contains("Student not found."));
    }

    #[test]
    fn summary_shows_table() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_session(seeded(&dir), "2\np\na\n4\n6\nyes\n", true);
        assert!(out.contains("Total students: 2"));
        assert!(out.contains("100.0%"));
        assert!(out.contains("0.0%"));
    }

    #[test]
    fn clear_empties_roster_and_file() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir);
        let path = store.path().to_path_buf();
        let (store, out) = run_session(store, "5\n4\n6\nyes\n", true);

        assert!(out.contains("All data has been cleared."));
        assert!(out.contains("Total students: 0"));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn save_failure_is_reported_and_session_continues() {
        let dir = TempDir::new().unwrap();
        // The data path is a directory, so every save fails.
        let store = RosterStore::open(dir.path());
        let (store, out) = run_session(store, "1\n1\nAda\n1\n1\nAda\n6\nyes\n", true);

        assert!(out.contains("Error saving data:"));
        assert!(out.contains("Student added: Ada"));
        assert!(out.contains("Exiting system."));
        assert_eq!(store.roster().len(), 1);
    }

    #[test]
    fn non_utf8_name_does_not_end_session() {
        let dir = TempDir::new().unwrap();
        // "José" as typed on a cp1252 console.
        let (store, out) = run_bytes(seeded(&dir), b"1\n2\nJos\xE9\n4\n6\nyes\n", true);

        assert!(out.contains("Student updated: Jos\u{FFFD}"));
        assert!(out.contains("Total students: 2"));
        assert!(out.contains("Exiting system."));
        assert_eq!(store.roster().get(2).unwrap().name, "Jos\u{FFFD}");
    }
}
