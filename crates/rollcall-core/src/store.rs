//! File-backed roster store.
//!
//! [`RosterStore`] owns the in-memory [`Roster`] and the path of its backing
//! file. It is opened once at startup and rewrites the whole file after every
//! mutation. A failed write never undoes the in-memory change: the caller
//! gets the outcome together with the save error in a [`Mutation`], and the
//! two copies stay out of step until the next successful save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::error::StoreError;
use crate::model::{AttendanceStatus, Student, StudentId};
use crate::report::{DailyReport, StudentHistory, Summary, SummaryRow, UpsertOutcome};
use crate::roster::Roster;

/// Outcome of a mutating store operation plus the result of persisting it.
#[derive(Debug)]
#[must_use = "a failed save is only reported through `persisted`"]
pub struct Mutation<T> {
    /// What the operation did in memory. Always applied.
    pub outcome: T,
    /// Whether the roster was written to the backing file afterwards.
    pub persisted: Result<(), StoreError>,
}

impl<T> Mutation<T> {
    pub fn into_parts(self) -> (T, Result<(), StoreError>) {
        (self.outcome, self.persisted)
    }
}

/// The roster together with the file it is persisted to.
#[derive(Debug)]
pub struct RosterStore {
    path: PathBuf,
    roster: Roster,
}

impl RosterStore {
    /// Open the store at `path`, loading whatever roster it holds.
    ///
    /// A missing, unreadable or corrupt file yields an empty roster. The
    /// failure is logged and otherwise ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let roster = match Roster::load(&path) {
            Ok(roster) => {
                tracing::debug!(
                    "loaded {} student(s) from {}",
                    roster.len(),
                    path.display()
                );
                roster
            }
            Err(e) if e.is_missing_file() => {
                tracing::info!("no roster at {}, starting fresh", path.display());
                Roster::new()
            }
            Err(e) => {
                tracing::warn!("ignoring unusable roster file: {e}");
                Roster::new()
            }
        };
        Self { path, roster }
    }

    /// Wrap an existing roster without touching the file system.
    pub fn with_roster(path: impl Into<PathBuf>, roster: Roster) -> Self {
        Self {
            path: path.into(),
            roster,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn students(&self) -> &[Student] {
        self.roster.students()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Rename the student with `id`, or append a new one if there is none.
    ///
    /// A renamed student keeps its position and attendance marks.
    #[instrument(skip(self, name), fields(path = %self.path.display()))]
    pub fn add_or_update(&mut self, id: StudentId, name: &str) -> Mutation<UpsertOutcome> {
        let outcome = match self.roster.get_mut(id) {
            Some(student) => {
                student.name = name.to_string();
                UpsertOutcome::Updated
            }
            None => {
                self.roster.push(Student::new(id, name));
                UpsertOutcome::Added
            }
        };
        tracing::debug!("student {id} {outcome}");
        self.persist(outcome)
    }

    /// Mark every student for `date` using the status supplied for their id.
    ///
    /// Students without an entry in `statuses` get no mark and are listed as
    /// unmarked. The file is written once, after all marks are applied.
    #[instrument(skip(self, statuses), fields(path = %self.path.display()))]
    pub fn mark_daily(
        &mut self,
        date: &str,
        statuses: &HashMap<StudentId, AttendanceStatus>,
    ) -> Mutation<DailyReport> {
        let mut report = DailyReport::new(date);
        for student in self.roster.iter_mut() {
            let status = statuses.get(&student.id()).copied();
            if let Some(status) = status {
                student.mark_attendance(date, status);
            }
            report.record(&student.name, status);
        }
        tracing::debug!(
            present = report.present.len(),
            absent = report.absent.len(),
            "marked attendance for {date}"
        );
        self.persist(report)
    }

    /// Attendance history of the student with `id`.
    pub fn view(&self, id: StudentId) -> Result<StudentHistory, StoreError> {
        self.roster
            .get(id)
            .map(StudentHistory::from)
            .ok_or(StoreError::NotFound(id))
    }

    /// Attendance percentage of every student, in roster order.
    pub fn summary(&self) -> Summary {
        Summary {
            rows: self.students().iter().map(SummaryRow::from).collect(),
        }
    }

    /// Drop every student and delete the backing file.
    ///
    /// The in-memory roster is emptied even if the file cannot be removed.
    /// A file that is already gone is not an error.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.roster.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Write the current roster to the backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        self.roster.save(&self.path)
    }

    fn persist<T>(&self, outcome: T) -> Mutation<T> {
        let persisted = self.save();
        if let Err(e) = &persisted {
            tracing::error!("roster change kept in memory only: {e}");
        }
        Mutation { outcome, persisted }
    }
}
