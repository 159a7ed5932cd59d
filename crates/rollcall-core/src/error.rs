//! Store error types.
//!
//! Everything that can go wrong while reading, writing or querying the
//! roster. None of these are fatal to the interactive session; callers decide
//! whether to print, log or ignore them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::StudentId;

/// Errors produced by the roster and its backing file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but does not hold a roster.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The roster could not be encoded.
    #[error("failed to serialize roster: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The backing file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file could not be deleted.
    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No student with this id is on the roster.
    #[error("student {0} not found")]
    NotFound(StudentId),
}

impl StoreError {
    /// Returns `true` if this is a read failure caused by the file not existing.
    ///
    /// That is the normal first-run case, as opposed to an unreadable or
    /// corrupt file.
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            StoreError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}
