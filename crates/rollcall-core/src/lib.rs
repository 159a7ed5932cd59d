//! rollcall-core — Student roster, attendance marks and file persistence.
//!
//! This crate holds the record model and the file-backed store that the
//! `rollcall` CLI drives. It does no console I/O of its own.

pub mod error;
pub mod model;
pub mod report;
pub mod roster;
pub mod store;

pub use error::StoreError;
pub use model::{AttendanceStatus, Student, StudentId};
pub use roster::Roster;
pub use store::{Mutation, RosterStore};
