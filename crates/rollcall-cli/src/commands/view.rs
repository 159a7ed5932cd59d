//! The `rollcall view` command.

use anyhow::Result;

use rollcall_core::{RosterStore, StudentId};

pub fn execute(store: &RosterStore, id: StudentId, format: String) -> Result<()> {
    let history = store.view(id)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("Attendance for {}:", history.name);
    if history.marks.is_empty() {
        println!("No attendance recorded.");
    }
    for mark in &history.marks {
        println!("{} - {}", mark.date, mark.status);
    }

    Ok(())
}
