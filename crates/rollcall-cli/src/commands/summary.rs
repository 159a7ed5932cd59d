//! The `rollcall summary` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use rollcall_core::report::{format_percentage, Summary};
use rollcall_core::RosterStore;

pub fn execute(store: &RosterStore, format: String) -> Result<()> {
    let summary = store.summary();

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", summary.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            println!("Total students: {}", summary.total_students());
            if !summary.rows.is_empty() {
                println!("{}", summary_table(&summary));
            }
        }
    }

    Ok(())
}

/// Summary as a console table, one row per student in roster order.
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Present", "Marked", "Attendance"]);

    for row in &summary.rows {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.name),
            Cell::new(row.present_days),
            Cell::new(row.marked_days),
            Cell::new(format_percentage(row.percentage)),
        ]);
    }

    table
}
