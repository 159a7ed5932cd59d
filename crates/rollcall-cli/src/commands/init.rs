//! The `rollcall init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("rollcall.toml");
    if path.exists() {
        println!("rollcall.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created rollcall.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point data_file at where the register should live");
    println!("  2. Run: rollcall");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rollcall configuration

# Where the roster is saved. ${VAR} references are expanded from the environment.
data_file = "attendance_data.json"

# Ask for the class list when starting with an empty roster.
first_run_entry = true
"#;
