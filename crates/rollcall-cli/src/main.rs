//! rollcall CLI — interactive student attendance register.

use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rollcall_core::{RosterStore, StudentId};

use crate::config::RollcallConfig;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Student attendance register")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Roster file (overrides data_file from the config)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Date to mark attendance under, YYYY-MM-DD (default: today). Menu only.
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Menu,

    /// Print every student's attendance percentage
    Summary {
        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print one student's attendance history
    View {
        /// Student ID
        #[arg(long, allow_hyphen_values = true)]
        id: StudentId,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter rollcall.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rollcall=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config,
        data_file,
        date,
        command,
    } = cli;

    let command = command.unwrap_or(Commands::Menu);
    if date.is_some() && !matches!(command, Commands::Menu) {
        anyhow::bail!("--date only applies to the interactive menu");
    }

    match command {
        Commands::Menu => {
            let (store, config) = open_store(config.as_deref(), data_file)?;
            let date = date
                .unwrap_or_else(|| chrono::Local::now().date_naive())
                .format("%Y-%m-%d")
                .to_string();
            commands::menu::execute(store, date, config.first_run_entry)
        }
        Commands::Summary { format } => {
            let (store, _) = open_store(config.as_deref(), data_file)?;
            commands::summary::execute(&store, format)
        }
        Commands::View { id, format } => {
            let (store, _) = open_store(config.as_deref(), data_file)?;
            commands::view::execute(&store, id, format)
        }
        Commands::Init => commands::init::execute(),
    }
}

fn open_store(
    config_path: Option<&Path>,
    data_file: Option<PathBuf>,
) -> anyhow::Result<(RosterStore, RollcallConfig)> {
    let config = config::load_config_from(config_path)?;
    let data_file = data_file.unwrap_or_else(|| config.data_file.clone());
    Ok((RosterStore::open(data_file), config))
}
