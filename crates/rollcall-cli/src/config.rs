//! rollcall configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level rollcall configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollcallConfig {
    /// File the roster is persisted to.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Ask for the initial class list when the roster starts out empty.
    #[serde(default = "default_true")]
    pub first_run_entry: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("attendance_data.json")
}

fn default_true() -> bool {
    true
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            first_run_entry: true,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, which must exist when given
/// 2. `rollcall.toml` in the current directory
/// 3. `~/.config/rollcall/config.toml`
///
/// Falls back to [`RollcallConfig::default`] when nothing is found. `${VAR}`
/// references in `data_file` are expanded afterwards.
pub fn load_config_from(path: Option<&Path>) -> Result<RollcallConfig> {
    let mut config = match locate_config(path)? {
        Some(found) => {
            tracing::debug!("using config {}", found.display());
            let content = std::fs::read_to_string(&found)
                .with_context(|| format!("failed to read config: {}", found.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", found.display()))?
        }
        None => RollcallConfig::default(),
    };

    config.data_file = expand_path(&config.data_file)?;
    Ok(config)
}

fn locate_config(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        anyhow::ensure!(p.exists(), "config file not found: {}", p.display());
        return Ok(Some(p.to_path_buf()));
    }

    let global = std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("rollcall")
            .join("config.toml")
    });
    Ok([Some(PathBuf::from("rollcall.toml")), global]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.exists()))
}

fn parse_config(content: &str) -> Result<RollcallConfig> {
    Ok(toml::from_str(content)?)
}

/// Expand `${VAR}` references in a configured path.
///
/// An unset variable is an error, so a typo cannot silently redirect the
/// roster to a different file. An unterminated `${` is kept literally.
fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    if !raw.contains("${") {
        return Ok(path.to_path_buf());
    }

    let mut expanded = String::with_capacity(raw.len());
    let mut rest: &str = &raw;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        let value = std::env::var(name)
            .with_context(|| format!("data_file refers to unset variable ${{{name}}}"))?;
        expanded.push_str(&rest[..start]);
        expanded.push_str(&value);
        rest = &rest[start + 3 + len..];
    }
    expanded.push_str(rest);

    Ok(PathBuf::from(expanded))
}
