use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$SHAREHUB_HOME`, or `~/.sharehub`.
pub fn sharehub_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHAREHUB_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".sharehub"))
}

pub fn ensure_sharehub_home() -> Result<PathBuf> {
    let dir = sharehub_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where hub.json and registrations.json live. Relative paths resolve
/// against the sharehub home directory.
pub fn data_dir(configured: Option<&str>) -> Result<PathBuf> {
    let home = ensure_sharehub_home()?;
    Ok(match configured {
        Some(p) if !p.trim().is_empty() => home.join(p),
        _ => home.join("data"),
    })
}
