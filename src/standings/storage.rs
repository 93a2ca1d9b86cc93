use super::types::{Standings, STANDINGS_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default standings file path (~/.config/rally-score/standings.json)
pub fn get_standings_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("standings.json"))
}

/// Load standings from a JSON file
///
/// If the file doesn't exist, returns empty standings.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_standings(path: &Path) -> Result<Standings> {
    if !path.exists() {
        return Ok(Standings::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open standings file at {}", path.display()))?;

    let standings: Standings =
        serde_json::from_reader(file).context("Failed to load standings")?;

    if standings.version != STANDINGS_VERSION {
        anyhow::bail!("Unsupported standings version: {}", standings.version);
    }

    Ok(standings)
}

/// Save standings to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_standings(path: &Path, standings: &Standings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, standings)
        .context("Failed to serialize standings")?;

    file.commit().context("Failed to save standings")?;

    Ok(())
}
