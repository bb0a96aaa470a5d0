use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::ProjectRecord;

pub const DEFAULT_BACKUP_PATH: &str = "data/projects-backup.json";

/// Writes `records` as a pretty-printed JSON array.
///
/// Returns `false` without touching the disk when there is nothing to write.
pub fn write_backup(path: &Path, records: &[ProjectRecord]) -> Result<bool> {
    if records.is_empty() {
        warn!("no projects to export");
        return Ok(false);
    }

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating backup directory {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(records).context("serializing projects")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    info!("exported {} projects to {}", records.len(), path.display());
    Ok(true)
}

pub fn read_backup(path: &Path) -> Result<Vec<ProjectRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("backup file not found at {}", path.display()))?;
    let records: Vec<ProjectRecord> = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", path.display()))?;

    info!("found {} projects in {}", records.len(), path.display());
    Ok(records)
}
