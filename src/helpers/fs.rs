//! File System Utilities
//!
//! Configuration and data directory management, plus the atomic file replace
//! used by the store.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("se", "awos", "wind-collector").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the collector's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/wind-collector/` or `$XDG_CONFIG_HOME/wind-collector/`
/// - **macOS**: `~/Library/Application Support/se.awos.wind-collector/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\awos\wind-collector\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let config_dir = project_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    Ok(config_dir.to_path_buf())
}

/// Get or create the data directory holding the default store
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/wind-collector/`
/// - **macOS**: `~/Library/Application Support/se.awos.wind-collector/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\awos\wind-collector\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let data_dir = project_dirs.data_dir();

    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    Ok(data_dir.to_path_buf())
}

/// Replace `path` with `contents` via a sibling temporary file and rename
///
/// Readers of `path` see either the previous file or the complete new one.
/// Each call uses its own temporary name, so a write that outlived its
/// timeout cannot interleave with the next one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .ok_or_else(|| Error::Invalid {
            message: format!("Not a file path: {}", path.display()),
        })?
        .to_os_string();
    tmp_name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        // Ignore: the temporary file may never have been created
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
