//! Centralized configuration paths for crosshair
//!
//! Global files live under:
//! - Unix/macOS: `~/.config/crosshair/`
//! - Windows: `%APPDATA%\crosshair\`
//!
//! Workspace settings live in `<workspace>/.crosshair.yaml`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "crosshair";

/// File name of the per-workspace settings layer
pub const WORKSPACE_FILE: &str = ".crosshair.yaml";

/// Base config directory for crosshair
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/crosshair`
///   - Else: `~/.config/crosshair`
///
/// Windows:
///   - `%APPDATA%\crosshair`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/crosshair/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `<workspace>/.crosshair.yaml`
pub fn workspace_file(root: &Path) -> PathBuf {
    root.join(WORKSPACE_FILE)
}

/// `~/.config/crosshair/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}

/// Ensure the parent directory of a config file exists
pub fn ensure_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
