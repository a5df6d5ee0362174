//! Crosshair configuration and its persistence
//!
//! Two YAML layers are read: the global file in
//! `~/.config/crosshair/config.yaml` and an optional workspace file
//! `<workspace>/.crosshair.yaml`. Workspace values win. Command-line
//! overrides sit on top of both and are never written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config_paths;

/// Resolved configuration snapshot the engine works from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosshairConfig {
    /// Master on/off switch
    #[serde(default)]
    pub enabled: bool,
    /// Line-window radius around the cursor
    #[serde(default = "default_size")]
    pub size: usize,
    /// Debounce delay after document edits, in milliseconds
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: u64,
    /// Guide color (any color string the renderer understands)
    #[serde(default = "default_border_color")]
    pub border_color: String,
    /// Guide thickness (e.g. "1px")
    #[serde(default = "default_border_width")]
    pub border_width: String,
    /// Offer to convert tabs in the window instead of disabling outright
    #[serde(default = "default_true")]
    pub auto_tab_to_space: bool,
    /// Pad short lines with trailing spaces so the column guide stays straight
    #[serde(default = "default_true")]
    pub add_whitespace: bool,
    /// Tab stop width used when converting tabs to spaces
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

fn default_size() -> usize {
    10
}

fn default_refresh_rate() -> u64 {
    500
}

fn default_border_color() -> String {
    "#65a5ff".to_string()
}

fn default_border_width() -> String {
    "1px".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tab_size() -> usize {
    4
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: default_size(),
            refresh_rate: default_refresh_rate(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            auto_tab_to_space: true,
            add_whitespace: true,
            tab_size: default_tab_size(),
        }
    }
}

impl CrosshairConfig {
    /// Whether switching from `self` to `other` changes what is drawn
    pub fn affects_guides(&self, other: &CrosshairConfig) -> bool {
        self.size != other.size
            || self.border_color != other.border_color
            || self.border_width != other.border_width
            || self.add_whitespace != other.add_whitespace
    }
}

// =============================================================================
// Layers
// =============================================================================

/// Trait for merging configuration layers
///
/// Values already set in `self` take precedence over values in `other`.
pub trait Merge {
    fn merge_from(&mut self, other: &Self);
}

impl<T: Clone> Merge for Option<T> {
    fn merge_from(&mut self, other: &Self) {
        if self.is_none() {
            *self = other.clone();
        }
    }
}

/// One configuration layer where every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tab_to_space: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<usize>,
}

impl Merge for PartialConfig {
    fn merge_from(&mut self, other: &Self) {
        self.enabled.merge_from(&other.enabled);
        self.size.merge_from(&other.size);
        self.refresh_rate.merge_from(&other.refresh_rate);
        self.border_color.merge_from(&other.border_color);
        self.border_width.merge_from(&other.border_width);
        self.auto_tab_to_space.merge_from(&other.auto_tab_to_space);
        self.add_whitespace.merge_from(&other.add_whitespace);
        self.tab_size.merge_from(&other.tab_size);
    }
}

impl PartialConfig {
    /// Fill unset keys from defaults
    pub fn resolve(&self) -> CrosshairConfig {
        let defaults = CrosshairConfig::default();
        CrosshairConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            size: self.size.unwrap_or(defaults.size),
            refresh_rate: self.refresh_rate.unwrap_or(defaults.refresh_rate),
            border_color: self
                .border_color
                .clone()
                .unwrap_or(defaults.border_color),
            border_width: self
                .border_width
                .clone()
                .unwrap_or(defaults.border_width),
            auto_tab_to_space: self.auto_tab_to_space.unwrap_or(defaults.auto_tab_to_space),
            add_whitespace: self.add_whitespace.unwrap_or(defaults.add_whitespace),
            tab_size: self.tab_size.unwrap_or(defaults.tab_size),
        }
    }

    /// Read a layer from disk; missing or unreadable files give an empty layer
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Option<PartialConfig>>(&content) {
                Ok(layer) => {
                    tracing::info!("Loaded config from {}", path.display());
                    layer.unwrap_or_default()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the layer to disk, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<(), String> {
        config_paths::ensure_parent(path)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Which layer a value is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
    Workspace,
}

/// Both layers plus the files they came from
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    global_path: Option<PathBuf>,
    workspace_path: Option<PathBuf>,
    global: PartialConfig,
    workspace: PartialConfig,
    overrides: PartialConfig,
}

impl ConfigStore {
    /// Load the global layer and, if given, the workspace layer
    pub fn load(workspace_root: Option<&Path>) -> Self {
        Self::with_paths(
            config_paths::config_file(),
            workspace_root.map(config_paths::workspace_file),
        )
    }

    /// Load layers from explicit files
    pub fn with_paths(global_path: Option<PathBuf>, workspace_path: Option<PathBuf>) -> Self {
        let mut store = Self {
            global_path,
            workspace_path,
            ..Self::default()
        };
        store.reload();
        store
    }

    /// In-memory store that never touches the disk
    pub fn in_memory(global: PartialConfig) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    /// Re-read both layers from disk
    pub fn reload(&mut self) {
        if let Some(path) = &self.global_path {
            self.global = PartialConfig::load(path);
        }
        if let Some(path) = &self.workspace_path {
            self.workspace = PartialConfig::load(path);
        }
    }

    /// Session-only values that win over both files
    pub fn set_overrides(&mut self, overrides: PartialConfig) {
        self.overrides = overrides;
    }

    /// Merged snapshot: overrides, then workspace, then global, then defaults
    pub fn resolved(&self) -> CrosshairConfig {
        let mut merged = self.overrides.clone();
        merged.merge_from(&self.workspace);
        merged.merge_from(&self.global);
        merged.resolve()
    }

    pub fn global(&self) -> &PartialConfig {
        &self.global
    }

    pub fn workspace(&self) -> &PartialConfig {
        &self.workspace
    }

    /// Layer that owns the `enabled` key
    ///
    /// The workspace layer if it sets the key, otherwise global.
    pub fn enabled_scope(&self) -> ConfigScope {
        if self.workspace_path.is_some() && self.workspace.enabled.is_some() {
            ConfigScope::Workspace
        } else {
            ConfigScope::Global
        }
    }

    /// Persist the on/off switch and return the layer it was written to
    pub fn set_enabled(&mut self, enabled: bool) -> Result<ConfigScope, String> {
        let scope = self.enabled_scope();
        let (layer, path) = match scope {
            ConfigScope::Workspace => (&mut self.workspace, self.workspace_path.as_ref()),
            ConfigScope::Global => (&mut self.global, self.global_path.as_ref()),
        };
        layer.enabled = Some(enabled);
        if let Some(path) = path {
            layer.save(path)?;
        }
        Ok(scope)
    }
}
