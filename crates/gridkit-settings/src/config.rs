//! Configuration and settings management for GridKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - History settings (undo stack bound)
//! - Viewport settings (zoom limits, zoom step, framing ratios, initial size)
//! - Grid layout (panel cell size and gap in canvas units)
//! - Storage (where custom presets and other user data live)

use gridkit_core::constants::{
    DEFAULT_MAX_HISTORY, FIT_PADDING, FOCUS_FILL, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Application directory name under the platform config dir.
const APP_DIR_NAME: &str = "gridkit";

/// Undo/redo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of operations kept on the undo stack
    pub max_stack_size: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Viewport behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Lowest allowed zoom factor
    pub min_zoom: f64,
    /// Highest allowed zoom factor
    pub max_zoom: f64,
    /// Multiplier for one zoom-in/zoom-out step
    pub zoom_step: f64,
    /// Fraction of the viewport filled by fit-to-view
    pub fit_padding: f64,
    /// Fraction of the viewport filled when focusing a panel
    pub focus_fill: f64,
    /// Initial viewport width in pixels
    pub width: f64,
    /// Initial viewport height in pixels
    pub height: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            fit_padding: FIT_PADDING,
            focus_fill: FOCUS_FILL,
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Canvas layout of the 3x3 grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayoutSettings {
    /// Width of one panel cell in canvas units
    pub panel_width: f64,
    /// Height of one panel cell in canvas units
    pub panel_height: f64,
    /// Gap between adjacent cells in canvas units
    pub gap: f64,
}

impl Default for GridLayoutSettings {
    fn default() -> Self {
        Self {
            panel_width: 400.0,
            panel_height: 300.0,
            gap: 8.0,
        }
    }
}

/// Storage location settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for persisted user data; platform config dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl StorageSettings {
    /// Resolves the storage directory, falling back to
    /// `<config dir>/gridkit`.
    pub fn resolve_directory(&self) -> SettingsResult<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// History settings
    pub history: HistorySettings,
    /// Viewport settings
    pub viewport: ViewportSettings,
    /// Grid layout
    pub grid: GridLayoutSettings,
    /// Storage settings
    pub storage: StorageSettings,
}

impl EditorConfig {
    /// Default location of the config file: `<config dir>/gridkit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
    }

    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        tracing::debug!("loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise. Invalid files are
    /// still reported as errors.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let vp = &self.viewport;
        if !(vp.min_zoom.is_finite() && vp.min_zoom > 0.0) {
            return Err(SettingsError::invalid("viewport.min_zoom", "must be > 0"));
        }
        if !(vp.max_zoom.is_finite() && vp.max_zoom >= vp.min_zoom) {
            return Err(SettingsError::invalid(
                "viewport.max_zoom",
                "must be >= min_zoom",
            ));
        }
        if !(vp.zoom_step.is_finite() && vp.zoom_step > 1.0) {
            return Err(SettingsError::invalid("viewport.zoom_step", "must be > 1"));
        }
        for (key, value) in [
            ("viewport.fit_padding", vp.fit_padding),
            ("viewport.focus_fill", vp.focus_fill),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SettingsError::invalid(key, "must be in (0, 1]"));
            }
        }
        if !(vp.width.is_finite()
            && vp.width > 0.0
            && vp.height.is_finite()
            && vp.height > 0.0)
        {
            return Err(SettingsError::invalid(
                "viewport.width",
                "viewport dimensions must be finite and > 0",
            ));
        }

        let grid = &self.grid;
        if !(grid.panel_width.is_finite()
            && grid.panel_width > 0.0
            && grid.panel_height.is_finite()
            && grid.panel_height > 0.0)
        {
            return Err(SettingsError::invalid(
                "grid.panel_width",
                "panel dimensions must be finite and > 0",
            ));
        }
        if !(grid.gap.is_finite() && grid.gap >= 0.0) {
            return Err(SettingsError::invalid("grid.gap", "must be >= 0"));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
