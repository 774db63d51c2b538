//! Serialization of grid files.
//!
//! `.grid.json` files hold a [`GridConfiguration`] wrapped in a small
//! envelope carrying the file format version, the save time and, optionally,
//! the camera the grid was last viewed with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::model::GridConfiguration;
use crate::viewport::Viewport;

/// Grid file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Conventional file extension, without the leading dot.
pub const FILE_EXTENSION: &str = "grid.json";

/// Saved camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl From<&Viewport> for ViewportSnapshot {
    fn from(viewport: &Viewport) -> Self {
        Self {
            zoom: viewport.zoom(),
            pan_x: viewport.pan().x,
            pan_y: viewport.pan().y,
        }
    }
}

/// On-disk envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub format_version: String,
    pub saved_at: DateTime<Utc>,
    pub configuration: GridConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<ViewportSnapshot>,
}

impl GridFile {
    pub fn new(configuration: GridConfiguration) -> Self {
        Self {
            format_version: FILE_FORMAT_VERSION.to_string(),
            saved_at: Utc::now(),
            configuration,
            viewport: None,
        }
    }

    pub fn with_viewport(mut self, viewport: &Viewport) -> Self {
        self.viewport = Some(viewport.into());
        self
    }

    /// Pretty JSON
    pub fn to_json(&self) -> GridResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a grid file. Unknown major format versions and
    /// structurally invalid configurations are rejected.
    pub fn from_json(json: &str) -> GridResult<Self> {
        let file: GridFile = serde_json::from_str(json)?;
        let major = file.format_version.split('.').next().unwrap_or_default();
        let supported = FILE_FORMAT_VERSION.split('.').next().unwrap_or_default();
        if major != supported {
            return Err(GridError::UnsupportedVersion(file.format_version));
        }
        file.configuration.validate()?;
        Ok(file)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> GridResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        debug!("saved grid file {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_json(&content)?;
        debug!(
            "loaded grid file {} (project {})",
            path.display(),
            file.configuration.project_id
        );
        Ok(file)
    }
}

/// Serializes a configuration into a grid file string.
pub fn to_json(configuration: &GridConfiguration) -> GridResult<String> {
    GridFile::new(configuration.clone()).to_json()
}

/// Parses a grid file string, returning its configuration.
pub fn from_json(json: &str) -> GridResult<GridConfiguration> {
    Ok(GridFile::from_json(json)?.configuration)
}

/// Writes a configuration to `path`.
pub fn save_configuration(
    configuration: &GridConfiguration,
    path: impl AsRef<Path>,
) -> GridResult<()> {
    GridFile::new(configuration.clone()).save_to_file(path)
}

/// Reads a configuration from `path`.
pub fn load_configuration(path: impl AsRef<Path>) -> GridResult<GridConfiguration> {
    Ok(GridFile::load_from_file(path)?.configuration)
}
