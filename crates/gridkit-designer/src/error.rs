//! Error types for the designer crate.
//!
//! Ordinary editing never produces these: unknown ids are reported through
//! `bool`/`Option` returns. Errors are reserved for structural validation at
//! the load/add boundary and for file and storage I/O.

use gridkit_settings::SettingsError;
use std::io;
use thiserror::Error;

/// Errors raised at the designer's validation and I/O boundaries.
#[derive(Error, Debug)]
pub enum GridError {
    /// A configuration does not hold exactly one panel per grid cell.
    #[error("Invalid panel count: expected {expected}, found {found}")]
    InvalidPanelCount { expected: usize, found: usize },

    /// Two panels share the same id.
    #[error("Duplicate panel id: {0}")]
    DuplicatePanelId(String),

    /// A panel sits outside the 3x3 grid.
    #[error("Panel {id} has position ({row}, {col}) outside the grid")]
    InvalidPanelPosition { id: String, row: usize, col: usize },

    /// Two panels occupy the same cell.
    #[error("Duplicate panel position: ({row}, {col})")]
    DuplicatePanelPosition { row: usize, col: usize },

    /// A preset is structurally invalid.
    #[error("Invalid preset: {0}")]
    InvalidPreset(String),

    /// The preset id does not name a custom preset.
    #[error("Custom preset not found: {0}")]
    PresetNotFound(String),

    /// A grid file has an unsupported format version.
    #[error("Unsupported grid file version: {0}")]
    UnsupportedVersion(String),

    /// Key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] SettingsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for designer operations.
pub type GridResult<T> = Result<T, GridError>;
