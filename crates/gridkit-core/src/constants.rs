//! Shared constants for the grid editor.

/// Number of panel rows in a grid.
pub const GRID_ROWS: usize = 3;

/// Number of panel columns in a grid.
pub const GRID_COLS: usize = 3;

/// Total number of panels in a grid. Presets carry exactly this many
/// transforms and crops.
pub const PANEL_COUNT: usize = GRID_ROWS * GRID_COLS;

/// Current grid configuration format version.
pub const CONFIG_VERSION: &str = "1.0.0";

/// Default minimum viewport zoom.
pub const MIN_ZOOM: f64 = 0.1;

/// Default maximum viewport zoom.
pub const MAX_ZOOM: f64 = 10.0;

/// Multiplier applied by a single zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 1.2;

/// Fraction of the viewport filled by fit-to-view.
pub const FIT_PADDING: f64 = 0.9;

/// Fraction of the viewport filled when focusing a single panel.
pub const FOCUS_FILL: f64 = 0.95;

/// Default bound on the undo stack.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Builds the deterministic panel id for a grid cell.
pub fn panel_id(row: usize, col: usize) -> String {
    format!("panel-{}-{}", row, col)
}
