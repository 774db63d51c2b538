//! Canvas placement of the 3x3 grid.
//!
//! Cells are laid out row-major from the canvas origin, separated by a
//! uniform gap. Panel transforms are applied inside a cell and do not move
//! the cell itself.

use gridkit_core::constants::{GRID_COLS, GRID_ROWS};
use gridkit_core::{Bounds, Point};
use gridkit_settings::GridLayoutSettings;

use crate::model::PanelPosition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub panel_width: f64,
    pub panel_height: f64,
    pub gap: f64,
}

impl GridLayout {
    pub fn new(panel_width: f64, panel_height: f64, gap: f64) -> Self {
        Self {
            panel_width,
            panel_height,
            gap,
        }
    }

    /// Canvas bounds of the cell at `position`, `None` outside the grid.
    pub fn cell_bounds(&self, position: PanelPosition) -> Option<Bounds> {
        if position.row >= GRID_ROWS || position.col >= GRID_COLS {
            return None;
        }
        Some(Bounds::new(
            position.col as f64 * (self.panel_width + self.gap),
            position.row as f64 * (self.panel_height + self.gap),
            self.panel_width,
            self.panel_height,
        ))
    }

    /// Bounds enclosing every cell.
    pub fn grid_bounds(&self) -> Bounds {
        let cols = GRID_COLS as f64;
        let rows = GRID_ROWS as f64;
        Bounds::new(
            0.0,
            0.0,
            cols * self.panel_width + (cols - 1.0) * self.gap,
            rows * self.panel_height + (rows - 1.0) * self.gap,
        )
    }

    /// Cell containing a canvas point. Points in a gap hit nothing.
    pub fn hit_test(&self, point: Point) -> Option<PanelPosition> {
        let stride_x = self.panel_width + self.gap;
        let stride_y = self.panel_height + self.gap;
        if point.x < 0.0 || point.y < 0.0 || stride_x <= 0.0 || stride_y <= 0.0 {
            return None;
        }
        let col = (point.x / stride_x).floor() as usize;
        let row = (point.y / stride_y).floor() as usize;
        let position = PanelPosition { row, col };
        self.cell_bounds(position)
            .filter(|cell| cell.contains(&point))
            .map(|_| position)
    }
}

impl From<&GridLayoutSettings> for GridLayout {
    fn from(settings: &GridLayoutSettings) -> Self {
        Self::new(settings.panel_width, settings.panel_height, settings.gap)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        (&GridLayoutSettings::default()).into()
    }
}
