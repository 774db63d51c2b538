use gridkit_core::constants::{panel_id, GRID_COLS, GRID_ROWS};
use gridkit_core::{CropRegion, Transform};
use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::layer::Layer;

/// Cell of the 3x3 grid, both components in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelPosition {
    pub row: usize,
    pub col: usize,
}

impl PanelPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index of the cell, `None` outside the grid.
    pub fn index(self) -> Option<usize> {
        (self.row < GRID_ROWS && self.col < GRID_COLS).then(|| self.row * GRID_COLS + self.col)
    }
}

/// One independently transformable, croppable, layered grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub position: PanelPosition,
    pub transform: Transform,
    /// `None` shows the full panel.
    pub crop: Option<CropRegion>,
    /// Render order, index 0 at the bottom.
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Panel {
    /// Empty panel for a grid cell, with id `panel-{row}-{col}`.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            id: panel_id(row, col),
            position: PanelPosition::new(row, col),
            transform: Transform::default(),
            crop: None,
            layers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    pub fn layer_mut(&mut self, layer_id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    pub fn layer_index(&self, layer_id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == layer_id)
    }

    /// Layers that would be drawn, bottom to top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.annotations.is_empty()
    }
}
