use chrono::{DateTime, Utc};
use gridkit_core::constants::{CONFIG_VERSION, GRID_COLS, GRID_ROWS, PANEL_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::panel::{Panel, PanelPosition};
use crate::error::{GridError, GridResult};

/// Descriptive data attached to a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    #[serde(default)]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl GridMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            name: String::new(),
            created_at: now,
            modified_at: now,
            tags: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Default for GridMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete grid document: nine panels in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfiguration {
    pub version: String,
    pub project_id: String,
    pub panels: Vec<Panel>,
    pub metadata: GridMetadata,
}

impl GridConfiguration {
    /// Fresh grid of default panels tagged to `project_id`.
    pub fn new(project_id: impl Into<String>) -> Self {
        let panels = (0..GRID_ROWS)
            .flat_map(|row| (0..GRID_COLS).map(move |col| Panel::new(row, col)))
            .collect();
        Self {
            version: CONFIG_VERSION.to_string(),
            project_id: project_id.into(),
            panels,
            metadata: GridMetadata::new(),
        }
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panel_mut(&mut self, id: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels
            .iter()
            .find(|p| p.position.row == row && p.position.col == col)
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().map(|p| p.id.as_str())
    }

    /// Checks the structural invariants: exactly nine panels with unique ids.
    pub fn validate(&self) -> GridResult<()> {
        if self.panels.len() != PANEL_COUNT {
            return Err(GridError::InvalidPanelCount {
                expected: PANEL_COUNT,
                found: self.panels.len(),
            });
        }
        let mut seen = HashSet::with_capacity(PANEL_COUNT);
        let mut cells = [false; PANEL_COUNT];
        for panel in &self.panels {
            if !seen.insert(panel.id.as_str()) {
                return Err(GridError::DuplicatePanelId(panel.id.clone()));
            }
            let PanelPosition { row, col } = panel.position;
            let index = panel
                .position
                .index()
                .ok_or_else(|| GridError::InvalidPanelPosition {
                    id: panel.id.clone(),
                    row,
                    col,
                })?;
            if std::mem::replace(&mut cells[index], true) {
                return Err(GridError::DuplicatePanelPosition { row, col });
            }
        }
        Ok(())
    }
}
