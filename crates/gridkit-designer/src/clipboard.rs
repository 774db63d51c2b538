//! Panel clipboard.
//!
//! Holds at most one snapshot of a panel's layers, transform and crop.
//! Pasting reads the snapshot without consuming it, so one copy can be
//! pasted onto many panels.

use gridkit_core::{CropRegion, Transform};
use serde::{Deserialize, Serialize};

use crate::model::{Layer, Panel};

/// Deep copy of the pasteable parts of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelClipboard {
    /// Id of the panel the snapshot was taken from.
    pub source_panel_id: String,
    pub layers: Vec<Layer>,
    pub transform: Transform,
    pub crop: Option<CropRegion>,
}

impl PanelClipboard {
    pub fn from_panel(panel: &Panel) -> Self {
        Self {
            source_panel_id: panel.id.clone(),
            layers: panel.layers.clone(),
            transform: panel.transform,
            crop: panel.crop,
        }
    }

    /// Overwrites `panel`'s layers, transform and crop with a copy of the
    /// snapshot. Annotations, id and position are left alone.
    pub fn apply_to(&self, panel: &mut Panel) {
        panel.layers = self.layers.clone();
        panel.transform = self.transform;
        panel.crop = self.crop;
    }
}
