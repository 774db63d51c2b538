//! Grid document model.
//!
//! [`DocumentModel`] is the single source of truth for grid contents,
//! selection, active tool and clipboard. Every mutator is synchronous and
//! leaves the model in a renderable state: an id that matches nothing is a
//! no-op reported through the return value (`false` / `None`), never a panic.
//! Stale ids are expected, e.g. a deferred UI callback firing after the grid
//! was reloaded.
//!
//! Observers registered with [`DocumentModel::subscribe`] receive the full
//! [`DocumentState`] after every change.

use gridkit_core::constants::PANEL_COUNT;
use gridkit_core::{CropRegion, Observers, SubscriptionId, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::clipboard::PanelClipboard;
use crate::error::GridResult;
use crate::model::{Annotation, BlendMode, GridConfiguration, Layer, Panel};
use crate::selection_manager::PanelSelection;

/// Editing tool currently active in the grid editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Crop,
    Rotate,
    Scale,
    Annotate,
    Text,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::Select => "select",
            Tool::Pan => "pan",
            Tool::Crop => "crop",
            Tool::Rotate => "rotate",
            Tool::Scale => "scale",
            Tool::Annotate => "annotate",
            Tool::Text => "text",
        };
        f.write_str(name)
    }
}

/// Everything the document model owns. Selection, tool and clipboard are
/// session state and are not part of the exported configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub configuration: GridConfiguration,
    pub selection: PanelSelection,
    pub active_tool: Tool,
    pub clipboard: Option<PanelClipboard>,
}

/// Grid document with selection, clipboard and change notification.
#[derive(Debug)]
pub struct DocumentModel {
    state: DocumentState,
    observers: Observers<DocumentState>,
}

impl DocumentModel {
    /// Creates a model holding a fresh grid for `project_id`.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            state: DocumentState {
                configuration: GridConfiguration::new(project_id),
                selection: PanelSelection::new(),
                active_tool: Tool::default(),
                clipboard: None,
            },
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn configuration(&self) -> &GridConfiguration {
        &self.state.configuration
    }

    // ------------------------------------------------------------------
    // Configuration lifecycle
    // ------------------------------------------------------------------

    /// Replaces the grid with nine default panels tagged to `project_id`
    /// and clears selection and clipboard.
    pub fn reset_configuration(&mut self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        debug!("resetting grid configuration for project {}", project_id);
        self.state.configuration = GridConfiguration::new(project_id);
        self.state.selection.clear();
        self.state.clipboard = None;
        self.notify();
    }

    /// Replaces the grid wholesale.
    ///
    /// The configuration must hold nine panels with unique ids; otherwise the
    /// model is left untouched and the validation error is returned.
    /// Selection entries that no longer name a panel are dropped.
    pub fn load_configuration(&mut self, configuration: GridConfiguration) -> GridResult<()> {
        configuration.validate()?;
        debug!(
            "loading grid configuration {} (version {})",
            configuration.project_id, configuration.version
        );
        self.state.configuration = configuration;
        let remaining: Vec<String> = self
            .state
            .selection
            .ids()
            .iter()
            .filter(|id| self.state.configuration.panel(id).is_some())
            .cloned()
            .collect();
        self.state
            .selection
            .select_many(remaining.iter().map(String::as_str));
        self.notify();
        Ok(())
    }

    /// Deep, caller-owned snapshot of the grid.
    pub fn export_configuration(&self) -> GridConfiguration {
        self.state.configuration.clone()
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.state.configuration.panel(id)
    }

    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.state.configuration.panel_at(row, col)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.state.configuration.panels
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Applies a click on panel `id`: exclusive replaces the selection,
    /// additive appends if not already present. Unknown ids are ignored.
    pub fn select_panel(&mut self, id: &str, additive: bool) -> bool {
        if self.panel(id).is_none() {
            trace!("select_panel: unknown panel {}", id);
            return false;
        }
        if self.state.selection.select(id, additive) {
            self.notify();
        }
        true
    }

    /// Empties the selection. Idempotent.
    pub fn deselect_all(&mut self) {
        if self.state.selection.clear() {
            self.notify();
        }
    }

    /// Selects every panel in grid order.
    pub fn select_all(&mut self) {
        let ids: Vec<String> = self.state.configuration.panel_ids().map(String::from).collect();
        self.state.selection.select_many(ids.iter().map(String::as_str));
        self.notify();
    }

    /// Selected ids in click order.
    pub fn selected_panel_ids(&self) -> &[String] {
        self.state.selection.ids()
    }

    pub fn selected_panels(&self) -> Vec<&Panel> {
        self.state
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.panel(id))
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.selection.contains(id)
    }

    // ------------------------------------------------------------------
    // Panel geometry
    // ------------------------------------------------------------------

    pub fn update_panel_transform(&mut self, id: &str, transform: Transform) -> bool {
        self.edit_panel(id, |panel| {
            panel.transform = transform;
            true
        })
    }

    pub fn update_panel_crop(&mut self, id: &str, crop: Option<CropRegion>) -> bool {
        self.edit_panel(id, |panel| {
            panel.crop = crop;
            true
        })
    }

    /// Restores the default transform and removes the crop.
    pub fn reset_panel_transform(&mut self, id: &str) -> bool {
        self.edit_panel(id, |panel| {
            panel.transform = Transform::default();
            panel.crop = None;
            true
        })
    }

    /// Writes a preset's transforms and crops onto the panels, matched by
    /// grid position (row-major). Both slices must hold nine entries.
    pub fn apply_preset_geometry(
        &mut self,
        transforms: &[Transform],
        crops: &[Option<CropRegion>],
    ) -> bool {
        if transforms.len() != PANEL_COUNT || crops.len() != PANEL_COUNT {
            debug!(
                "apply_preset_geometry: expected {} entries, got {}/{}",
                PANEL_COUNT,
                transforms.len(),
                crops.len()
            );
            return false;
        }
        for panel in self.state.configuration.panels.iter_mut() {
            let Some(index) = panel.position.index() else {
                continue;
            };
            if let (Some(transform), Some(crop)) = (transforms.get(index), crops.get(index)) {
                panel.transform = *transform;
                panel.crop = *crop;
            }
        }
        self.state.configuration.metadata.touch();
        self.notify();
        true
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Appends `layer` on top of the panel's stack.
    pub fn add_layer(&mut self, panel_id: &str, layer: Layer) -> bool {
        self.edit_panel(panel_id, |panel| {
            panel.layers.push(layer);
            true
        })
    }

    /// Removes the layer with `layer_id`, returning it.
    pub fn remove_layer(&mut self, panel_id: &str, layer_id: &str) -> Option<Layer> {
        let mut removed = None;
        self.edit_panel(panel_id, |panel| match panel.layer_index(layer_id) {
            Some(index) => {
                removed = Some(panel.layers.remove(index));
                true
            }
            None => false,
        });
        removed
    }

    /// Moves a layer to `new_index`, shifting the others. Indices past the
    /// top are clamped to the top.
    pub fn reorder_layers(&mut self, panel_id: &str, layer_id: &str, new_index: usize) -> bool {
        self.edit_panel(panel_id, |panel| match panel.layer_index(layer_id) {
            Some(index) => {
                let layer = panel.layers.remove(index);
                let target = new_index.min(panel.layers.len());
                panel.layers.insert(target, layer);
                true
            }
            None => false,
        })
    }

    pub fn toggle_layer_visibility(&mut self, panel_id: &str, layer_id: &str) -> bool {
        self.edit_layer(panel_id, layer_id, |layer| layer.visible = !layer.visible)
    }

    pub fn toggle_layer_lock(&mut self, panel_id: &str, layer_id: &str) -> bool {
        self.edit_layer(panel_id, layer_id, |layer| layer.locked = !layer.locked)
    }

    /// Sets opacity, clamped to `0.0..=1.0`.
    pub fn set_layer_opacity(&mut self, panel_id: &str, layer_id: &str, opacity: f64) -> bool {
        self.edit_layer(panel_id, layer_id, |layer| {
            layer.opacity = opacity.clamp(0.0, 1.0)
        })
    }

    pub fn set_layer_blend_mode(
        &mut self,
        panel_id: &str,
        layer_id: &str,
        blend_mode: BlendMode,
    ) -> bool {
        self.edit_layer(panel_id, layer_id, |layer| layer.blend_mode = blend_mode)
    }

    pub fn rename_layer(&mut self, panel_id: &str, layer_id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.edit_layer(panel_id, layer_id, |layer| layer.name = name)
    }

    /// Replaces a panel's whole layer stack.
    pub fn set_layers(&mut self, panel_id: &str, layers: Vec<Layer>) -> bool {
        self.edit_panel(panel_id, |panel| {
            panel.layers = layers;
            true
        })
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    pub fn add_annotation(&mut self, panel_id: &str, annotation: Annotation) -> bool {
        self.edit_panel(panel_id, |panel| {
            panel.annotations.push(annotation);
            true
        })
    }

    pub fn remove_annotation(&mut self, panel_id: &str, annotation_id: &str) -> bool {
        self.edit_panel(panel_id, |panel| {
            let before = panel.annotations.len();
            panel.annotations.retain(|a| a.id != annotation_id);
            panel.annotations.len() != before
        })
    }

    pub fn clear_annotations(&mut self, panel_id: &str) -> bool {
        self.edit_panel(panel_id, |panel| {
            let had_any = !panel.annotations.is_empty();
            panel.annotations.clear();
            had_any
        })
    }

    pub fn set_annotations(&mut self, panel_id: &str, annotations: Vec<Annotation>) -> bool {
        self.edit_panel(panel_id, |panel| {
            panel.annotations = annotations;
            true
        })
    }

    // ------------------------------------------------------------------
    // Tool
    // ------------------------------------------------------------------

    pub fn active_tool(&self) -> Tool {
        self.state.active_tool
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        if self.state.active_tool != tool {
            debug!("active tool: {}", tool);
            self.state.active_tool = tool;
            self.notify();
        }
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Captures panel `id` into the clipboard, replacing any prior content.
    pub fn copy_panel(&mut self, id: &str) -> bool {
        let Some(panel) = self.state.configuration.panel(id) else {
            trace!("copy_panel: unknown panel {}", id);
            return false;
        };
        self.state.clipboard = Some(PanelClipboard::from_panel(panel));
        debug!("copied panel {} to clipboard", id);
        self.notify();
        true
    }

    /// Pastes the clipboard onto `target_id`. The clipboard is kept, so the
    /// same snapshot can be pasted repeatedly.
    pub fn paste_panel(&mut self, target_id: &str) -> bool {
        let Some(clipboard) = self.state.clipboard.clone() else {
            trace!("paste_panel: clipboard empty");
            return false;
        };
        self.edit_panel(target_id, |panel| {
            clipboard.apply_to(panel);
            true
        })
    }

    /// Writes a previously captured snapshot back onto panel `id` without
    /// touching the clipboard.
    pub fn restore_panel_snapshot(&mut self, id: &str, snapshot: &PanelClipboard) -> bool {
        self.edit_panel(id, |panel| {
            snapshot.apply_to(panel);
            true
        })
    }

    pub fn clipboard(&self) -> Option<&PanelClipboard> {
        self.state.clipboard.as_ref()
    }

    pub fn clear_clipboard(&mut self) {
        if self.state.clipboard.take().is_some() {
            self.notify();
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Registers a listener; it is called immediately with the current state
    /// and after every subsequent change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&DocumentState) + 'static,
    {
        self.observers.subscribe(&self.state, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self) {
        self.observers.notify(&self.state);
    }

    /// Runs `edit` on panel `id`. The closure reports whether it changed
    /// anything; only then is the document touched and observers notified.
    fn edit_panel<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Panel) -> bool,
    {
        let Some(panel) = self.state.configuration.panel_mut(id) else {
            trace!("unknown panel {}", id);
            return false;
        };
        if !edit(panel) {
            return false;
        }
        self.state.configuration.metadata.touch();
        self.notify();
        true
    }

    fn edit_layer<F>(&mut self, panel_id: &str, layer_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Layer),
    {
        self.edit_panel(panel_id, |panel| match panel.layer_mut(layer_id) {
            Some(layer) => {
                edit(layer);
                true
            }
            None => false,
        })
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new("default")
    }
}
