//! Grid editor state for UI integration.
//!
//! Bundles the document, viewport, history and preset catalog, and pairs
//! document edits with history records: every recorded mutator captures the
//! affected panel fragment before and after the change and pushes an
//! [`Operation`] carrying both as JSON. Undo and redo write those fragments
//! back through the document, so observers see ordinary document changes.
//!
//! Selection, tool and camera changes are not recorded.

use gridkit_core::{CropRegion, Point, Transform};
use gridkit_settings::EditorConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::clipboard::PanelClipboard;
use crate::document::DocumentModel;
use crate::error::{GridError, GridResult};
use crate::history::{Operation, OperationType, UndoRedoManager};
use crate::layout::GridLayout;
use crate::model::{Annotation, GridConfiguration, Layer, Panel};
use crate::presets::{Preset, PresetCatalog};
use crate::serialization::GridFile;
use crate::viewport::Viewport;

/// Transforms and crops of all nine panels, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GridGeometry {
    panel_transforms: Vec<Transform>,
    panel_crops: Vec<Option<CropRegion>>,
}

impl GridGeometry {
    fn capture(configuration: &GridConfiguration) -> Self {
        let preset = Preset::from_configuration("", "", configuration);
        Self {
            panel_transforms: preset.panel_transforms,
            panel_crops: preset.panel_crops,
        }
    }
}

/// Editor state manager
#[derive(Debug)]
pub struct GridEditorState {
    document: DocumentModel,
    viewport: Viewport,
    history: UndoRedoManager,
    presets: PresetCatalog,
    layout: GridLayout,
    pub current_file_path: Option<PathBuf>,
    pub is_modified: bool,
}

impl GridEditorState {
    /// Creates editor state with default settings.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::from_config(project_id, &EditorConfig::default())
    }

    pub fn from_config(project_id: impl Into<String>, config: &EditorConfig) -> Self {
        Self {
            document: DocumentModel::new(project_id),
            viewport: Viewport::from_settings(&config.viewport),
            history: UndoRedoManager::new(config.history.max_stack_size),
            presets: PresetCatalog::new(),
            layout: GridLayout::from(&config.grid),
            current_file_path: None,
            is_modified: false,
        }
    }

    /// Replaces the preset catalog, e.g. with one restored from storage.
    pub fn with_presets(mut self, presets: PresetCatalog) -> Self {
        self.presets = presets;
        self
    }

    pub fn document(&self) -> &DocumentModel {
        &self.document
    }

    /// Direct document access. Changes made here are not recorded.
    pub fn document_mut(&mut self) -> &mut DocumentModel {
        &mut self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut UndoRedoManager {
        &mut self.history
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetCatalog {
        &mut self.presets
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    // ------------------------------------------------------------------
    // Recorded edits
    // ------------------------------------------------------------------

    pub fn set_panel_transform(&mut self, panel_id: &str, transform: Transform) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::Transform,
            panel_id,
            "Transform panel",
            |panel| panel.transform,
            |doc| doc.update_panel_transform(panel_id, transform),
        )
    }

    pub fn set_panel_crop(&mut self, panel_id: &str, crop: Option<CropRegion>) -> GridResult<bool> {
        let description = if crop.is_some() { "Crop panel" } else { "Remove crop" };
        self.record_panel_edit(
            OperationType::Crop,
            panel_id,
            description,
            |panel| panel.crop,
            |doc| doc.update_panel_crop(panel_id, crop),
        )
    }

    pub fn add_layer(&mut self, panel_id: &str, layer: Layer) -> GridResult<bool> {
        let description = format!("Add layer '{}'", layer.name);
        self.record_panel_edit(
            OperationType::LayerAdd,
            panel_id,
            description,
            |panel| panel.layers.clone(),
            |doc| doc.add_layer(panel_id, layer),
        )
    }

    pub fn remove_layer(&mut self, panel_id: &str, layer_id: &str) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::LayerRemove,
            panel_id,
            format!("Remove layer {}", layer_id),
            |panel| panel.layers.clone(),
            |doc| doc.remove_layer(panel_id, layer_id).is_some(),
        )
    }

    pub fn reorder_layer(
        &mut self,
        panel_id: &str,
        layer_id: &str,
        new_index: usize,
    ) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::LayerReorder,
            panel_id,
            format!("Move layer {} to {}", layer_id, new_index),
            |panel| panel.layers.clone(),
            |doc| doc.reorder_layers(panel_id, layer_id, new_index),
        )
    }

    pub fn set_layer_opacity(
        &mut self,
        panel_id: &str,
        layer_id: &str,
        opacity: f64,
    ) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::LayerUpdate,
            panel_id,
            format!("Set opacity of {}", layer_id),
            |panel| panel.layers.clone(),
            |doc| doc.set_layer_opacity(panel_id, layer_id, opacity),
        )
    }

    pub fn toggle_layer_visibility(&mut self, panel_id: &str, layer_id: &str) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::LayerUpdate,
            panel_id,
            format!("Toggle visibility of {}", layer_id),
            |panel| panel.layers.clone(),
            |doc| doc.toggle_layer_visibility(panel_id, layer_id),
        )
    }

    pub fn add_annotation(&mut self, panel_id: &str, annotation: Annotation) -> GridResult<bool> {
        self.record_panel_edit(
            OperationType::Annotation,
            panel_id,
            "Annotate panel",
            |panel| panel.annotations.clone(),
            |doc| doc.add_annotation(panel_id, annotation),
        )
    }

    /// Copies panel `panel_id` to the clipboard. Not recorded.
    pub fn copy_panel(&mut self, panel_id: &str) -> bool {
        self.document.copy_panel(panel_id)
    }

    /// Pastes the clipboard onto `target_id`. Returns `Ok(false)` when the
    /// clipboard is empty or the panel is unknown.
    pub fn paste_panel(&mut self, target_id: &str) -> GridResult<bool> {
        let source = match self.document.clipboard() {
            Some(clipboard) => clipboard.source_panel_id.clone(),
            None => return Ok(false),
        };
        self.record_panel_edit(
            OperationType::Paste,
            target_id,
            format!("Paste {} onto {}", source, target_id),
            PanelClipboard::from_panel,
            |doc| doc.paste_panel(target_id),
        )
    }

    /// Applies preset `preset_id` to every panel and selects it in the
    /// catalog. Unknown ids return `Ok(false)`.
    pub fn apply_preset(&mut self, preset_id: &str) -> GridResult<bool> {
        let Some(preset) = self.presets.find(preset_id).cloned() else {
            warn!("apply_preset: unknown preset {}", preset_id);
            return Ok(false);
        };
        let before = GridGeometry::capture(self.document.configuration());
        if !self
            .document
            .apply_preset_geometry(&preset.panel_transforms, &preset.panel_crops)
        {
            return Err(GridError::InvalidPreset(preset.id));
        }
        let after = GridGeometry::capture(self.document.configuration());
        self.push(Operation::new(
            OperationType::PresetApply,
            format!("Apply preset '{}'", preset.name),
            preset.id.clone(),
            serde_json::to_value(before)?,
            serde_json::to_value(after)?,
        ));
        self.presets.select_preset(Some(&preset.id));
        Ok(true)
    }

    /// Replaces the whole grid. Recorded, so the previous grid can be
    /// restored with undo.
    pub fn replace_configuration(&mut self, configuration: GridConfiguration) -> GridResult<()> {
        let before = serde_json::to_value(self.document.configuration())?;
        let after = serde_json::to_value(&configuration)?;
        let target = configuration.project_id.clone();
        self.document.load_configuration(configuration)?;
        self.push(Operation::new(
            OperationType::Configuration,
            "Replace grid",
            target,
            before,
            after,
        ));
        Ok(())
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Reverts the newest recorded edit. `Ok(false)` when there is none.
    /// A payload that fails to apply leaves both stacks untouched.
    pub fn undo(&mut self) -> GridResult<bool> {
        let Some(op) = self.history.undo_stack().last().cloned() else {
            return Ok(false);
        };
        debug!("undo: {}", op);
        self.apply_payload(&op, &op.before)?;
        self.history.undo();
        self.is_modified = true;
        Ok(true)
    }

    /// Re-applies the newest undone edit. `Ok(false)` when there is none.
    pub fn redo(&mut self) -> GridResult<bool> {
        let Some(op) = self.history.redo_stack().last().cloned() else {
            return Ok(false);
        };
        debug!("redo: {}", op);
        self.apply_payload(&op, &op.after)?;
        self.history.redo();
        self.is_modified = true;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    /// Frames panel `panel_id` in focus mode. Unknown ids return `false`
    /// and leave the camera alone. Selection is not touched.
    pub fn focus_panel(&mut self, panel_id: &str) -> bool {
        let bounds = self
            .document
            .panel(panel_id)
            .and_then(|panel| self.layout.cell_bounds(panel.position));
        match bounds {
            Some(bounds) => self.viewport.focus_panel(Some(panel_id), Some(bounds)),
            None => false,
        }
    }

    pub fn exit_focus_mode(&mut self) {
        self.viewport.exit_focus_mode();
    }

    /// Fits the whole grid into the viewport.
    pub fn fit_grid_to_view(&mut self) -> bool {
        self.viewport.fit_to_view(self.layout.grid_bounds())
    }

    // ------------------------------------------------------------------
    // File I/O
    // ------------------------------------------------------------------

    /// Saves the grid and camera to `path` and remembers the path.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> GridResult<()> {
        let path = path.as_ref();
        GridFile::new(self.document.export_configuration())
            .with_viewport(&self.viewport)
            .save_to_file(path)?;
        self.current_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Loads a grid file, replacing the document and restoring the saved
    /// camera. History is cleared.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> GridResult<()> {
        let path = path.as_ref();
        let file = GridFile::load_from_file(path)?;
        self.document.load_configuration(file.configuration)?;
        if let Some(camera) = file.viewport {
            self.viewport.set_zoom(camera.zoom);
            self.viewport
                .set_pan(Point::new(camera.pan_x, camera.pan_y));
        }
        self.viewport.exit_focus_mode();
        self.history.clear_history();
        self.current_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Captures a fragment of panel `panel_id`, runs `edit`, captures again
    /// and records the pair. Nothing is recorded when the panel is unknown
    /// or `edit` reports no change.
    fn record_panel_edit<T, C, E>(
        &mut self,
        op_type: OperationType,
        panel_id: &str,
        description: impl Into<String>,
        capture: C,
        edit: E,
    ) -> GridResult<bool>
    where
        T: Serialize,
        C: Fn(&Panel) -> T,
        E: FnOnce(&mut DocumentModel) -> bool,
    {
        let Some(before) = self.document.panel(panel_id).map(&capture) else {
            return Ok(false);
        };
        if !edit(&mut self.document) {
            return Ok(false);
        }
        let Some(after) = self.document.panel(panel_id).map(&capture) else {
            return Ok(false);
        };
        self.push(Operation::new(
            op_type,
            description,
            panel_id,
            serde_json::to_value(before)?,
            serde_json::to_value(after)?,
        ));
        Ok(true)
    }

    fn push(&mut self, op: Operation) {
        self.history.push_operation(op);
        self.is_modified = true;
    }

    /// Writes one side of a recorded operation back into the document.
    fn apply_payload(&mut self, op: &Operation, payload: &Value) -> GridResult<()> {
        let target = op.target_id.as_str();
        let applied = match op.op_type {
            OperationType::Transform => {
                let transform: Transform = serde_json::from_value(payload.clone())?;
                self.document.update_panel_transform(target, transform)
            }
            OperationType::Crop => {
                let crop: Option<CropRegion> = serde_json::from_value(payload.clone())?;
                self.document.update_panel_crop(target, crop)
            }
            OperationType::LayerAdd
            | OperationType::LayerRemove
            | OperationType::LayerReorder
            | OperationType::LayerUpdate => {
                let layers: Vec<Layer> = serde_json::from_value(payload.clone())?;
                self.document.set_layers(target, layers)
            }
            OperationType::Annotation => {
                let annotations: Vec<Annotation> = serde_json::from_value(payload.clone())?;
                self.document.set_annotations(target, annotations)
            }
            OperationType::Paste => {
                let snapshot: PanelClipboard = serde_json::from_value(payload.clone())?;
                self.document.restore_panel_snapshot(target, &snapshot)
            }
            OperationType::PresetApply => {
                let geometry: GridGeometry = serde_json::from_value(payload.clone())?;
                self.document
                    .apply_preset_geometry(&geometry.panel_transforms, &geometry.panel_crops)
            }
            OperationType::Configuration => {
                let configuration: GridConfiguration = serde_json::from_value(payload.clone())?;
                self.document.load_configuration(configuration)?;
                true
            }
        };
        if !applied {
            warn!("history payload for {} no longer applies", op);
        }
        Ok(())
    }
}

impl Default for GridEditorState {
    fn default() -> Self {
        Self::new("default")
    }
}
