//! # Grid Preset Catalog
//!
//! Named bundles of nine panel transforms and nine crops, applied wholesale
//! to give a grid its visual starting point.
//!
//! Features:
//! - Built-in presets recreated from code on every start (never persisted,
//!   never deletable)
//! - Custom presets created by the user, with generated ids
//! - A selected preset id, cleared when its preset is deleted
//! - Structural validation (`validate_preset`)
//!
//! Persistence lives in [`crate::preset_persistence`]; the catalog itself is
//! storage-agnostic.

use chrono::Utc;
use gridkit_core::constants::PANEL_COUNT;
use gridkit_core::{CropRegion, Observers, SubscriptionId, Transform};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{GridError, GridResult};
use crate::model::GridConfiguration;

/// Nine transforms and nine crops, in row-major panel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Encoded preview image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub panel_transforms: Vec<Transform>,
    pub panel_crops: Vec<Option<CropRegion>>,
}

impl Preset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        panel_transforms: Vec<Transform>,
        panel_crops: Vec<Option<CropRegion>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            thumbnail: None,
            panel_transforms,
            panel_crops,
        }
    }

    /// Captures the transforms and crops of `configuration`. The id is left
    /// empty; the catalog assigns one on insertion.
    pub fn from_configuration(
        name: impl Into<String>,
        description: impl Into<String>,
        configuration: &GridConfiguration,
    ) -> Self {
        let mut transforms = vec![Transform::default(); PANEL_COUNT];
        let mut crops = vec![None; PANEL_COUNT];
        for panel in &configuration.panels {
            if let Some(index) = panel.position.index() {
                transforms[index] = panel.transform;
                crops[index] = panel.crop;
            }
        }
        Self::new("", name, description, transforms, crops)
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// Describes the first structural problem of `preset`, if any.
fn preset_problem(preset: &Preset) -> Option<String> {
    if preset.id.trim().is_empty() {
        return Some("id is empty".to_string());
    }
    if preset.name.trim().is_empty() {
        return Some("name is empty".to_string());
    }
    if preset.panel_transforms.len() != PANEL_COUNT {
        return Some(format!(
            "expected {} transforms, found {}",
            PANEL_COUNT,
            preset.panel_transforms.len()
        ));
    }
    if preset.panel_crops.len() != PANEL_COUNT {
        return Some(format!(
            "expected {} crops, found {}",
            PANEL_COUNT,
            preset.panel_crops.len()
        ));
    }
    None
}

/// Structural check: non-empty id and name, nine transforms, nine crops.
/// Numeric ranges are not checked.
pub fn validate_preset(preset: &Preset) -> bool {
    preset_problem(preset).is_none()
}

/// `custom-{unix millis}-{8 hex chars}`
fn generate_preset_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("custom-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

fn builtin_presets() -> Vec<Preset> {
    let identity = vec![Transform::default(); PANEL_COUNT];
    let no_crop = vec![None; PANEL_COUNT];

    let widescreen = CropRegion::new(0.0, 0.125, 1.0, 0.75);
    let cinematic_transforms = (0..PANEL_COUNT)
        .map(|i| {
            if i == 4 {
                Transform::scaled(1.1)
            } else {
                Transform::default()
            }
        })
        .collect();

    const COMIC_TILT: [f64; PANEL_COUNT] = [-2.0, 1.5, -1.0, 1.0, 0.0, -1.5, 2.0, -1.0, 1.5];
    let comic_transforms = COMIC_TILT
        .iter()
        .map(|&deg| Transform::scaled(0.95).with_rotation(deg))
        .collect();

    let portrait = CropRegion::new(0.2, 0.0, 0.6, 1.0);
    let landscape = CropRegion::new(0.0, 0.2, 1.0, 0.6);

    vec![
        Preset::new(
            "default",
            "Default",
            "Every panel untransformed and uncropped",
            identity.clone(),
            no_crop,
        ),
        Preset::new(
            "cinematic",
            "Cinematic",
            "Letterboxed widescreen panels with an emphasized center",
            cinematic_transforms,
            vec![Some(widescreen); PANEL_COUNT],
        ),
        Preset::new(
            "comic-book",
            "Comic Book",
            "Slightly inset, alternately tilted panels",
            comic_transforms,
            vec![None; PANEL_COUNT],
        ),
        Preset::new(
            "portrait",
            "Portrait",
            "Tall center crops for portrait subjects",
            identity.clone(),
            vec![Some(portrait); PANEL_COUNT],
        ),
        Preset::new(
            "landscape",
            "Landscape",
            "Wide horizontal band crops",
            identity,
            vec![Some(landscape); PANEL_COUNT],
        ),
    ]
}

/// The user-owned part of the catalog: exactly what gets persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetCatalogState {
    pub custom_presets: Vec<Preset>,
    pub selected_preset_id: Option<String>,
}

/// Registry of built-in and custom presets.
#[derive(Debug)]
pub struct PresetCatalog {
    builtins: Vec<Preset>,
    state: PresetCatalogState,
    observers: Observers<PresetCatalogState>,
}

impl PresetCatalog {
    /// Catalog holding only the built-ins.
    pub fn new() -> Self {
        Self {
            builtins: builtin_presets(),
            state: PresetCatalogState::default(),
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> &PresetCatalogState {
        &self.state
    }

    /// Replaces the custom presets and selection, e.g. from storage.
    /// Custom presets that fail validation or reuse a built-in id are
    /// dropped; a selection naming no preset is cleared.
    pub fn restore(&mut self, state: PresetCatalogState) {
        let PresetCatalogState {
            custom_presets,
            selected_preset_id,
        } = state;
        let mut kept = Vec::with_capacity(custom_presets.len());
        for preset in custom_presets {
            if let Some(problem) = preset_problem(&preset) {
                warn!("dropping stored preset '{}': {}", preset.name, problem);
            } else if self.is_builtin(&preset.id) {
                warn!("dropping stored preset shadowing built-in '{}'", preset.id);
            } else {
                kept.push(preset);
            }
        }
        self.state.custom_presets = kept;
        let selected = selected_preset_id.filter(|id| self.find(id).is_some());
        self.state.selected_preset_id = selected;
        debug!(
            "restored {} custom presets",
            self.state.custom_presets.len()
        );
        self.notify();
    }

    /// Built-ins first (stable order), then custom presets in insertion
    /// order.
    pub fn all_presets(&self) -> Vec<&Preset> {
        self.builtins
            .iter()
            .chain(self.state.custom_presets.iter())
            .collect()
    }

    pub fn builtin_presets(&self) -> &[Preset] {
        &self.builtins
    }

    pub fn custom_presets(&self) -> &[Preset] {
        &self.state.custom_presets
    }

    pub fn find(&self, id: &str) -> Option<&Preset> {
        self.builtins
            .iter()
            .chain(self.state.custom_presets.iter())
            .find(|p| p.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        let needle = name.to_lowercase();
        self.builtins
            .iter()
            .chain(self.state.custom_presets.iter())
            .find(|p| p.name.to_lowercase() == needle)
    }

    pub fn is_builtin(&self, id: &str) -> bool {
        self.builtins.iter().any(|p| p.id == id)
    }

    /// Inserts a copy of `preset` under a freshly generated id and returns
    /// that id. The incoming id is ignored. Structurally invalid presets are
    /// rejected and nothing is added.
    pub fn add_custom_preset(&mut self, preset: Preset) -> GridResult<String> {
        let mut preset = preset;
        preset.id = generate_preset_id();
        if let Some(problem) = preset_problem(&preset) {
            warn!("rejecting custom preset '{}': {}", preset.name, problem);
            return Err(GridError::InvalidPreset(problem));
        }
        let id = preset.id.clone();
        debug!("added custom preset {} ({})", preset.name, id);
        self.state.custom_presets.push(preset);
        self.notify();
        Ok(id)
    }

    /// Replaces the contents of custom preset `id`, keeping its id.
    pub fn update_custom_preset(&mut self, id: &str, preset: Preset) -> GridResult<()> {
        let mut preset = preset;
        preset.id = id.to_string();
        if let Some(problem) = preset_problem(&preset) {
            return Err(GridError::InvalidPreset(problem));
        }
        let slot = self
            .state
            .custom_presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| GridError::PresetNotFound(id.to_string()))?;
        *slot = preset;
        self.notify();
        Ok(())
    }

    /// Deletes a custom preset. Built-ins and unknown ids return `false`.
    pub fn delete_custom_preset(&mut self, id: &str) -> bool {
        if self.is_builtin(id) {
            warn!("cannot delete built-in preset '{}'", id);
            return false;
        }
        let before = self.state.custom_presets.len();
        self.state.custom_presets.retain(|p| p.id != id);
        if self.state.custom_presets.len() == before {
            return false;
        }
        if self.state.selected_preset_id.as_deref() == Some(id) {
            self.state.selected_preset_id = None;
        }
        debug!("deleted custom preset {}", id);
        self.notify();
        true
    }

    /// Selects a preset by id, or clears the selection with `None`.
    /// Unknown ids leave the selection unchanged and return `false`.
    pub fn select_preset(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.find(id).is_none() => false,
            _ => {
                self.state.selected_preset_id = id.map(String::from);
                self.notify();
                true
            }
        }
    }

    pub fn selected_preset_id(&self) -> Option<&str> {
        self.state.selected_preset_id.as_deref()
    }

    pub fn selected_preset(&self) -> Option<&Preset> {
        self.selected_preset_id().and_then(|id| self.find(id))
    }

    pub fn validate_preset(&self, preset: &Preset) -> bool {
        validate_preset(preset)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PresetCatalogState) + 'static,
    {
        self.observers.subscribe(&self.state, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self) {
        self.observers.notify(&self.state);
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new()
    }
}
