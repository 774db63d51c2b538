//! # GridKit Designer
//!
//! Editing core for a 3x3 image grid: nine independently transformable,
//! croppable, layered panels viewed through a zoomable, pannable camera.
//!
//! ## Core Components
//!
//! - **Document**: grid contents, panel selection, active tool, clipboard
//! - **Viewport**: zoom, pan, fit-to-view and single-panel focus, with exact
//!   screen/canvas coordinate mapping
//! - **History**: bounded undo/redo stacks of opaque operations
//! - **Presets**: built-in and custom panel arrangements, persisted through
//!   a key-value store
//!
//! Each engine owns its state and publishes it to subscribers after every
//! change. The engines do not know about each other; [`GridEditorState`]
//! pairs document edits with history records.
//!
//! ## Architecture
//!
//! ```text
//! GridEditorState
//!   ├── DocumentModel   (GridConfiguration, selection, clipboard)
//!   ├── Viewport        (camera)
//!   ├── UndoRedoManager (operations)
//!   └── PresetCatalog   ──> PresetPersistence ──> KeyValueStore
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use gridkit_designer::{GridEditorState, Transform};
//!
//! let mut editor = GridEditorState::new("my-project");
//! editor
//!     .set_panel_transform("panel-1-1", Transform::scaled(1.5))
//!     .unwrap();
//! assert!(editor.can_undo());
//!
//! editor.undo().unwrap();
//! assert!(editor.document().panel("panel-1-1").unwrap().transform.is_identity());
//! ```

pub mod clipboard;
pub mod designer_state;
pub mod document;
pub mod error;
pub mod history;
pub mod layout;
pub mod model;
pub mod preset_persistence;
pub mod presets;
pub mod selection_manager;
pub mod serialization;
pub mod viewport;

pub use clipboard::PanelClipboard;
pub use designer_state::GridEditorState;
pub use document::{DocumentModel, DocumentState, Tool};
pub use error::{GridError, GridResult};
pub use history::{format_operation, HistoryState, Operation, OperationType, UndoRedoManager};
pub use layout::GridLayout;
pub use model::{
    Annotation, AnnotationKind, BlendMode, GridConfiguration, GridMetadata, Layer, LayerContent,
    LayerType, Panel, PanelPosition,
};
pub use preset_persistence::{PresetPersistence, PRESETS_STORAGE_KEY};
pub use presets::{validate_preset, Preset, PresetCatalog, PresetCatalogState};
pub use selection_manager::PanelSelection;
pub use serialization::{GridFile, ViewportSnapshot};
pub use viewport::{Viewport, ViewportLimits, ViewportState};

pub use gridkit_core::{Bounds, CropRegion, Point, Size, SubscriptionId, Transform};
