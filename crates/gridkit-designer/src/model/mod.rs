//! Grid document data model.
//!
//! Plain serde records: a [`GridConfiguration`] holds nine [`Panel`]s, each
//! with a transform, an optional crop, an ordered [`Layer`] stack and a list
//! of [`Annotation`]s. No cyclic references; safe for JSON round-trips.

mod annotation;
mod grid;
mod layer;
mod panel;

pub use annotation::{Annotation, AnnotationKind};
pub use grid::{GridConfiguration, GridMetadata};
pub use layer::{BlendMode, Layer, LayerContent, LayerType};
pub use panel::{Panel, PanelPosition};
