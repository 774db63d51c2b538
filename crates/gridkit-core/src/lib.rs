//! # GridKit Core
//!
//! Core types, traits, and utilities for GridKit.
//! Provides the geometry primitives shared by the grid document, the viewport
//! and the preset catalog, together with the observer list every engine uses
//! to publish state changes.

pub mod constants;
pub mod geometry;
pub mod observer;
pub mod types;

pub use geometry::{Bounds, CropRegion, Point, Size, Transform};
pub use observer::{Observers, SubscriptionId};
pub use types::{shared, Listener, Shared};
