//! GridKit Settings Crate
//!
//! Handles editor configuration and the key-value storage used to persist
//! user data such as custom presets.

pub mod config;
pub mod error;
pub mod store;

pub use config::{EditorConfig, GridLayoutSettings, HistorySettings, StorageSettings, ViewportSettings};
pub use error::{SettingsError, SettingsResult};
pub use store::{FileStore, KeyValueStore, MemoryStore};
