//! # GridKit
//!
//! Headless editing core for a 3x3 image grid compositor.
//!
//! ## Architecture
//!
//! GridKit is organized as a workspace with multiple crates:
//!
//! 1. **gridkit-core** - Geometry, constants, observer lists
//! 2. **gridkit-settings** - Editor configuration and key-value storage
//! 3. **gridkit-designer** - Document model, viewport, undo/redo history,
//!    preset catalog, grid files
//! 4. **gridkit** - Command-line shell over the designer

pub mod cli;

pub use gridkit_core as core;
pub use gridkit_designer as designer;
pub use gridkit_settings as settings;

pub use gridkit_designer::{
    DocumentModel, GridConfiguration, GridEditorState, GridError, Operation, OperationType,
    Preset, PresetCatalog, PresetPersistence, UndoRedoManager, Viewport,
};
pub use gridkit_settings::{EditorConfig, FileStore, KeyValueStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Initialize logging with the default configuration
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default())
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - stderr output, so stdout stays free for command results
/// - RUST_LOG environment variable support (default level INFO)
/// - pretty or JSON formatting
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
