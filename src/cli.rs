//! Command-line shell.
//!
//! Every command builds a [`GridEditorState`] from the editor configuration
//! and a preset catalog persisted in the configured storage directory.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gridkit_core::shared;
use gridkit_designer::serialization::{self, GridFile};
use gridkit_designer::{GridEditorState, Preset, PresetCatalog, PresetPersistence};
use gridkit_settings::{EditorConfig, FileStore};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "gridkit",
    about = "Headless 3x3 grid compositor: create, restyle and inspect grid files",
    version
)]
pub struct Cli {
    /// Editor configuration file (JSON or TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty grid.
    New(NewArgs),

    /// Apply a preset to an existing grid file.
    #[command(name = "apply-preset")]
    ApplyPreset(ApplyPresetArgs),

    /// Manage the preset catalog.
    #[command(subcommand)]
    Presets(PresetCommands),

    /// Summarize a grid file.
    Inspect(InspectArgs),

    /// Print version and build date.
    Version,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    #[arg(long, default_value = "untitled")]
    pub project: String,

    /// Preset applied to the fresh grid
    #[arg(long)]
    pub preset: Option<String>,

    /// Output file; JSON goes to stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ApplyPresetArgs {
    pub file: PathBuf,

    #[arg(long)]
    pub preset: String,

    /// Output file; the input is rewritten when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum PresetCommands {
    /// List built-in and custom presets.
    List,

    /// Capture a grid file's panel geometry as a custom preset.
    Save {
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a custom preset.
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    pub file: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::New(args) => run_new(&config, args),
        Commands::ApplyPreset(args) => run_apply_preset(&config, args),
        Commands::Presets(command) => run_presets(&config, command),
        Commands::Inspect(args) => run_inspect(&config, args),
        Commands::Version => {
            println!("gridkit {} (built {})", crate::VERSION, crate::BUILD_DATE);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match EditorConfig::default_path() {
            Some(path) => EditorConfig::load_or_default(&path)?,
            None => EditorConfig::default(),
        },
    };
    config.validate().context("Invalid editor configuration")?;
    Ok(config)
}

/// Preset catalog restored from, and written back to, the storage directory.
fn open_catalog(config: &EditorConfig) -> Result<PresetCatalog> {
    let directory = config.storage.resolve_directory()?;
    let store = FileStore::open(&directory)
        .with_context(|| format!("Failed to open storage {}", directory.display()))?;
    let persistence = PresetPersistence::new(shared(store));
    let (catalog, _subscription) = persistence.open_catalog();
    Ok(catalog)
}

fn editor(project: &str, config: &EditorConfig) -> Result<GridEditorState> {
    Ok(GridEditorState::from_config(project, config).with_presets(open_catalog(config)?))
}

fn apply_preset(state: &mut GridEditorState, preset: &str) -> Result<()> {
    let id = match state.presets().find(preset) {
        Some(found) => found.id.clone(),
        None => match state.presets().find_by_name(preset) {
            Some(found) => found.id.clone(),
            None => bail!("Unknown preset: {}", preset),
        },
    };
    state.apply_preset(&id)?;
    info!("applied preset {}", id);
    Ok(())
}

fn run_new(config: &EditorConfig, args: NewArgs) -> Result<()> {
    let mut state = editor(&args.project, config)?;
    if let Some(preset) = &args.preset {
        apply_preset(&mut state, preset)?;
    }
    state.fit_grid_to_view();

    match &args.out {
        Some(out) => {
            state.save_to_file(out)?;
            info!("wrote {}", out.display());
        }
        None => println!(
            "{}",
            serialization::to_json(state.document().configuration())?
        ),
    }
    Ok(())
}

fn run_apply_preset(config: &EditorConfig, args: ApplyPresetArgs) -> Result<()> {
    let mut state = editor("untitled", config)?;
    state
        .open_file(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    apply_preset(&mut state, &args.preset)?;
    let out = args.out.as_ref().unwrap_or(&args.file);
    state.save_to_file(out)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn run_presets(config: &EditorConfig, command: PresetCommands) -> Result<()> {
    let mut catalog = open_catalog(config)?;
    match command {
        PresetCommands::List => {
            for preset in catalog.all_presets() {
                let marker = if catalog.selected_preset_id() == Some(preset.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                let kind = if catalog.is_builtin(&preset.id) {
                    "built-in"
                } else {
                    "custom"
                };
                println!("{} {:<32} {:<16} {}", marker, preset.id, preset.name, kind);
            }
        }
        PresetCommands::Save {
            file,
            name,
            description,
        } => {
            let configuration = serialization::load_configuration(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let preset = Preset::from_configuration(name, description, &configuration);
            let id = catalog.add_custom_preset(preset)?;
            println!("{}", id);
        }
        PresetCommands::Delete { id } => {
            if !catalog.delete_custom_preset(&id) {
                bail!("No custom preset with id {}", id);
            }
        }
    }
    Ok(())
}

fn run_inspect(config: &EditorConfig, args: InspectArgs) -> Result<()> {
    let file = GridFile::load_from_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let configuration = &file.configuration;
    println!("project:  {}", configuration.project_id);
    println!("version:  {} (file {})", configuration.version, file.format_version);
    println!("saved:    {}", file.saved_at.to_rfc3339());
    if !configuration.metadata.name.is_empty() {
        println!("name:     {}", configuration.metadata.name);
    }

    let layout = gridkit_designer::GridLayout::from(&config.grid);
    for panel in &configuration.panels {
        let cell = layout.cell_bounds(panel.position);
        let placement = cell
            .map(|b| format!("@({:.0}, {:.0})", b.x, b.y))
            .unwrap_or_default();
        println!(
            "{:<10} {:<12} layers={} annotations={}{}{}",
            panel.id,
            placement,
            panel.layers.len(),
            panel.annotations.len(),
            if panel.transform.is_identity() { "" } else { " transformed" },
            if panel.crop.is_some() { " cropped" } else { "" },
        );
    }
    Ok(())
}
