//! `factory`: turn a topic into titles, scripts, voiceovers and thumbnails.

mod output;

use cf_core::compositor::Compositor;
use cf_core::config::loader::load_config;
use cf_core::config::models::AppConfig;
use cf_core::engine::Orchestrator;
use cf_core::generation::{ContentGenerator, MockGenerator, OpenAiGenerator};
use cf_core::init::{generate_factory_structure, InitOptions};
use cf_core::naming::sanitize_topic;
use cf_core::state::manager::RunManager;
use cf_core::storage::{AssetStore, DriveStore, MemoryStore};
use cf_protocol::run_models::RunStatus;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "factory", version)]
#[command(about = "Generate YouTube content assets from a single topic")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create `.content-factory/` with a default configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Generate titles, scripts, voiceovers and thumbnails for a topic
    Run {
        topic: String,

        /// Directory the assets are written to [default: output/<topic>]
        #[arg(long)]
        out: Option<PathBuf>,

        /// Use the built-in offline generator and keep uploads in memory
        #[arg(long)]
        offline: bool,
    },
    /// Revoke the Google Drive access token
    Revoke,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let root = std::env::current_dir()?;

    match cli.command {
        Commands::Init { force } => init(&root, force).await,
        Commands::Run {
            topic,
            out,
            offline,
        } => run(&root, &topic, out, offline).await,
        Commands::Revoke => revoke(&root).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn init(root: &Path, force: bool) -> Result<()> {
    generate_factory_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
    })
    .await?;
    println!("{}", output::success("Initialized .content-factory/config.toml"));
    Ok(())
}

async fn run(root: &Path, topic: &str, out: Option<PathBuf>, offline: bool) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        bail!("Please enter a topic.");
    }

    let config = load_config(root).await?;
    let (generator, store) = if offline {
        offline_collaborators(&config)
    } else {
        online_collaborators(&config)?
    };
    let orchestrator = Orchestrator::new(
        generator,
        store,
        Compositor::new(config.settings.thumbnail.clone()),
    );

    let (events_tx, mut events_rx) = mpsc::channel(256);
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if let Some(line) = output::format_event(&event) {
                println!("{line}");
            }
        }
    });

    let manager = RunManager::new(orchestrator, events_tx);
    let state = manager.start(topic).await;
    drop(manager);
    printer.await?;

    let state = state.ok_or_else(|| eyre!("A run is already in progress"))?;
    let out_dir = out.unwrap_or_else(|| root.join("output").join(sanitize_topic(topic)));
    if !state.assets.is_empty() {
        println!();
        for row in output::asset_table(&state) {
            println!("{row}");
        }
        let written = output::write_assets(&out_dir, &state.assets)?;
        println!(
            "{}",
            output::success(&format!(
                "Wrote {} assets to {}",
                written.len(),
                out_dir.display()
            ))
        );
    }

    match state.status {
        RunStatus::Completed => Ok(()),
        _ => Err(eyre!(
            "{}",
            state.last_error().unwrap_or("Workflow did not complete")
        )),
    }
}

fn offline_collaborators(
    config: &AppConfig,
) -> (Arc<dyn ContentGenerator>, Arc<dyn AssetStore>) {
    (
        Arc::new(MockGenerator::for_topics(
            config.settings.generation.title_count,
        )),
        Arc::new(MemoryStore::new()),
    )
}

fn online_collaborators(
    config: &AppConfig,
) -> Result<(Arc<dyn ContentGenerator>, Arc<dyn AssetStore>)> {
    config.validate()?;
    let api_key = config
        .secrets
        .openai_api_key
        .clone()
        .ok_or_else(|| eyre!("OPENAI_API_KEY is not set"))?;

    let generator: Arc<dyn ContentGenerator> = Arc::new(OpenAiGenerator::new(
        api_key,
        config.settings.generation.clone(),
        config.settings.prompts.clone(),
    ));
    let store: Arc<dyn AssetStore> = Arc::new(DriveStore::new(
        config.settings.drive.folder_id(),
        config.secrets.google.clone(),
    ));
    Ok((generator, store))
}

async fn revoke(root: &Path) -> Result<()> {
    let config = load_config(root).await?;
    if !config.secrets.google.is_complete() {
        println!("Not signed in to Google Drive; nothing to revoke.");
        return Ok(());
    }

    let store = DriveStore::new(
        config.settings.drive.folder_id(),
        config.secrets.google.clone(),
    );
    store.initialize().await?;
    store.revoke().await?;
    println!("{}", output::success("Disconnected from Google Drive."));
    Ok(())
}
