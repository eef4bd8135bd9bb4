//! Test fixtures for orchestrators, projects and generators.

use async_trait::async_trait;
use cf_core::compositor::{Compositor, SvgTextRenderer};
use cf_core::engine::{Orchestrator, RunRequest};
use cf_core::generation::{ContentGenerator, GeneratedAudio, GenerationError, MockGenerator};
use cf_core::storage::AssetStore;
use cf_protocol::config_models::ThumbnailSettings;
use cf_protocol::ipc::Event;
use cf_protocol::run_models::{RunState, RunStatus};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::{mpsc, Notify};
use usvg::fontdb;

/// A compositor with no fonts loaded, so overlay text is laid out but not drawn.
#[allow(dead_code)]
pub fn test_compositor() -> Compositor {
    let renderer = SvgTextRenderer::with_fontdb("sans-serif", Arc::new(fontdb::Database::new()));
    Compositor::with_renderer(ThumbnailSettings::default(), renderer)
}

#[allow(dead_code)]
pub fn test_orchestrator(
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn AssetStore>,
) -> Orchestrator {
    Orchestrator::new(generator, store, test_compositor())
}

/// Run `topic` to completion and return the status, final state and every
/// event emitted.
#[allow(dead_code)]
pub async fn run_topic(
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn AssetStore>,
    topic: &str,
) -> (RunStatus, RunState, Vec<Event>) {
    let orchestrator = test_orchestrator(generator, store);
    let (events_tx, mut events_rx) = mpsc::channel(4096);
    let mut state = RunState::default();

    let status = orchestrator
        .run(&RunRequest::new(topic), &mut state, &events_tx)
        .await;
    drop(events_tx);

    let mut events = Vec::new();
    while let Some(event) = events_rx.recv().await {
        events.push(event);
    }
    (status, state, events)
}

/// Titles whose first twenty characters are identical.
#[allow(dead_code)]
pub fn titles_sharing_prefix() -> Vec<String> {
    vec![
        "Twenty identical chars: the first".to_string(),
        "Twenty identical chars: the second".to_string(),
    ]
}

/// Create a temporary project with a `.content-factory/config.toml`.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project(config: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let factory_dir = temp_dir.path().join(".content-factory");
    std::fs::create_dir_all(&factory_dir)?;
    std::fs::write(factory_dir.join("config.toml"), config)?;
    Ok(temp_dir)
}

/// A generator that parks in title generation until released.
#[allow(dead_code)]
pub struct GatedGenerator {
    inner: MockGenerator,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[allow(dead_code)]
impl GatedGenerator {
    pub fn new(inner: MockGenerator) -> Self {
        Self {
            inner,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ContentGenerator for GatedGenerator {
    async fn generate_titles(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.generate_titles(topic).await
    }

    async fn generate_script(&self, title: &str) -> Result<String, GenerationError> {
        self.inner.generate_script(title).await
    }

    async fn generate_audio(&self, script: &str) -> Result<GeneratedAudio, GenerationError> {
        self.inner.generate_audio(script).await
    }

    async fn generate_thumbnail_prompt(&self, title: &str) -> Result<String, GenerationError> {
        self.inner.generate_thumbnail_prompt(title).await
    }

    async fn generate_images(&self, prompt: &str) -> Result<Vec<Vec<u8>>, GenerationError> {
        self.inner.generate_images(prompt).await
    }
}
