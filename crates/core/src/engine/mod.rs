//! Content generation engine.
//!
//! The Orchestrator turns a topic into a batch of assets by driving the
//! generator through a fixed sequence of stages, uploading every artifact
//! and recording progress on an explicit [`RunState`].

use crate::compositor::{ComposeError, Compositor};
use crate::generation::{ContentGenerator, GenerationError};
use crate::naming::{asset_name, asset_prefix, image_file_type, sanitize_topic, title_list_name};
use crate::state::run::{
    advance_progress, begin_stage, complete_run, fail_run, finish_loading, log_to_run,
    record_asset, refuse_run, reset_run, set_total_steps,
};
use crate::storage::{AssetStore, StorageError};
use cf_protocol::asset_models::{Asset, AssetKind};
use cf_protocol::ipc::Event;
use cf_protocol::log_models::LogStatus;
use cf_protocol::run_models::{GenerationStage, RunState, RunStatus};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

/// Characters of the image prompt echoed in the log.
const PROMPT_PREVIEW_CHARS: usize = 40;

/// A fatal error that stops the remainder of a run.
#[derive(Error, Debug)]
pub enum RunFailure {
    #[error("Failed to generate titles.")]
    NoTitles,

    #[error("Failed to generate image.")]
    NoImages,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Thumbnail task failed: {0}")]
    Task(String),
}

/// A request to generate content for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub topic: String,

    /// Whether the topic was already used earlier in this session.
    pub previously_used: bool,
}

impl RunRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            previously_used: false,
        }
    }
}

/// The sequential topic-to-assets pipeline.
pub struct Orchestrator {
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn AssetStore>,
    compositor: Compositor,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn AssetStore>,
        compositor: Compositor,
    ) -> Self {
        Self {
            generator,
            store,
            compositor,
        }
    }

    /// Execute one run and return its terminal status.
    ///
    /// `state` is reset first, so it only ever holds this run's logs and
    /// assets. A run is refused without executing any stage when the topic
    /// is blank or the store is not authenticated. The loading flag is
    /// cleared on every exit path.
    pub async fn run(
        &self,
        request: &RunRequest,
        state: &mut RunState,
        events_tx: &Sender<Event>,
    ) -> RunStatus {
        let topic = request.topic.trim();
        reset_run(state, topic, events_tx).await;

        if let Some(reason) = self.refusal(topic).await {
            refuse_run(state, events_tx, reason).await;
            finish_loading(state);
            return state.status;
        }

        if request.previously_used {
            log_to_run(
                state,
                events_tx,
                LogStatus::Info,
                format!("Topic \"{topic}\" was used before in this session; generating again."),
            )
            .await;
        }

        match self.generate(topic, state, events_tx).await {
            Ok(()) => {
                log_to_run(
                    state,
                    events_tx,
                    LogStatus::Success,
                    "Workflow completed successfully!",
                )
                .await;
                complete_run(state, events_tx).await;
            }
            Err(failure) => {
                let message = failure.to_string();
                log_to_run(
                    state,
                    events_tx,
                    LogStatus::Error,
                    format!("Workflow failed: {message}"),
                )
                .await;
                fail_run(state, events_tx, message).await;
            }
        }

        finish_loading(state);
        state.status
    }

    /// Reason to refuse the run, if any.
    async fn refusal(&self, topic: &str) -> Option<String> {
        if topic.is_empty() {
            return Some("Please enter a topic.".to_string());
        }
        if let Err(e) = self.store.initialize().await {
            return Some(format!("Failed to initialize storage: {e}"));
        }
        if !self.store.is_authenticated().await {
            return Some(StorageError::NotAuthenticated.to_string());
        }
        None
    }

    async fn generate(
        &self,
        topic: &str,
        state: &mut RunState,
        events_tx: &Sender<Event>,
    ) -> Result<(), RunFailure> {
        log_to_run(
            state,
            events_tx,
            LogStatus::Info,
            format!("Starting content generation for topic: \"{topic}\""),
        )
        .await;

        begin_stage(state, events_tx, GenerationStage::TitleGeneration, None).await;
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            "Generating unique YouTube titles...",
        )
        .await;
        let titles = self.generator.generate_titles(topic).await?;
        if titles.is_empty() {
            return Err(RunFailure::NoTitles);
        }
        set_total_steps(state, titles.len());
        log_to_run(
            state,
            events_tx,
            LogStatus::Success,
            format!("Generated {} titles.", titles.len()),
        )
        .await;

        let sanitized = sanitize_topic(topic);
        self.store_asset(
            state,
            events_tx,
            AssetKind::TitleList,
            title_list_name(&sanitized),
            "text/plain",
            titles.join("\n").into_bytes(),
        )
        .await;
        advance_progress(state, events_tx).await;

        for (offset, title) in titles.iter().enumerate() {
            let index = offset + 1;
            let prefix = asset_prefix(&sanitized, index, title);
            let tag = format!("[{index}/{}]", titles.len());
            self.generate_for_title(title, index, &prefix, &tag, state, events_tx)
                .await?;
        }

        Ok(())
    }

    /// Script, voiceover, base image and thumbnail for one title.
    async fn generate_for_title(
        &self,
        title: &str,
        index: usize,
        prefix: &str,
        tag: &str,
        state: &mut RunState,
        events_tx: &Sender<Event>,
    ) -> Result<(), RunFailure> {
        let at = Some(index);

        // Script
        begin_stage(state, events_tx, GenerationStage::ScriptGeneration, at).await;
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("{tag} Generating script for: \"{title}\""),
        )
        .await;
        let script = self.generator.generate_script(title).await?;
        log_to_run(state, events_tx, LogStatus::Success, format!("{tag} Script generated.")).await;
        self.store_asset(
            state,
            events_tx,
            AssetKind::Script,
            asset_name(prefix, "script.txt"),
            "text/plain",
            script.clone().into_bytes(),
        )
        .await;
        advance_progress(state, events_tx).await;

        // Voiceover
        begin_stage(state, events_tx, GenerationStage::AudioGeneration, at).await;
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("{tag} Generating voiceover..."),
        )
        .await;
        let audio = self.generator.generate_audio(&script).await?;
        log_to_run(
            state,
            events_tx,
            LogStatus::Success,
            format!("{tag} Voiceover generated."),
        )
        .await;
        self.store_asset(
            state,
            events_tx,
            AssetKind::Audio,
            asset_name(prefix, &format!("audio.{}", audio.extension)),
            &audio.mime_type,
            audio.data,
        )
        .await;
        advance_progress(state, events_tx).await;

        // Base image
        begin_stage(state, events_tx, GenerationStage::ImagePromptGeneration, at).await;
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("{tag} Generating thumbnail prompt..."),
        )
        .await;
        let prompt = self.generator.generate_thumbnail_prompt(title).await?;

        begin_stage(state, events_tx, GenerationStage::ImageGeneration, at).await;
        let preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("{tag} Generating image for: \"{preview}...\""),
        )
        .await;
        let base_image = self
            .generator
            .generate_images(&prompt)
            .await?
            .into_iter()
            .next()
            .ok_or(RunFailure::NoImages)?;
        log_to_run(
            state,
            events_tx,
            LogStatus::Success,
            format!("{tag} Base image generated."),
        )
        .await;
        let (extension, mime_type) = image_file_type(&base_image);
        self.store_asset(
            state,
            events_tx,
            AssetKind::Image,
            asset_name(prefix, &format!("image.{extension}")),
            mime_type,
            base_image.clone(),
        )
        .await;
        advance_progress(state, events_tx).await;

        // Thumbnail
        begin_stage(state, events_tx, GenerationStage::ThumbnailComposition, at).await;
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("{tag} Creating final thumbnail..."),
        )
        .await;
        let thumbnail = self.compose(base_image, title.to_string()).await?;
        log_to_run(
            state,
            events_tx,
            LogStatus::Success,
            format!("{tag} Thumbnail created successfully."),
        )
        .await;
        self.store_asset(
            state,
            events_tx,
            AssetKind::Thumbnail,
            asset_name(prefix, "thumbnail.jpg"),
            "image/jpeg",
            thumbnail,
        )
        .await;
        advance_progress(state, events_tx).await;

        Ok(())
    }

    /// Run the compositor off the async executor.
    async fn compose(&self, base_image: Vec<u8>, title: String) -> Result<Vec<u8>, RunFailure> {
        let compositor = self.compositor.clone();
        let composed = tokio::task::spawn_blocking(move || compositor.compose(&base_image, &title))
            .await
            .map_err(|e| RunFailure::Task(e.to_string()))??;
        Ok(composed)
    }

    /// Upload `data` and record it as an asset, with or without a remote URL.
    async fn store_asset(
        &self,
        state: &mut RunState,
        events_tx: &Sender<Event>,
        kind: AssetKind,
        name: String,
        mime_type: &str,
        data: Vec<u8>,
    ) {
        let remote_url = self.upload(state, events_tx, &data, &name, mime_type).await;
        record_asset(
            state,
            events_tx,
            Asset::new(kind, name, mime_type, data, remote_url),
        )
        .await;
    }

    /// Upload failures are logged and otherwise ignored.
    async fn upload(
        &self,
        state: &mut RunState,
        events_tx: &Sender<Event>,
        data: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Option<String> {
        log_to_run(
            state,
            events_tx,
            LogStatus::Pending,
            format!("Uploading {name} to Google Drive..."),
        )
        .await;
        match self.store.upload(data, name, mime_type).await {
            Ok(url) => {
                log_to_run(
                    state,
                    events_tx,
                    LogStatus::Success,
                    format!("{name} uploaded successfully."),
                )
                .await;
                Some(url)
            }
            Err(e) => {
                log_to_run(
                    state,
                    events_tx,
                    LogStatus::Error,
                    format!("Failed to upload {name}: {e}"),
                )
                .await;
                None
            }
        }
    }
}
