//! Settings models for `.content-factory/config.toml`.
//!
//! Every field has a default, so an empty or partial file is valid.
//!
//! # Example
//!
//! ```toml
//! # .content-factory/config.toml
//! [generation]
//! title_count = 3
//! tts_voice = "alloy"
//!
//! [drive]
//! folder = "https://drive.google.com/drive/folders/1AbCdEf"
//! ```

use serde::{Deserialize, Serialize};

/// Root of `.content-factory/config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FactoryConfig {
    pub generation: GenerationSettings,
    pub prompts: PromptTemplates,
    pub drive: DriveSettings,
    pub thumbnail: ThumbnailSettings,
}

/// Models and parameters for the generation API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,
    /// Chat model used for titles, scripts and image prompts.
    pub text_model: String,
    /// Image synthesis model.
    pub image_model: String,
    /// Text-to-speech model.
    pub tts_model: String,
    /// Text-to-speech voice.
    pub tts_voice: String,
    /// Audio container requested from text-to-speech (`mp3`, `wav`, ...).
    pub audio_format: String,
    /// Requested image size, `WIDTHxHEIGHT`.
    pub image_size: String,
    /// Requested image quality.
    pub image_quality: String,
    /// Images requested per prompt; only the first is used.
    pub images_per_prompt: u32,
    /// Number of titles requested per topic.
    pub title_count: usize,
    pub title_temperature: f32,
    pub script_temperature: f32,
    pub prompt_temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1".to_string(),
            text_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            audio_format: "mp3".to_string(),
            image_size: "1792x1024".to_string(),
            image_quality: "hd".to_string(),
            images_per_prompt: 1,
            title_count: 5,
            title_temperature: 0.7,
            script_temperature: 0.8,
            prompt_temperature: 0.7,
        }
    }
}

/// Prompt templates.
///
/// Placeholders: `{topic}` and `{count}` in `titles`, `{title}` in `script`
/// and `thumbnail`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptTemplates {
    pub titles: String,
    pub script: String,
    pub thumbnail: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            titles: "Generate {count} YouTube video titles about \"{topic}\". Every title must be \
                     unique, curiosity-driven and carry an emotional hook that makes viewers \
                     click right away. Do not add a heading; return only the titles as a \
                     numbered list."
                .to_string(),
            script: "Write a YouTube video script for the title \"{title}\". Open with a strong \
                     hook and a question, answer like an expert with deep and accurate insight, \
                     keep it to about one minute of narration, and return only the script text \
                     without headings."
                .to_string(),
            thumbnail: "Generate a single, compelling, and photorealistic YouTube thumbnail image \
                        prompt for a video titled: \"{title}\". The prompt should describe a \
                        visually striking image with a clear focal point, vibrant colors, and an \
                        emotionally engaging scene. Do not include any text in the image \
                        description. The output should be only the prompt text, without any \
                        labels or quotes."
                .to_string(),
        }
    }
}

/// Remote storage destination.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DriveSettings {
    /// Drive folder id, or the full URL of the folder.
    pub folder: String,
}

impl DriveSettings {
    /// The folder id, extracted from a `.../folders/<id>` URL when one was given.
    pub fn folder_id(&self) -> String {
        extract_folder_id(&self.folder)
    }
}

/// Extract a Drive folder id from either a bare id or a folder URL.
///
/// Anything that does not contain `folders/` is returned trimmed but
/// otherwise unchanged.
pub fn extract_folder_id(input: &str) -> String {
    let input = input.trim();
    match input.rsplit_once("folders/") {
        Some((_, rest)) => rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        None => input.to_string(),
    }
}

/// Thumbnail canvas and text styling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ThumbnailSettings {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// CSS-style font family list for the overlay text.
    pub font_family: String,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` fonts.
    pub font_dir: Option<String>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            jpeg_quality: 90,
            font_family: "'Arial Black', Gadget, sans-serif".to_string(),
            font_dir: None,
        }
    }
}
