//! Base generator trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;

/// Narration produced by text-to-speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAudio {
    /// Encoded audio bytes.
    pub data: Vec<u8>,
    /// File extension matching the encoding (`mp3`, `wav`, ...).
    pub extension: String,
    /// MIME type matching the encoding.
    pub mime_type: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Response parsing error: {0}")]
    Parse(String),
    #[error("Empty result: {0}")]
    Empty(String),
}

/// Opaque generative backend.
///
/// Every call is attempted exactly once; callers treat any error as fatal for
/// the run.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate titles for a topic, in the order they should be processed.
    async fn generate_titles(&self, topic: &str) -> Result<Vec<String>, GenerationError>;

    /// Write a narration script for a title.
    async fn generate_script(&self, title: &str) -> Result<String, GenerationError>;

    /// Render a script to speech.
    async fn generate_audio(&self, script: &str) -> Result<GeneratedAudio, GenerationError>;

    /// Describe a thumbnail image for a title.
    async fn generate_thumbnail_prompt(&self, title: &str) -> Result<String, GenerationError>;

    /// Synthesize images for a prompt. An empty result is not an error here;
    /// the caller decides.
    async fn generate_images(&self, prompt: &str) -> Result<Vec<Vec<u8>>, GenerationError>;
}

/// Split a numbered-list completion into titles.
///
/// Leading `"<digits>."` numbering and surrounding whitespace are stripped;
/// blank lines are dropped.
pub fn parse_title_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| strip_numbering(line.trim()).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn strip_numbering(line: &str) -> &str {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// MIME type for a text-to-speech response format.
pub fn audio_mime_type(format: &str) -> &'static str {
    match format {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "opus" => "audio/opus",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "pcm" => "audio/pcm",
        _ => "application/octet-stream",
    }
}
