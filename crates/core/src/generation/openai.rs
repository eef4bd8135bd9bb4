//! OpenAI-compatible generation adapter.
//!
//! Titles, scripts and thumbnail prompts come from chat completions, narration
//! from `/audio/speech`, and images from `/images/generations` with base64
//! payloads.

use crate::generation::base::{
    audio_mime_type, parse_title_list, ContentGenerator, GeneratedAudio, GenerationError,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cf_protocol::config_models::{GenerationSettings, PromptTemplates};
use serde::{Deserialize, Serialize};

/// HTTP client for an OpenAI-compatible API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    settings: GenerationSettings,
    prompts: PromptTemplates,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
    quality: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl OpenAiGenerator {
    /// Create a new generator.
    ///
    /// Requests go to `settings.api_base_url`.
    pub fn new(
        api_key: impl Into<String>,
        settings: GenerationSettings,
        prompts: PromptTemplates,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            settings,
            prompts,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.settings.api_base_url.trim_end_matches('/'))
    }

    /// POST a JSON body and return the successful response.
    ///
    /// Non-2xx responses become [`GenerationError::Api`] carrying the
    /// `error.message` field when the body has one.
    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, GenerationError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Unknown error".to_string());

        tracing::warn!(path, status = status.as_u16(), %message, "generation request rejected");
        Err(GenerationError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn chat(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.settings.text_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response: ChatResponse = self
            .post("/chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Parse("completion has no message content".to_string()))
    }
}

/// Fill `{topic}`, `{title}` and `{count}` placeholders.
pub fn render_prompt(template: &str, topic: &str, title: &str, count: usize) -> String {
    template
        .replace("{topic}", topic)
        .replace("{title}", title)
        .replace("{count}", &count.to_string())
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate_titles(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        let prompt = render_prompt(&self.prompts.titles, topic, "", self.settings.title_count);
        let raw = self.chat(&prompt, self.settings.title_temperature).await?;
        let titles = parse_title_list(&raw);
        tracing::debug!(topic, count = titles.len(), "titles generated");
        Ok(titles)
    }

    async fn generate_script(&self, title: &str) -> Result<String, GenerationError> {
        let prompt = render_prompt(&self.prompts.script, "", title, self.settings.title_count);
        self.chat(&prompt, self.settings.script_temperature).await
    }

    async fn generate_audio(&self, script: &str) -> Result<GeneratedAudio, GenerationError> {
        let request = SpeechRequest {
            model: &self.settings.tts_model,
            input: script,
            voice: &self.settings.tts_voice,
            response_format: &self.settings.audio_format,
        };

        let bytes = self
            .post("/audio/speech", &request)
            .await?
            .bytes()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if bytes.is_empty() {
            return Err(GenerationError::Empty("no audio payload returned".to_string()));
        }

        let format = self.settings.audio_format.as_str();
        Ok(GeneratedAudio {
            data: bytes.to_vec(),
            extension: format.to_string(),
            mime_type: audio_mime_type(format).to_string(),
        })
    }

    async fn generate_thumbnail_prompt(&self, title: &str) -> Result<String, GenerationError> {
        let prompt = render_prompt(&self.prompts.thumbnail, "", title, self.settings.title_count);
        let text = self.chat(&prompt, self.settings.prompt_temperature).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_images(&self, prompt: &str) -> Result<Vec<Vec<u8>>, GenerationError> {
        let request = ImageRequest {
            model: &self.settings.image_model,
            prompt,
            n: self.settings.images_per_prompt,
            size: &self.settings.image_size,
            response_format: "b64_json",
            quality: &self.settings.image_quality,
        };

        let response: ImageResponse = self
            .post("/images/generations", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        response
            .data
            .into_iter()
            .filter_map(|datum| datum.b64_json)
            .map(|encoded| {
                BASE64
                    .decode(encoded.trim())
                    .map_err(|e| GenerationError::Parse(format!("invalid base64 image: {e}")))
            })
            .collect()
    }
}
