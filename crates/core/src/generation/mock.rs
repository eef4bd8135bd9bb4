//! Offline generator.
//!
//! Produces deterministic titles, scripts, a silent WAV track and a solid
//! PNG image without touching the network. Used by `factory run --offline`
//! and by tests, which can also make any stage fail.

use crate::generation::base::{ContentGenerator, GeneratedAudio, GenerationError};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use cf_protocol::run_models::GenerationStage;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockGenerator {
    titles: Option<Vec<String>>,
    title_count: usize,
    failing_stage: Option<GenerationStage>,
    empty_images: bool,
    image: Option<Vec<u8>>,
    calls: Arc<Mutex<Vec<GenerationStage>>>,
}

impl MockGenerator {
    /// Always return exactly these titles.
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles: Some(titles),
            title_count: 0,
            failing_stage: None,
            empty_images: false,
            image: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Derive `count` titles from whatever topic is requested.
    pub fn for_topics(count: usize) -> Self {
        Self {
            titles: None,
            title_count: count,
            ..Self::new(Vec::new())
        }
    }

    /// Fail with an API error when `stage` is requested.
    pub fn failing_at(mut self, stage: GenerationStage) -> Self {
        self.failing_stage = Some(stage);
        self
    }

    /// Return no images from image generation.
    pub fn with_empty_images(mut self) -> Self {
        self.empty_images = true;
        self
    }

    /// Return these bytes as the generated image.
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    /// Stages requested so far, in call order.
    pub fn calls(&self) -> Vec<GenerationStage> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn enter(&self, stage: GenerationStage) -> Result<(), GenerationError> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(stage),
            Err(poisoned) => poisoned.into_inner().push(stage),
        }
        if self.failing_stage == Some(stage) {
            return Err(GenerationError::Api {
                status: 500,
                message: format!("mock failure during {stage:?}"),
            });
        }
        Ok(())
    }
}

/// A solid-color PNG.
pub fn sample_png(width: u32, height: u32) -> Result<Vec<u8>, GenerationError> {
    let img = RgbImage::from_pixel(width, height, Rgb([48, 72, 160]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| GenerationError::Parse(e.to_string()))?;
    Ok(buf)
}

/// A short silent 16-bit mono WAV.
pub fn silent_wav(samples: u32) -> Result<Vec<u8>, GenerationError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut buf = Vec::new();
    let mut writer = WavWriter::new(Cursor::new(&mut buf), spec)
        .map_err(|e| GenerationError::Parse(e.to_string()))?;
    for _ in 0..samples {
        writer
            .write_sample(0i16)
            .map_err(|e| GenerationError::Parse(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| GenerationError::Parse(e.to_string()))?;
    Ok(buf)
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate_titles(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        self.enter(GenerationStage::TitleGeneration)?;
        Ok(match &self.titles {
            Some(titles) => titles.clone(),
            None => (1..=self.title_count)
                .map(|n| format!("{topic}: the part nobody tells you #{n}"))
                .collect(),
        })
    }

    async fn generate_script(&self, title: &str) -> Result<String, GenerationError> {
        self.enter(GenerationStage::ScriptGeneration)?;
        Ok(format!("Have you ever wondered about {title}? Here is what matters."))
    }

    async fn generate_audio(&self, _script: &str) -> Result<GeneratedAudio, GenerationError> {
        self.enter(GenerationStage::AudioGeneration)?;
        Ok(GeneratedAudio {
            data: silent_wav(800)?,
            extension: "wav".to_string(),
            mime_type: "audio/wav".to_string(),
        })
    }

    async fn generate_thumbnail_prompt(&self, title: &str) -> Result<String, GenerationError> {
        self.enter(GenerationStage::ImagePromptGeneration)?;
        Ok(format!("A vivid, photorealistic scene illustrating {title}"))
    }

    async fn generate_images(&self, _prompt: &str) -> Result<Vec<Vec<u8>>, GenerationError> {
        self.enter(GenerationStage::ImageGeneration)?;
        if self.empty_images {
            return Ok(Vec::new());
        }
        let image = match &self.image {
            Some(bytes) => bytes.clone(),
            None => sample_png(160, 90)?,
        };
        Ok(vec![image])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_fixed_titles() {
        let generator = MockGenerator::new(vec!["T1".to_string(), "T2".to_string()]);
        let titles = generator.generate_titles("anything").await.unwrap();
        assert_eq!(titles, vec!["T1", "T2"]);
        assert_eq!(generator.calls(), vec![GenerationStage::TitleGeneration]);
    }

    #[tokio::test]
    async fn test_mock_generator_derived_titles() {
        let generator = MockGenerator::for_topics(3);
        let titles = generator.generate_titles("sleep").await.unwrap();
        assert_eq!(titles.len(), 3);
        assert!(titles.iter().all(|t| t.starts_with("sleep")));
    }

    #[tokio::test]
    async fn test_mock_generator_failing_stage() {
        let generator = MockGenerator::new(vec!["T1".to_string()])
            .failing_at(GenerationStage::AudioGeneration);
        assert!(generator.generate_script("T1").await.is_ok());
        let result = generator.generate_audio("script").await;
        assert!(matches!(result, Err(GenerationError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_mock_generator_images() {
        let generator = MockGenerator::new(vec![]);
        let images = generator.generate_images("prompt").await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(image::guess_format(&images[0]).unwrap(), ImageFormat::Png);

        let empty = MockGenerator::new(vec![]).with_empty_images();
        assert!(empty.generate_images("prompt").await.unwrap().is_empty());
    }

    #[test]
    fn test_silent_wav_reads_back() {
        let wav = silent_wav(10).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 10);
        let samples: Vec<i16> = reader.into_samples().collect::<Result<_, _>>().unwrap();
        assert!(samples.iter().all(|s| *s == 0));
    }
}
