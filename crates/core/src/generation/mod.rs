//! Generation layer.
//!
//! This module provides:
//! - The `ContentGenerator` trait every text, speech and image backend implements
//! - An OpenAI-compatible HTTP adapter
//! - A deterministic offline generator

pub mod base;
pub mod mock;
pub mod openai;

pub use base::{parse_title_list, ContentGenerator, GeneratedAudio, GenerationError};
pub use mock::MockGenerator;
pub use openai::OpenAiGenerator;
