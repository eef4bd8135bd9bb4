//! # cf-core
//!
//! Core generation engine for content-factory.
//!
//! This crate provides:
//! - Configuration loading from the `.content-factory/` directory and the environment
//! - Generation and storage collaborators behind traits, with HTTP and offline adapters
//! - The thumbnail compositor
//! - The sequential run orchestrator and single-flight run management
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`generation`]: Text, speech and image generation
//! - [`storage`]: Asset upload and OAuth token exchange
//! - [`compositor`]: Thumbnail text overlay
//! - [`naming`]: Asset file names
//! - [`engine`]: The topic-to-assets orchestrator
//! - [`state`]: Run state transitions and the run manager
//! - [`init`]: `.content-factory/` scaffolding

pub mod compositor;
pub mod config;
pub mod engine;
pub mod generation;
pub mod init;
pub mod naming;
pub mod state;
pub mod storage;
