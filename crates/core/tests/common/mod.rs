//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Fixtures for orchestrators, projects and generators
//! - Event collection and assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
