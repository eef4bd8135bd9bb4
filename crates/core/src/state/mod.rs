//! Run state management.
//!
//! This module provides:
//! - Run state transition functions
//! - RunManager for single-flight run coordination

pub mod manager;
pub mod run;
