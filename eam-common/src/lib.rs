//! # EAM Common Library
//!
//! Shared code for the concert-history tools (`eam-ingest`, `eam-openers`):
//! - Error types
//! - Configuration loading and API key resolution
//! - Logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
