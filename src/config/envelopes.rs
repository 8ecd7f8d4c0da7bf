//! Envelope configuration loading from config.toml
//!
//! The envelopes defined in config.toml are used to seed the board on first
//! run or when envelopes are missing; existing envelopes are never touched.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of envelope configurations to seed
    pub envelopes: Vec<EnvelopeConfig>,
}

/// Configuration for a single envelope
#[derive(Debug, Deserialize, Clone)]
pub struct EnvelopeConfig {
    /// Short display code (e.g., "GROC")
    pub code: String,
    /// Name of the envelope
    pub name: String,
    /// Envelope type the envelope is grouped under
    #[serde(rename = "type")]
    pub type_slug: String,
}

/// Loads envelope configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads envelope configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
