//! Configuration management for the console application.

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the snapshot file state is loaded from and saved to
    pub data_file: PathBuf,
    /// Offer to seed sample data when no snapshot file exists
    pub offer_sample_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_file = env::var("BIBLIO_DATA_FILE")
            .unwrap_or_else(|_| "library_data.json".to_string())
            .into();

        let offer_sample_data = match env::var("BIBLIO_SAMPLE_DATA") {
            Err(_) => true,
            Ok(value) => {
                parse_flag(&value).ok_or(ConfigError::InvalidSampleDataFlag(value))?
            }
        };

        Ok(Self {
            data_file,
            offer_sample_data,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BIBLIO_SAMPLE_DATA value: {0} (expected true/false)")]
    InvalidSampleDataFlag(String),
}
