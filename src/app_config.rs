use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::transcription_service;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcription settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Overlay rendering settings
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Object storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech-to-text configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Whisper model name (e.g., "tiny", "base", "small", "medium", "large")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Whether to request word-level timestamps and write the JSON file
    #[serde(default = "default_true")]
    pub word_level: bool,

    /// Spoken language hint; None lets the model auto-detect
    #[serde(default)]
    pub language: Option<String>,

    /// Transcription timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: default_whisper_model(),
            word_level: true,
            language: None,
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Overlay rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OverlayConfig {
    /// Font family passed to the renderer
    #[serde(default = "default_font")]
    pub font: String,

    /// Output video codec
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Output audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Encode timeout in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Storage service endpoint URL
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,

    /// Bucket name
    #[serde(default = "default_storage_bucket")]
    pub bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_storage_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
            bucket: default_storage_bucket(),
            timeout_secs: default_storage_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    1800 // Transcription of long videos takes a while
}

fn default_font() -> String {
    "LiberationSans".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_render_timeout_secs() -> u64 {
    1800
}

fn default_storage_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_storage_bucket() -> String {
    "videos".to_string()
}

fn default_storage_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        transcription_service::validate_model_name(&self.whisper.model)?;

        if self.overlay.font.is_empty() {
            return Err(anyhow!("Overlay font must not be empty"));
        }

        if self.whisper.timeout_secs == 0 || self.overlay.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            whisper: WhisperConfig::default(),
            overlay: OverlayConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
