/*!
 * Error types for the subpress application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while driving the external transcription tools
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error when launching or running an external command fails
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Error when an external command exceeds its time budget
    #[error("Command timed out: {0}")]
    Timeout(String),

    /// Error when parsing the model's JSON output fails
    #[error("Failed to parse transcription output: {0}")]
    ParseError(String),

    /// Error when the video has no usable audio track
    #[error("No audio track in video: {0}")]
    NoAudioTrack(String),
}

/// Errors that can occur while parsing a subtitle script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Error when a time field does not follow the H:MM:SS.ss shape
    #[error("Invalid timestamp in script: {0}")]
    InvalidTimestamp(String),
}

/// Errors that can occur while rendering overlays onto video
#[derive(Error, Debug)]
pub enum RenderError {
    /// Error from the ffmpeg encode
    #[error("Render command failed: {0}")]
    CommandFailed(String),

    /// Error when there is nothing to render
    #[error("No overlays to render")]
    EmptyOverlaySet,
}

/// Errors that can occur when talking to the object storage service
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error when making a storage request fails
    #[error("Storage request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the storage service itself
    #[error("Storage service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the transcription pipeline
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from script parsing
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from overlay rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error from the storage client
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
