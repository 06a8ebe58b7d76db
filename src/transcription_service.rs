use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use log::{error, warn, debug};
use serde::Deserialize;
use serde_json::from_str;
use tokio::process::Command;

use crate::subtitle_processor::{SubtitleEntry, Transcript, WordTiming};

// @module: Audio extraction and speech-to-text pipeline

/// Whisper model names accepted by the external transcriber.
/// The `.en` variants are English-only.
pub const WHISPER_MODELS: &[&str] = &[
    "tiny", "tiny.en", "base", "base.en", "small", "small.en",
    "medium", "medium.en", "large-v1", "large-v2", "large-v3", "large",
];

/// Validate a whisper model name against the known list
pub fn validate_model_name(model: &str) -> Result<()> {
    if WHISPER_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(anyhow!(
            "Unknown whisper model '{}'. Supported models: {}",
            model,
            WHISPER_MODELS.join(", ")
        ))
    }
}

// Serde mirror of the whisper CLI JSON output. Only the fields the
// pipeline consumes are modeled.
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    language: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    id: usize,
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    start: Option<f64>,
    end: Option<f64>,
    probability: Option<f64>,
}

/// Transcription pipeline driving the external ffmpeg and whisper tools.
pub struct TranscriptionService {
    // @field: Whisper model name
    model: String,

    // @field: Request word-level timestamps from the model
    word_level: bool,

    // @field: Timeout for the whisper process in seconds
    timeout_secs: u64,

    // @field: Spoken language hint, None for auto-detection
    language: Option<String>,
}

impl TranscriptionService {
    pub fn new(model: String, word_level: bool, timeout_secs: u64, language: Option<String>) -> Result<Self> {
        validate_model_name(&model)?;
        Ok(TranscriptionService {
            model,
            word_level,
            timeout_secs,
            language,
        })
    }

    /// Model name this service transcribes with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether word-level timestamps are requested
    pub fn word_level(&self) -> bool {
        self.word_level
    }

    /// Path for the temporary audio file next to the video.
    ///
    /// The process id is part of the name so concurrent runs over the same
    /// video do not clobber each other.
    pub fn temp_audio_path(video_path: &Path) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("video"));
        let dir = video_path.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("temp_audio_{}_{}.mp3", stem, std::process::id()))
    }

    /// Extract the audio track of a video to an MP3 file
    pub async fn extract_audio<P: AsRef<Path>>(video_path: P, audio_path: P) -> Result<()> {
        let video_path = video_path.as_ref();
        let audio_path = audio_path.as_ref();

        if !video_path.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video_path));
        }

        debug!("Extracting audio from {:?} to {:?}", video_path, audio_path);

        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",                       // Overwrite existing file
                "-i", video_path.to_str().unwrap_or_default(),
                "-vn",                      // Drop the video stream
                "-acodec", "libmp3lame",
                audio_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(300); // 5 minute timeout for audio extraction
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg command for audio extraction: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffmpeg audio extraction timed out after 5 minutes"));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio extraction failed: {}", filtered);
            if filtered.contains("does not contain any stream")
                || filtered.contains("Output file does not contain any stream")
            {
                return Err(anyhow!("The video file {:?} does not contain an audio track", video_path));
            }
            return Err(anyhow!("ffmpeg audio extraction failed: {}", filtered));
        }

        let file_size = std::fs::metadata(audio_path)?.len();
        if file_size == 0 {
            return Err(anyhow!("Extracted audio file is empty: {:?}", audio_path));
        }

        Ok(())
    }

    /// Transcribe an audio file by running the whisper CLI.
    ///
    /// Whisper writes `<stem>.json` into the output directory; that file is
    /// parsed into a [`Transcript`] and removed along with the other formats
    /// whisper leaves behind.
    pub async fn transcribe<P: AsRef<Path>>(&self, audio_path: P, source_video: &Path) -> Result<Transcript> {
        let audio_path = audio_path.as_ref();

        if !audio_path.exists() {
            return Err(anyhow!("Audio file does not exist: {:?}", audio_path));
        }

        let output_dir = audio_path.parent().unwrap_or_else(|| Path::new("."));

        let mut args: Vec<String> = vec![
            audio_path.to_string_lossy().to_string(),
            "--model".to_string(), self.model.clone(),
            "--output_format".to_string(), "json".to_string(),
            "--output_dir".to_string(), output_dir.to_string_lossy().to_string(),
            "--word_timestamps".to_string(),
            if self.word_level { "True" } else { "False" }.to_string(),
            "--fp16".to_string(), "False".to_string(),
        ];
        if let Some(language) = &self.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        debug!("Running whisper with model {} (word_timestamps={})", self.model, self.word_level);

        let whisper_future = Command::new("whisper").args(&args).output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| anyhow!("Failed to execute whisper command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("whisper command timed out after {} seconds", self.timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("Transcription failed: {}", stderr.trim());
            return Err(anyhow!("whisper transcription failed: {}", stderr.trim()));
        }

        // Whisper names its outputs after the audio file stem
        let json_path = output_dir.join(format!(
            "{}.json",
            audio_path.file_stem().unwrap_or_default().to_string_lossy()
        ));
        let json_content = std::fs::read_to_string(&json_path)
            .with_context(|| format!("Failed to read whisper output: {:?}", json_path))?;
        let _ = std::fs::remove_file(&json_path);

        let transcript = self.parse_whisper_json(&json_content, source_video)?;

        if transcript.entries.is_empty() {
            warn!("Transcription produced no segments for {:?}", source_video);
        }

        Ok(transcript)
    }

    /// Parse whisper JSON output into a transcript
    pub fn parse_whisper_json(&self, content: &str, source_video: &Path) -> Result<Transcript> {
        let output: WhisperOutput = from_str(content)
            .context("Failed to parse whisper JSON output")?;

        let mut transcript = Transcript::new(
            source_video.to_path_buf(),
            output.language.unwrap_or_else(|| "N/A".to_string()),
            self.model.clone(),
        );

        for segment in output.segments {
            let mut entry = SubtitleEntry::new(
                segment.id + 1,
                segment.start,
                segment.end,
                segment.text.trim().to_string(),
            );
            entry.words = segment.words.into_iter()
                .map(|w| WordTiming {
                    word: w.word.trim().to_string(),
                    start: w.start,
                    end: w.end,
                    probability: w.probability,
                })
                .collect();
            transcript.entries.push(entry);
        }

        Ok(transcript)
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Stream #",
            "      Metadata:",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "size=",
            "video:",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| line.starts_with(p) || trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}
