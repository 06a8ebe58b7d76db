use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

// @module: Transcript segments and subtitle file generation

// @struct: Word-level timing from the speech model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordTiming {
    // @field: The spoken word
    pub word: String,

    // @field: Start time in seconds
    pub start: Option<f64>,

    // @field: End time in seconds
    pub end: Option<f64>,

    // @field: Model confidence for this word
    pub probability: Option<f64>,
}

// @struct: Single transcribed segment
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_sec: f64,

    // @field: End time in seconds
    pub end_sec: f64,

    // @field: Segment text
    pub text: String,

    // @field: Word-level timings when requested from the model
    pub words: Vec<WordTiming>,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without word timings
    pub fn new(seq_num: usize, start_sec: f64, end_sec: f64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_sec,
            end_sec,
            text,
            words: Vec::new(),
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_sec: f64, end_sec: f64, text: String) -> Result<Self> {
        if end_sec <= start_sec {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_sec, start_sec
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_sec,
            end_sec,
            text: trimmed_text.to_string(),
            words: Vec::new(),
        })
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_sec)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_sec)
    }

    /// Format a timestamp in seconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Transcript of one video with metadata
#[derive(Debug)]
pub struct Transcript {
    /// Source video file
    pub source_file: PathBuf,

    /// Transcribed segments in time order
    pub entries: Vec<SubtitleEntry>,

    /// Language detected by the speech model
    pub detected_language: String,

    /// Model name used for transcription
    pub model_name: String,
}

impl Transcript {
    /// Create a new empty transcript
    pub fn new(source_file: PathBuf, detected_language: String, model_name: String) -> Self {
        Transcript {
            source_file,
            entries: Vec::new(),
            detected_language,
            model_name,
        }
    }

    /// Whether any segment carries word-level timings
    pub fn has_word_timings(&self) -> bool {
        self.entries.iter().any(|e| !e.words.is_empty())
    }

    /// Write segments to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Write word-level timings to a JSON file
    ///
    /// The document carries a metadata block (source video, model name,
    /// transcription time, detected language) followed by the segments with
    /// their per-word timings. When the model returned no word timings the
    /// file is not written and a warning is logged instead.
    pub fn write_word_timestamps_json<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = path.as_ref();

        if !self.has_word_timings() {
            warn!("Word timestamps requested, but not found in transcription result. Skipping JSON generation.");
            if path.exists() {
                let _ = std::fs::remove_file(path);
            }
            return Ok(false);
        }

        let segments: Vec<serde_json::Value> = self.entries.iter()
            .map(|entry| {
                json!({
                    "segment_id": entry.seq_num,
                    "start": entry.start_sec,
                    "end": entry.end_sec,
                    "text": entry.text,
                    "words": entry.words,
                })
            })
            .collect();

        let document = json!({
            "metadata": {
                "video_file": self.source_file.to_string_lossy(),
                "model_used": self.model_name,
                "transcription_time": chrono::Local::now().to_rfc3339(),
                "detected_language": self.detected_language,
            },
            "segments": segments,
        });

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&document)
            .context("Failed to serialize word timestamps to JSON")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write word timestamps file: {}", path.display()))?;

        Ok(true)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Language: {}", self.detected_language)?;
        writeln!(f, "Model: {}", self.model_name)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
