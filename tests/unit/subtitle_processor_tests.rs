/*!
 * Tests for transcript and subtitle file generation
 */

use std::fmt::Write;
use std::path::PathBuf;
use anyhow::Result;
use subpress::subtitle_processor::{SubtitleEntry, Transcript, WordTiming};
use crate::common;

/// Test timestamp formatting from fractional seconds
#[test]
fn test_format_timestamp_withFractionalSeconds_shouldFormatSrtStyle() {
    assert_eq!(SubtitleEntry::format_timestamp(6.1), "00:00:06,100");
    assert_eq!(SubtitleEntry::format_timestamp(0.0), "00:00:00,000");
    assert_eq!(SubtitleEntry::format_timestamp(3723.5), "01:02:03,500");
    assert_eq!(SubtitleEntry::format_timestamp(59.9995), "00:01:00,000");
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5.0, 10.0, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert!(output.contains("1"));
    assert!(output.contains("00:00:05,000 --> 00:00:10,000"));
    assert!(output.contains("Test subtitle"));
}

/// Test validated entry construction rejects bad input
#[test]
fn test_new_validated_withInvalidInput_shouldFail() {
    assert!(SubtitleEntry::new_validated(1, 5.0, 5.0, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 5.0, 4.0, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1.0, 2.0, "   ".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1.0, 2.0, "ok".to_string()).is_ok());
}

/// Test writing a transcript to an SRT file
#[test]
fn test_write_to_srt_withEntries_shouldWriteSequentialBlocks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt_path = temp_dir.path().join("out.srt");

    let mut transcript = Transcript::new(
        PathBuf::from("test.mp4"),
        "en".to_string(),
        "base".to_string(),
    );
    transcript.entries.push(SubtitleEntry::new(1, 0.0, 2.5, "First".to_string()));
    transcript.entries.push(SubtitleEntry::new(2, 3.0, 4.2, "Second".to_string()));

    transcript.write_to_srt(&srt_path)?;

    let content = std::fs::read_to_string(&srt_path)?;
    let expected = "1\n00:00:00,000 --> 00:00:02,500\nFirst\n\n2\n00:00:03,000 --> 00:00:04,200\nSecond\n\n";
    assert_eq!(content, expected);

    Ok(())
}

/// Test word-timestamps JSON document structure
#[test]
fn test_write_word_timestamps_json_withWordTimings_shouldWriteDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json_path = temp_dir.path().join("out_word_timestamps.json");

    let mut transcript = Transcript::new(
        PathBuf::from("test.mp4"),
        "en".to_string(),
        "base".to_string(),
    );
    let mut entry = SubtitleEntry::new(1, 0.0, 2.5, "Hello world.".to_string());
    entry.words.push(WordTiming {
        word: "Hello".to_string(),
        start: Some(0.0),
        end: Some(1.1),
        probability: Some(0.98),
    });
    entry.words.push(WordTiming {
        word: "world.".to_string(),
        start: Some(1.1),
        end: Some(2.5),
        probability: Some(0.95),
    });
    transcript.entries.push(entry);

    let written = transcript.write_word_timestamps_json(&json_path)?;
    assert!(written);

    let document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;

    assert_eq!(document["metadata"]["video_file"], "test.mp4");
    assert_eq!(document["metadata"]["model_used"], "base");
    assert_eq!(document["metadata"]["detected_language"], "en");
    assert!(document["metadata"]["transcription_time"].is_string());

    let segments = document["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0]["segment_id"], 1);
    assert_eq!(segments[0]["text"], "Hello world.");

    let words = segments[0]["words"].as_array().unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0]["word"], "Hello");
    assert_eq!(words[1]["probability"], 0.95);

    Ok(())
}

/// Test JSON generation is skipped when no word timings are present
#[test]
fn test_write_word_timestamps_json_withoutWordTimings_shouldSkip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json_path = temp_dir.path().join("out_word_timestamps.json");

    let mut transcript = Transcript::new(
        PathBuf::from("test.mp4"),
        "en".to_string(),
        "base".to_string(),
    );
    transcript.entries.push(SubtitleEntry::new(1, 0.0, 2.5, "No words here".to_string()));

    let written = transcript.write_word_timestamps_json(&json_path)?;
    assert!(!written);
    assert!(!json_path.exists());

    Ok(())
}

/// Test word timing detection across segments
#[test]
fn test_has_word_timings_withMixedEntries_shouldDetectAny() {
    let mut transcript = Transcript::new(
        PathBuf::from("test.mp4"),
        "en".to_string(),
        "base".to_string(),
    );
    transcript.entries.push(SubtitleEntry::new(1, 0.0, 1.0, "Plain".to_string()));
    assert!(!transcript.has_word_timings());

    let mut entry = SubtitleEntry::new(2, 1.0, 2.0, "Timed".to_string());
    entry.words.push(WordTiming {
        word: "Timed".to_string(),
        start: Some(1.0),
        end: Some(2.0),
        probability: None,
    });
    transcript.entries.push(entry);
    assert!(transcript.has_word_timings());
}
