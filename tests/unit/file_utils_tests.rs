/*!
 * Tests for file and directory utilities
 */

use std::path::Path;
use anyhow::Result;
use subpress::file_utils::{FileManager, FileType};
use crate::common;

/// Test output path generation for the different pipeline artifacts
#[test]
fn test_generate_output_path_withSuffixAndExtension_shouldBuildFilename() {
    let srt = FileManager::generate_output_path("clips/movie.mp4", "out", "", "srt");
    assert_eq!(srt, Path::new("out/movie.srt"));

    let json = FileManager::generate_output_path("clips/movie.mp4", "out", "_word_timestamps", "json");
    assert_eq!(json, Path::new("out/movie_word_timestamps.json"));

    let video = FileManager::generate_output_path("clips/movie.mp4", "out", ".subtitled", "mp4");
    assert_eq!(video, Path::new("out/movie.subtitled.mp4"));
}

/// Test directory size accumulates file sizes recursively
#[test]
fn test_directory_size_withNestedFiles_shouldSumAllBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    common::create_test_file(&root, "a.bin", "12345")?;
    let nested = root.join("nested");
    std::fs::create_dir(&nested)?;
    common::create_test_file(&nested, "b.bin", "1234567890")?;

    let size = FileManager::directory_size(&root)?;
    assert_eq!(size, 15);

    Ok(())
}

/// Test an empty directory has zero size
#[test]
fn test_directory_size_withEmptyDirectory_shouldBeZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert_eq!(FileManager::directory_size(temp_dir.path())?, 0);
    Ok(())
}

/// Test the megabyte formatter
#[test]
fn test_format_size_mb_withByteCounts_shouldFormatTwoDecimals() {
    assert_eq!(FileManager::format_size_mb(0), "0.00 MB");
    assert_eq!(FileManager::format_size_mb(1024 * 1024), "1.00 MB");
    assert_eq!(FileManager::format_size_mb(1536 * 1024), "1.50 MB");
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&root, "clip.mp4", "")?;
    assert_eq!(FileManager::detect_file_type(&video)?, FileType::Video);

    let srt = common::create_test_file(&root, "clip.srt", "")?;
    assert_eq!(FileManager::detect_file_type(&srt)?, FileType::Subtitle);

    let ass = common::create_test_file(&root, "clip.ass", "")?;
    assert_eq!(FileManager::detect_file_type(&ass)?, FileType::AssScript);

    Ok(())
}

/// Test file type detection falls back to content inspection
#[test]
fn test_detect_file_type_withoutExtension_shouldInspectContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    let script = common::create_test_file(&root, "script", "[Events]\nDialogue: ...")?;
    assert_eq!(FileManager::detect_file_type(&script)?, FileType::AssScript);

    let subtitle = common::create_test_file(&root, "subtitle", "1\n00:00:01,000 --> 00:00:02,000\nHi\n")?;
    assert_eq!(FileManager::detect_file_type(&subtitle)?, FileType::Subtitle);

    let unknown = common::create_test_file(&root, "mystery", "hello")?;
    assert_eq!(FileManager::detect_file_type(&unknown)?, FileType::Unknown);

    Ok(())
}

/// Test finding files by extension, case-insensitively
#[test]
fn test_find_files_withMixedExtensions_shouldMatchCaseInsensitive() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    common::create_test_file(&root, "one.mp4", "")?;
    common::create_test_file(&root, "two.MP4", "")?;
    common::create_test_file(&root, "three.mkv", "")?;

    let mut found = FileManager::find_files(&root, "mp4")?;
    found.sort();
    assert_eq!(found.len(), 2);

    Ok(())
}

/// Test write helper creates parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/nested/file.txt");

    FileManager::write_to_file(&path, "content")?;
    assert_eq!(FileManager::read_to_string(&path)?, "content");

    Ok(())
}
