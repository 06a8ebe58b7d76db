/*!
 * End-to-end tests for the script-to-overlay workflow
 */

use anyhow::Result;
use subpress::app_config::Config;
use subpress::app_controller::Controller;
use subpress::ass_parser::{AssParser, OverlayColor};
use subpress::overlay_renderer::OverlayRenderer;
use crate::common;

/// Test the full path from a script file on disk to a filter graph
#[test]
fn test_script_to_filtergraph_withSampleScript_shouldBuildOneFilterPerCaption() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "captions.ass")?;

    let content = std::fs::read_to_string(&script_path)?;
    let descriptors = AssParser::parse_script(&content)?;
    assert_eq!(descriptors.len(), 3);

    let config = Config::default();
    let renderer = OverlayRenderer::new(
        config.overlay.font.clone(),
        config.overlay.video_codec.clone(),
        config.overlay.audio_codec.clone(),
        config.overlay.timeout_secs,
    );
    let graph = renderer.build_filtergraph(&descriptors);

    assert_eq!(graph.matches("drawtext=").count(), 3);
    assert!(graph.contains("fontcolor=blue"));
    assert!(graph.contains("fontcolor=white"));
    assert!(graph.contains("fontcolor=magenta"));
    assert!(graph.contains("enable='between(t,2,5.5)'"));
    assert!(graph.contains("enable='between(t,10,13.25)'"));

    Ok(())
}

/// Test descriptor ordering survives the whole parse
#[test]
fn test_parse_sample_script_shouldPreserveDialogueOrder() -> Result<()> {
    let descriptors = AssParser::parse_script(common::sample_ass_script())?;

    let starts: Vec<f64> = descriptors.iter().map(|d| d.start).collect();
    assert_eq!(starts, vec![2.0, 6.1, 10.0]);
    assert_eq!(descriptors[0].color, OverlayColor::Blue);

    Ok(())
}

/// Test controller construction and output path derivation
#[test]
fn test_controller_output_paths_withVideoInput_shouldDeriveArtifacts() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(controller.is_initialized());

    let input = std::path::Path::new("clips/movie.mp4");
    let out_dir = std::path::Path::new("clips");

    assert_eq!(
        controller.srt_output_path(input, out_dir),
        std::path::Path::new("clips/movie.srt")
    );
    assert_eq!(
        controller.word_timestamps_output_path(input, out_dir),
        std::path::Path::new("clips/movie_word_timestamps.json")
    );
    assert_eq!(
        controller.subtitled_output_path(input, out_dir),
        std::path::Path::new("clips/movie.subtitled.mp4")
    );

    Ok(())
}

/// Test the burn workflow rejects missing inputs before rendering
#[tokio::test]
async fn test_run_burn_withMissingInputs_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let missing_video = temp_dir.path().join("absent.mp4");
    let script = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "captions.ass")?;

    let result = controller
        .run_burn(missing_video, script, None, false)
        .await;
    assert!(result.is_err());

    Ok(())
}

/// Test the burn workflow treats a script without dialogue as a no-op
#[tokio::test]
async fn test_run_burn_withEmptyScript_shouldSucceedWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let controller = Controller::new_for_test()?;

    let video = common::create_test_file(&root, "clip.mp4", "stub")?;
    let script = common::create_test_file(&root, "empty.ass", "[Events]\n")?;

    controller.run_burn(video, script, None, false).await?;

    assert!(!root.join("clip.subtitled.mp4").exists());

    Ok(())
}

/// Test the directory size report over a populated tree
#[test]
fn test_run_directory_size_withFiles_shouldReturnTotal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_test_file(&root, "a.mp4", "123")?;
    common::create_test_file(&root, "b.srt", "4567")?;

    let controller = Controller::new_for_test()?;
    let size = controller.run_directory_size(temp_dir.path())?;
    assert_eq!(size, 7);

    Ok(())
}
