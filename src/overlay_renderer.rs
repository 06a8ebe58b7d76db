use std::path::Path;
use anyhow::{Result, anyhow};
use log::{error, info, debug};
use tokio::process::Command;

use crate::ass_parser::{OverlayDescriptor, OverlayPosition};
use crate::transcription_service::TranscriptionService;

// @module: Burning overlay descriptors onto video via ffmpeg drawtext

// Pixel margin between edge-anchored text and the frame border
const EDGE_MARGIN: u32 = 40;

/// Renders timed text overlays onto a video.
///
/// Each descriptor becomes one drawtext filter in a single filter graph, so
/// the video is re-encoded exactly once regardless of overlay count.
pub struct OverlayRenderer {
    // @field: Font family passed to drawtext
    font: String,

    // @field: Output video codec
    video_codec: String,

    // @field: Output audio codec
    audio_codec: String,

    // @field: Timeout for the encode in seconds
    timeout_secs: u64,
}

impl OverlayRenderer {
    pub fn new(font: String, video_codec: String, audio_codec: String, timeout_secs: u64) -> Self {
        OverlayRenderer {
            font,
            video_codec,
            audio_codec,
            timeout_secs,
        }
    }

    /// Escape text for use inside a quoted drawtext `text` attribute
    pub fn escape_drawtext(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('\'', "\\\\\\'")
            .replace(':', "\\:")
            .replace('%', "\\%")
    }

    /// Position anchor to drawtext x/y expressions
    fn position_expressions(position: OverlayPosition) -> (String, String) {
        let m = EDGE_MARGIN;
        match position {
            OverlayPosition::Center => ("(w-text_w)/2".to_string(), "(h-text_h)/2".to_string()),
            OverlayPosition::CenterBottom => ("(w-text_w)/2".to_string(), format!("h-text_h-{}", m)),
            OverlayPosition::CenterTop => ("(w-text_w)/2".to_string(), format!("{}", m)),
            OverlayPosition::LeftTop => (format!("{}", m), format!("{}", m)),
            OverlayPosition::RightTop => (format!("w-text_w-{}", m), format!("{}", m)),
            OverlayPosition::LeftBottom => (format!("{}", m), format!("h-text_h-{}", m)),
            OverlayPosition::RightBottom => (format!("w-text_w-{}", m), format!("h-text_h-{}", m)),
        }
    }

    /// Build the drawtext filter for one overlay descriptor
    pub fn build_drawtext_filter(&self, descriptor: &OverlayDescriptor) -> String {
        let (x, y) = Self::position_expressions(descriptor.position);

        let mut filter = format!(
            "drawtext=font='{}':text='{}':fontsize={}:fontcolor={}:x={}:y={}",
            self.font,
            Self::escape_drawtext(&descriptor.text),
            descriptor.font_size,
            descriptor.color,
            x,
            y,
        );

        if let Some(bg_color) = descriptor.bg_color {
            let opacity = descriptor.bg_opacity.unwrap_or(1.0);
            filter.push_str(&format!(
                ":box=1:boxcolor={}@{:.2}:boxborderw=10",
                bg_color, opacity
            ));
        }

        filter.push_str(&format!(
            ":enable='between(t,{},{})'",
            descriptor.start, descriptor.end
        ));

        filter
    }

    /// Build the complete filter graph for a set of descriptors
    pub fn build_filtergraph(&self, descriptors: &[OverlayDescriptor]) -> String {
        descriptors.iter()
            .map(|d| self.build_drawtext_filter(d))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Burn the overlays onto the input video, writing the composited result
    pub async fn render<P: AsRef<Path>>(
        &self,
        input_video: P,
        output_video: P,
        descriptors: &[OverlayDescriptor],
    ) -> Result<()> {
        let input_video = input_video.as_ref();
        let output_video = output_video.as_ref();

        if !input_video.exists() {
            return Err(anyhow!("Input video does not exist: {:?}", input_video));
        }
        if descriptors.is_empty() {
            return Err(anyhow!("No overlay descriptors to render"));
        }

        let filtergraph = self.build_filtergraph(descriptors);
        debug!("Rendering {} overlay(s) with filter graph: {}", descriptors.len(), filtergraph);

        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",
                "-i", input_video.to_str().unwrap_or_default(),
                "-vf", &filtergraph,
                "-c:v", &self.video_codec,
                "-c:a", &self.audio_codec,
                output_video.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg command for overlay rendering: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffmpeg overlay rendering timed out after {} seconds", self.timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = TranscriptionService::filter_ffmpeg_stderr(&stderr);
            error!("Overlay rendering failed: {}", filtered);
            return Err(anyhow!("ffmpeg overlay rendering failed: {}", filtered));
        }

        info!("Rendered {} overlay(s) onto {:?}", descriptors.len(), output_video);
        Ok(())
    }
}
