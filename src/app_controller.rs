use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::ass_parser::AssParser;
use crate::file_utils::{self, FileManager, FileType};
use crate::overlay_renderer::OverlayRenderer;
use crate::storage::ObjectStorageClient;
use crate::transcription_service::TranscriptionService;

// @module: Application controller for subtitling workflows

/// Main application controller for transcription and overlay rendering
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let controller = Self {
            config,
        };

        Ok(controller)
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.whisper.model.is_empty()
    }

    /// Get the expected SRT output path for a video file
    pub fn srt_output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, output_dir, "", "srt")
    }

    /// Get the expected word-timestamps JSON output path for a video file
    pub fn word_timestamps_output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, output_dir, "_word_timestamps", "json")
    }

    /// Get the expected subtitled video output path for a burn run
    pub fn subtitled_output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, output_dir, ".subtitled", "mp4")
    }

    /// Run the transcription workflow for one video file
    pub async fn run_transcribe(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_transcribe_with_progress(input_file, output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the transcription workflow with progress reporting
    async fn run_transcribe_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        file_utils::FileManager::ensure_dir(&output_dir)?;

        // Check if the subtitle output already exists
        let srt_path = self.srt_output_path(&input_file, &output_dir);
        if srt_path.exists() && !force_overwrite {
            warn!("Skipping file, subtitles already exist (use -f to force overwrite)");
            return Ok(());
        }

        let file_type = FileManager::detect_file_type(&input_file)?;
        if file_type != FileType::Video {
            return Err(anyhow::anyhow!(
                "Input is not a video file: {:?} (detected {:?})",
                input_file, file_type
            ));
        }

        let spinner = multi_progress.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(120));

        info!("Starting subtitle generation for: {:?}", input_file);
        info!("Using whisper model: {}", self.config.whisper.model);

        // Extract audio to a pid-qualified temp file next to the video
        spinner.set_message("Extracting audio");
        let temp_audio = TranscriptionService::temp_audio_path(&input_file);
        let extraction_result = TranscriptionService::extract_audio(&input_file, &temp_audio).await;

        if let Err(e) = extraction_result {
            Self::cleanup_temp_audio(&temp_audio);
            spinner.finish_and_clear();
            return Err(e).context("Audio extraction failed");
        }
        debug!("Audio extracted to: {:?}", temp_audio);

        // Transcribe the extracted audio
        spinner.set_message("Transcribing (this may take a while)");
        let service = TranscriptionService::new(
            self.config.whisper.model.clone(),
            self.config.whisper.word_level,
            self.config.whisper.timeout_secs,
            self.config.whisper.language.clone(),
        )?;

        let transcript_result = service.transcribe(&temp_audio, &input_file).await;

        // The temp audio is removed whether or not transcription succeeded
        Self::cleanup_temp_audio(&temp_audio);

        let transcript = match transcript_result {
            Ok(t) => t,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e).context("Transcription failed");
            }
        };

        // Write the SRT file
        spinner.set_message("Writing subtitle files");
        transcript.write_to_srt(&srt_path)?;
        info!("SRT file saved to: {}", srt_path.display());

        // Write the word-level JSON when requested
        if self.config.whisper.word_level {
            let json_path = self.word_timestamps_output_path(&input_file, &output_dir);
            if transcript.write_word_timestamps_json(&json_path)? {
                info!("JSON file saved to: {}", json_path.display());
            }
        }

        spinner.finish_and_clear();

        let elapsed = start_time.elapsed();
        info!(
            "Transcription complete: {} segment(s) in {}",
            transcript.entries.len(),
            Self::format_duration(elapsed)
        );

        Ok(())
    }

    /// Run the transcription workflow for all videos in a directory
    pub async fn run_transcribe_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Find all video files in the directory (recursive)
        let mut video_files = Vec::new();
        for ext in &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm"] {
            let mut files = file_utils::FileManager::find_files(&input_dir, ext)?;
            video_files.append(&mut files);
        }

        if video_files.is_empty() {
            return Err(anyhow::anyhow!("No video files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(video_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result);
        folder_pb.set_message("Processing files");

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for video_file in video_files.iter() {
            let file_name = video_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = match video_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            let srt_path = self.srt_output_path(video_file, &output_dir);
            if srt_path.exists() && !force_overwrite {
                warn!("Skipping file, subtitles already exist (use -f to force overwrite)");
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            match self.run_transcribe_with_progress(video_file.clone(), output_dir, &multi_progress, force_overwrite).await {
                Ok(_) => {
                    success_count += 1;
                },
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let duration = start_time.elapsed();
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors - Duration: {}",
            success_count, skip_count, error_count,
            Self::format_duration(duration)
        );

        Ok(())
    }

    /// Run the overlay burn workflow: parse an ASS script and composite its
    /// captions onto the video
    pub async fn run_burn(
        &self,
        input_video: PathBuf,
        script_path: PathBuf,
        output_video: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_video.exists() {
            return Err(anyhow::anyhow!("Input video does not exist: {:?}", input_video));
        }
        if !script_path.exists() {
            return Err(anyhow::anyhow!("Subtitle script does not exist: {:?}", script_path));
        }

        let output_dir = input_video.parent().unwrap_or(Path::new(".")).to_path_buf();
        let output_path = output_video
            .unwrap_or_else(|| self.subtitled_output_path(&input_video, &output_dir));

        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Parse the script into overlay descriptors
        let content = FileManager::read_to_string(&script_path)?;
        let descriptors = AssParser::parse_script(&content)
            .context("Failed to parse subtitle script")?;

        if descriptors.is_empty() {
            warn!("No dialogue lines found in script: {:?}", script_path);
            return Ok(());
        }

        info!("Burning {} caption(s) onto {:?}", descriptors.len(), input_video);

        let renderer = OverlayRenderer::new(
            self.config.overlay.font.clone(),
            self.config.overlay.video_codec.clone(),
            self.config.overlay.audio_codec.clone(),
            self.config.overlay.timeout_secs,
        );

        renderer.render(&input_video, &output_path, &descriptors).await?;

        let elapsed = start_time.elapsed();
        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(elapsed)
        );

        Ok(())
    }

    /// Fetch an object from storage and write it to a local file
    pub async fn run_fetch(&self, object_name: &str, output_path: PathBuf) -> Result<()> {
        let client = ObjectStorageClient::new(
            self.config.storage.endpoint.clone(),
            self.config.storage.bucket.clone(),
            self.config.storage.timeout_secs,
        );

        let size = client.download_to_file(object_name, &output_path).await?;
        info!(
            "Read {} bytes from storage into {}",
            size,
            output_path.display()
        );

        Ok(())
    }

    /// Report the recursive size of a directory
    pub fn run_directory_size(&self, path: &Path) -> Result<u64> {
        let size_bytes = FileManager::directory_size(path)?;
        info!(
            "Directory size of {:?}: {}",
            path,
            FileManager::format_size_mb(size_bytes)
        );
        Ok(size_bytes)
    }

    // Remove the temp audio file, tolerating failures
    fn cleanup_temp_audio(temp_audio: &Path) {
        if temp_audio.exists() {
            debug!("Cleaning up temporary audio file: {:?}", temp_audio);
            if let Err(e) = std::fs::remove_file(temp_audio) {
                warn!("Error deleting temporary file {:?}: {}", temp_audio, e);
            }
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
