use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::cookies::CookieJar;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::identifiers::Bvid;
use crate::providers::bilibili::BilibiliClient;
use crate::providers::{resolve_subtitle_url, VideoPage, VideoProvider};
use crate::timed_text;

// @module: Application controller for subtitle downloads

/// Result of processing one segment
#[derive(Debug, Clone, PartialEq)]
pub enum PartOutcome {
    /// Payload and converted subtitle were written
    Saved {
        part_number: usize,
        cid: u64,
        json_path: PathBuf,
        srt_path: PathBuf,
        cue_count: usize,
    },
    /// The segment has no subtitle tracks
    NoSubtitles { part_number: usize, cid: u64 },
}

/// Result of processing one video
#[derive(Debug, Clone)]
pub struct VideoReport {
    pub bvid: Bvid,
    pub title: String,
    pub output_dir: PathBuf,
    pub parts: Vec<PartOutcome>,
}

impl VideoReport {
    /// Number of segments whose subtitles were saved
    pub fn saved_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, PartOutcome::Saved { .. }))
            .count()
    }
}

/// Success counts of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully processed {}/{} BV IDs.",
            self.succeeded, self.attempted
        )
    }
}

/// Main application controller for subtitle downloads
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Platform client
    provider: Arc<dyn VideoProvider>,
}

impl Controller {
    // @method: Create a controller with an explicit provider
    pub fn new(config: Config, provider: Arc<dyn VideoProvider>) -> Self {
        Self { config, provider }
    }

    // @method: Create a controller talking to the live platform
    pub fn with_config(config: Config) -> Result<Self> {
        let cookies = CookieJar::load(&config.cookies_path);
        let client = BilibiliClient::new(config.http.clone(), &cookies, &config.rate_limit)
            .context("Failed to create HTTP client")?;

        Ok(Self::new(config, Arc::new(client)))
    }

    /// Download every subtitle of one video
    ///
    /// An invalid identifier fails before any file or network access. A failing
    /// segment aborts the remaining segments; files already written are kept.
    pub async fn process_video(&self, raw_id: &str) -> Result<VideoReport> {
        let bvid = Bvid::parse(raw_id)?;

        let output_dir = FileManager::output_dir_for(
            &self.config.output.root_dir,
            &self.config.output.dir_prefix,
            &bvid,
        );
        FileManager::ensure_dir(&output_dir)?;

        info!("Getting information for video {}...", bvid);
        let video = self.provider.video_info(&bvid).await
            .context("Failed to get video info")?;

        if !video.title.is_empty() {
            info!("Title: {}", video.title);
        }

        match video.pages.len() {
            0 => warn!("Video {} reports no parts.", bvid),
            1 => info!("This is a single-part video."),
            n => info!("This is a multi-part video with {} parts.", n),
        }

        let mut parts = Vec::with_capacity(video.pages.len());
        for (i, page) in video.pages.iter().enumerate() {
            let part_number = i + 1;
            let outcome = self.process_part(&bvid, part_number, page, &output_dir).await
                .with_context(|| format!("Failed on part {} (CID: {})", part_number, page.cid))?;
            parts.push(outcome);
        }

        info!("All subtitles have been downloaded to the {} directory.", output_dir.display());

        Ok(VideoReport {
            bvid,
            title: video.title,
            output_dir,
            parts,
        })
    }

    async fn process_part(&self, bvid: &Bvid, part_number: usize, page: &VideoPage, output_dir: &Path) -> Result<PartOutcome> {
        info!("Processing part {}: {} (CID: {})...", part_number, page.part, page.cid);

        let tracks = self.provider.subtitle_tracks(bvid, page.cid).await
            .context("Failed to get subtitle info")?;

        let preferred = self.config.subtitles.preferred_language.as_deref();
        let Some(url) = resolve_subtitle_url(&tracks, preferred) else {
            info!("No subtitle found for part {}.", part_number);
            return Ok(PartOutcome::NoSubtitles { part_number, cid: page.cid });
        };

        let payload = self.provider.subtitle_payload(&url).await
            .context("Failed to download subtitle")?;

        let (json_path, srt_path) = FileManager::part_paths(output_dir, part_number, page.cid);
        FileManager::write_json(&json_path, &payload)?;

        let (srt, cue_count) = timed_text::payload_to_srt(&payload)
            .with_context(|| format!("Failed to convert {}", json_path.display()))?;
        FileManager::write_to_file(&srt_path, &srt)?;

        info!(
            "Subtitle for part {} saved to {} and {} ({} cues)",
            part_number,
            json_path.display(),
            srt_path.display(),
            cue_count
        );

        Ok(PartOutcome::Saved {
            part_number,
            cid: page.cid,
            json_path,
            srt_path,
            cue_count,
        })
    }

    /// Process identifiers one at a time; a failing identifier never stops the batch
    pub async fn run_batch(&self, ids: &[String]) -> BatchSummary {
        let mut summary = BatchSummary {
            attempted: ids.len(),
            succeeded: 0,
        };

        for (i, id) in ids.iter().enumerate() {
            info!("Processing BV ID {}/{}: {}", i + 1, ids.len(), id);

            match self.process_video(id).await {
                Ok(report) => {
                    info!(
                        "Finished {}: {} of {} part(s) had subtitles",
                        report.bvid,
                        report.saved_count(),
                        report.parts.len()
                    );
                    summary.succeeded += 1;
                }
                Err(e) => match e.downcast_ref::<AppError>() {
                    Some(AppError::InvalidIdentifier(_)) => warn!("{}. Skipping.", e),
                    _ => error!("An error occurred while processing {}: {:#}", id, e),
                },
            }
        }

        info!("Processing completed. {}", summary);
        summary
    }

    /// Read an identifier list file; unreadable files count as empty
    pub fn read_ids_from_file<P: AsRef<Path>>(path: P) -> Vec<String> {
        match FileManager::read_id_list(&path) {
            Ok(ids) => ids,
            Err(e) => {
                error!("Error reading BV IDs from file {}: {:#}", path.as_ref().display(), e);
                Vec::new()
            }
        }
    }
}
