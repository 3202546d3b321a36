/*!
 * Video platform clients.
 *
 * This module contains the interface the controller uses to reach the platform:
 * - `bilibili`: reqwest-backed client for the public web API
 * - `mock`: in-memory provider for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use log::warn;

use crate::errors::ProviderError;
use crate::identifiers::Bvid;

/// Metadata of a video and its segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub bvid: String,

    #[serde(default)]
    pub title: String,

    /// Segments in playback order
    #[serde(default)]
    pub pages: Vec<VideoPage>,
}

/// One segment (part) of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPage {
    /// 1-based part number as reported by the platform
    #[serde(default)]
    pub page: u32,

    /// Content id
    pub cid: u64,

    /// Part title
    #[serde(default)]
    pub part: String,
}

/// Descriptor of one subtitle track attached to a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    #[serde(default)]
    pub id: i64,

    /// Language code, e.g. "zh-CN" or "ai-zh"
    #[serde(default)]
    pub lan: String,

    /// Human-readable language name
    #[serde(default)]
    pub lan_doc: String,

    /// Payload URL, possibly scheme-relative
    #[serde(default)]
    pub subtitle_url: String,
}

/// Common interface to the video platform
///
/// Every method corresponds to one remote call; implementations are
/// responsible for pacing and retrying their own requests.
#[async_trait]
pub trait VideoProvider: Send + Sync + Debug {
    /// Fetch metadata, including the segment list, for `bvid`
    async fn video_info(&self, bvid: &Bvid) -> Result<VideoInfo, ProviderError>;

    /// List the subtitle tracks of segment `cid`; an empty list is a normal result
    async fn subtitle_tracks(&self, bvid: &Bvid, cid: u64) -> Result<Vec<SubtitleTrack>, ProviderError>;

    /// Fetch the raw timed-text payload from `url`
    async fn subtitle_payload(&self, url: &str) -> Result<Value, ProviderError>;
}

/// Prefix `https:` to URLs that lack a scheme
pub fn normalize_subtitle_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https:{}", url)
    }
}

/// Pick a track and return its normalized URL
///
/// Prefers the track whose `lan` matches `preferred_language` (case-insensitive),
/// otherwise the first one. Returns `None` when there are no usable tracks.
pub fn resolve_subtitle_url(tracks: &[SubtitleTrack], preferred_language: Option<&str>) -> Option<String> {
    let first = tracks.iter().find(|t| !t.subtitle_url.is_empty())?;

    let selected = match preferred_language {
        Some(lang) => match tracks
            .iter()
            .find(|t| !t.subtitle_url.is_empty() && t.lan.eq_ignore_ascii_case(lang))
        {
            Some(track) => track,
            None => {
                warn!(
                    "No subtitle track matching requested language: {}. Available languages: {}. Using {}.",
                    lang,
                    tracks.iter().map(|t| t.lan.as_str()).collect::<Vec<_>>().join(", "),
                    first.lan
                );
                first
            }
        },
        None => first,
    };

    Some(normalize_subtitle_url(&selected.subtitle_url))
}

pub mod bilibili;
pub mod mock;
