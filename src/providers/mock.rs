/*!
 * In-memory provider for tests.
 *
 * `MockProvider` serves canned video metadata, track lists and payloads and
 * records every call it receives, so callers can assert on network traffic
 * without touching the network:
 * - unknown BV ids answer with the platform's "video not found" status
 * - unknown cids answer with an empty track list
 * - `fail_payload` makes a payload URL fail with a transport error
 */

use std::collections::{HashMap, HashSet};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::identifiers::Bvid;
use crate::providers::{SubtitleTrack, VideoInfo, VideoPage, VideoProvider};

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    VideoInfo(String),
    SubtitleTracks(String, u64),
    SubtitlePayload(String),
}

/// Mock provider backed by hash maps
#[derive(Debug, Default)]
pub struct MockProvider {
    videos: HashMap<String, VideoInfo>,
    tracks: HashMap<u64, Vec<SubtitleTrack>>,
    payloads: HashMap<String, Value>,
    failing_payloads: HashSet<String>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a video with the given `(cid, part title)` segments
    pub fn with_video(mut self, bvid: &str, title: &str, parts: &[(u64, &str)]) -> Self {
        let pages = parts
            .iter()
            .enumerate()
            .map(|(i, (cid, part))| VideoPage {
                page: (i + 1) as u32,
                cid: *cid,
                part: part.to_string(),
            })
            .collect();

        self.videos.insert(
            bvid.to_string(),
            VideoInfo {
                bvid: bvid.to_string(),
                title: title.to_string(),
                pages,
            },
        );
        self
    }

    /// Attach one subtitle track to `cid`, served with `payload` at `url`
    pub fn with_subtitle(mut self, cid: u64, lan: &str, url: &str, payload: Value) -> Self {
        let tracks = self.tracks.entry(cid).or_default();
        tracks.push(SubtitleTrack {
            id: tracks.len() as i64 + 1,
            lan: lan.to_string(),
            lan_doc: lan.to_string(),
            subtitle_url: url.to_string(),
        });

        self.payloads.insert(super::normalize_subtitle_url(url), payload);
        self
    }

    /// Make downloads of `url` fail
    pub fn fail_payload(mut self, url: &str) -> Self {
        self.failing_payloads.insert(super::normalize_subtitle_url(url));
        self
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl VideoProvider for MockProvider {
    async fn video_info(&self, bvid: &Bvid) -> Result<VideoInfo, ProviderError> {
        self.record(MockCall::VideoInfo(bvid.to_string()));

        self.videos
            .get(bvid.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::ApiStatus {
                code: -404,
                message: "啥都木有".to_string(),
            })
    }

    async fn subtitle_tracks(&self, bvid: &Bvid, cid: u64) -> Result<Vec<SubtitleTrack>, ProviderError> {
        self.record(MockCall::SubtitleTracks(bvid.to_string(), cid));

        Ok(self.tracks.get(&cid).cloned().unwrap_or_default())
    }

    async fn subtitle_payload(&self, url: &str) -> Result<Value, ProviderError> {
        self.record(MockCall::SubtitlePayload(url.to_string()));

        if self.failing_payloads.contains(url) {
            return Err(ProviderError::ConnectionError(format!("{}: connection reset", url)));
        }

        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::HttpStatus {
                status_code: 404,
                message: "Not Found".to_string(),
            })
    }
}
