use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::app_config::{HttpConfig, RateLimitConfig};
use crate::cookies::CookieJar;
use crate::errors::ProviderError;
use crate::identifiers::Bvid;
use crate::providers::{SubtitleTrack, VideoInfo, VideoProvider};
use crate::rate_limit::{RateLimiter, RetryPolicy};

/// Envelope codes the platform uses to signal throttling
const THROTTLE_CODES: [i64; 3] = [-412, -509, -799];

/// JSON envelope wrapping every web API response
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// 0 on success
    pub code: i64,

    #[serde(default)]
    pub message: String,

    pub data: Option<T>,
}

/// `data` of the player endpoint
#[derive(Debug, Deserialize)]
pub struct PlayerData {
    #[serde(default)]
    pub subtitle: Option<PlayerSubtitle>,
}

/// Subtitle section of the player endpoint
#[derive(Debug, Deserialize, Serialize)]
pub struct PlayerSubtitle {
    #[serde(default)]
    pub subtitles: Vec<SubtitleTrack>,
}

/// Client for the Bilibili web API
pub struct BilibiliClient {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint and header settings
    http: HttpConfig,
    /// Spacing between consecutive requests
    limiter: RateLimiter,
    /// Backoff for throttled requests
    retry: RetryPolicy,
    /// Number of cookies attached to requests
    cookie_count: usize,
}

impl fmt::Debug for BilibiliClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BilibiliClient")
            .field("api_base", &self.http.api_base)
            .field("limiter", &self.limiter)
            .field("retry", &self.retry)
            .field("cookie_count", &self.cookie_count)
            .finish()
    }
}

impl BilibiliClient {
    /// Create a new client; cookies are sent with every request
    pub fn new(http: HttpConfig, cookies: &CookieJar, rate_limit: &RateLimitConfig) -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        if let Some(cookie_header) = cookies.header_value() {
            let value = header::HeaderValue::from_str(&cookie_header)
                .map_err(|e| ProviderError::RequestFailed(format!("Invalid cookie header: {}", e)))?;
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(http.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            http,
            limiter: RateLimiter::from(rate_limit),
            retry: RetryPolicy::from(rate_limit),
            cookie_count: cookies.len(),
        })
    }

    fn api_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ProviderError> {
        let raw = format!("{}{}", self.http.api_base.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid API URL {}: {}", raw, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn referer_for(&self, bvid: &Bvid) -> String {
        format!("{}{}", self.http.referer_base, bvid)
    }

    /// Send a single paced GET and decode the body as JSON
    async fn fetch_json(&self, url: &str, referer: Option<&str>) -> Result<Value, ProviderError> {
        self.limiter.acquire().await;

        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(format!("{}: {}", url, e))
            } else {
                ProviderError::RequestFailed(format!("{}: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::PRECONDITION_FAILED {
            let retry_after_secs = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(ProviderError::RateLimitExceeded {
                message: format!("{} returned {}", url, status),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("HTTP error ({}) from {}: {}", status, url, error_text);
            return Err(ProviderError::HttpStatus {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response.json::<Value>().await
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", url, e)))
    }

    /// GET an API endpoint and unwrap its `{code, message, data}` envelope
    async fn api_get<T: DeserializeOwned>(&self, url: Url, referer: String, what: &str) -> Result<T, ProviderError> {
        let url = url.to_string();
        self.retry
            .run(what, || {
                let url = url.as_str();
                let referer = referer.as_str();
                async move { self.fetch_json(url, Some(referer)).await.and_then(decode_envelope) }
            })
            .await
    }
}

/// Unwrap a `{code, message, data}` envelope
pub fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<T, ProviderError> {
    let envelope: ApiEnvelope<T> = serde_json::from_value(body)
        .map_err(|e| ProviderError::ParseError(e.to_string()))?;

    if envelope.code != 0 {
        if THROTTLE_CODES.contains(&envelope.code) {
            return Err(ProviderError::RateLimitExceeded {
                message: format!("{} ({})", envelope.message, envelope.code),
                retry_after_secs: None,
            });
        }
        return Err(ProviderError::ApiStatus {
            code: envelope.code,
            message: envelope.message,
        });
    }

    envelope.data
        .ok_or_else(|| ProviderError::ParseError("Response has no data field".to_string()))
}

#[async_trait]
impl VideoProvider for BilibiliClient {
    async fn video_info(&self, bvid: &Bvid) -> Result<VideoInfo, ProviderError> {
        let url = self.api_url("/x/web-interface/view", &[("bvid", bvid.to_string())])?;
        debug!("Requesting video info from: {}", url);

        self.api_get(url, self.referer_for(bvid), "Video info request").await
    }

    async fn subtitle_tracks(&self, bvid: &Bvid, cid: u64) -> Result<Vec<SubtitleTrack>, ProviderError> {
        let url = self.api_url(
            "/x/player/wbi/v2",
            &[("bvid", bvid.to_string()), ("cid", cid.to_string())],
        )?;
        info!("Requesting subtitle info from: {}", url);

        let data: PlayerData = self.api_get(url, self.referer_for(bvid), "Subtitle info request").await?;
        let subtitle = data.subtitle.unwrap_or(PlayerSubtitle { subtitles: Vec::new() });

        if log::max_level() >= log::LevelFilter::Debug {
            if let Ok(pretty) = serde_json::to_string_pretty(&subtitle) {
                debug!("Subtitle data: {}", pretty);
            }
        }

        Ok(subtitle.subtitles)
    }

    async fn subtitle_payload(&self, url: &str) -> Result<Value, ProviderError> {
        debug!("Downloading subtitle payload from: {}", url);

        self.retry
            .run("Subtitle download", || async move { self.fetch_json(url, None).await })
            .await
    }
}
