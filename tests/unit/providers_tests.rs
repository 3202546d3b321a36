/*!
 * Tests for provider helpers and the mock provider
 */

use anyhow::Result;
use bilisub::identifiers::Bvid;
use bilisub::providers::mock::{MockCall, MockProvider};
use bilisub::providers::{normalize_subtitle_url, resolve_subtitle_url, SubtitleTrack, VideoProvider};
use crate::common;

fn track(lan: &str, url: &str) -> SubtitleTrack {
    SubtitleTrack {
        id: 0,
        lan: lan.to_string(),
        lan_doc: lan.to_string(),
        subtitle_url: url.to_string(),
    }
}

#[test]
fn test_normalize_subtitle_url_withSchemeRelative_shouldPrefixHttps() {
    assert_eq!(normalize_subtitle_url("//host/x.json"), "https://host/x.json");
    assert_eq!(normalize_subtitle_url("https://host/x.json"), "https://host/x.json");
    assert_eq!(normalize_subtitle_url("http://host/x.json"), "http://host/x.json");
}

#[test]
fn test_resolve_subtitle_url_withEmptyList_shouldReturnNone() {
    assert_eq!(resolve_subtitle_url(&[], None), None);
    assert_eq!(resolve_subtitle_url(&[track("zh-CN", "")], None), None);
}

#[test]
fn test_resolve_subtitle_url_withoutPreference_shouldPickFirst() {
    let tracks = [track("zh-CN", "//a/zh.json"), track("en-US", "//a/en.json")];
    assert_eq!(resolve_subtitle_url(&tracks, None).as_deref(), Some("https://a/zh.json"));
}

#[test]
fn test_resolve_subtitle_url_withPreference_shouldPickMatchingLanguage() {
    let tracks = [track("zh-CN", "//a/zh.json"), track("en-US", "//a/en.json")];
    assert_eq!(resolve_subtitle_url(&tracks, Some("en-us")).as_deref(), Some("https://a/en.json"));
}

#[test]
fn test_resolve_subtitle_url_withUnknownPreference_shouldFallBackToFirst() {
    let tracks = [track("ai-zh", "//a/ai.json")];
    assert_eq!(resolve_subtitle_url(&tracks, Some("ja")).as_deref(), Some("https://a/ai.json"));
}

#[tokio::test]
async fn test_mock_provider_withRegisteredVideo_shouldServeAndRecord() -> Result<()> {
    let provider = MockProvider::new()
        .with_video("BV1test", "Test video", &[(11, "P1")])
        .with_subtitle(11, "zh-CN", "//cdn/11.json", common::sample_payload());
    let bvid = Bvid::parse("BV1test")?;

    let info = provider.video_info(&bvid).await?;
    assert_eq!(info.pages[0].cid, 11);
    assert_eq!(info.pages[0].page, 1);

    let tracks = provider.subtitle_tracks(&bvid, 11).await?;
    let url = resolve_subtitle_url(&tracks, None).unwrap();
    let payload = provider.subtitle_payload(&url).await?;
    assert_eq!(payload, common::sample_payload());

    assert_eq!(provider.calls(), vec![
        MockCall::VideoInfo("BV1test".to_string()),
        MockCall::SubtitleTracks("BV1test".to_string(), 11),
        MockCall::SubtitlePayload("https://cdn/11.json".to_string()),
    ]);
    Ok(())
}

#[tokio::test]
async fn test_mock_provider_withUnknownVideo_shouldReturnApiStatus() -> Result<()> {
    let provider = MockProvider::new();
    let result = provider.video_info(&Bvid::parse("BV1missing")?).await;

    assert!(matches!(result, Err(bilisub::ProviderError::ApiStatus { code: -404, .. })));
    Ok(())
}
