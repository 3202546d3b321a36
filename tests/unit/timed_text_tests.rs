/*!
 * Tests for timed-text conversion functionality
 */

use serde_json::json;
use bilisub::errors::SubtitleError;
use bilisub::timed_text::{convert_to_srt, format_timestamp, parse_payload, payload_to_srt, SubtitleBlock, TimedTextEntry};
use crate::common;

/// Checks the HH:MM:SS,mmm shape without pulling in a regex engine
fn is_srt_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 12
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b':',
            8 => *b == b',',
            _ => b.is_ascii_digit(),
        })
}

#[test]
fn test_format_timestamp_withZeroFraction_shouldEmitZeroMillis() {
    assert_eq!(format_timestamp(5.0).unwrap(), "00:00:05,000");
    assert_eq!(format_timestamp(0.0).unwrap(), "00:00:00,000");
}

#[test]
fn test_format_timestamp_withHalfSecond_shouldEmitFiveHundred() {
    assert_eq!(format_timestamp(5.5).unwrap(), "00:00:05,500");
}

#[test]
fn test_format_timestamp_withHours_shouldPadToTwoDigits() {
    assert_eq!(format_timestamp(3599.999).unwrap(), "00:59:59,999");
    assert_eq!(format_timestamp(7322.5).unwrap(), "02:02:02,500");
    assert_eq!(format_timestamp(43200.0).unwrap(), "12:00:00,000");
    assert_eq!(format_timestamp(86399.0).unwrap(), "23:59:59,000");
}

#[test]
fn test_format_timestamp_withinOneDay_shouldMatchPattern() {
    let mut t = 0.0;
    while t < 86400.0 {
        let formatted = format_timestamp(t).unwrap();
        assert!(is_srt_timestamp(&formatted), "{} formatted as {}", t, formatted);
        t += 997.123;
    }
}

#[test]
fn test_format_timestamp_withIncreasingOffsets_shouldSortLexicographically() {
    let offsets = [0.0, 0.001, 0.5, 1.0, 59.999, 60.0, 61.25, 599.0, 3599.5, 3600.0, 36000.0, 86399.999];
    let formatted: Vec<String> = offsets.iter().map(|t| format_timestamp(*t).unwrap()).collect();

    for pair in formatted.windows(2) {
        assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
    }
}

#[test]
fn test_convert_to_srt_withSingleEntry_shouldMatchExpectedBlock() {
    let entries = vec![TimedTextEntry::new(0.0, 1.5, "Hi")];
    assert_eq!(convert_to_srt(&entries).unwrap(), "1\n00:00:00,000 --> 00:00:01,500\nHi\n\n");
}

#[test]
fn test_convert_to_srt_withNoEntries_shouldBeEmpty() {
    assert_eq!(convert_to_srt(&[]).unwrap(), "");
}

#[test]
fn test_convert_to_srt_withManyEntries_shouldNumberSequentially() {
    let entries: Vec<TimedTextEntry> = (0..25)
        .map(|i| TimedTextEntry::new(i as f64, i as f64, format!("line {}", i)))
        .collect();

    let srt = convert_to_srt(&entries).unwrap();
    let blocks: Vec<&str> = srt.split("\n\n").filter(|b| !b.is_empty()).collect();

    assert_eq!(blocks.len(), 25);
    for (i, block) in blocks.iter().enumerate() {
        let index_line = block.lines().next().unwrap();
        assert_eq!(index_line, (i + 1).to_string());
    }
}

#[test]
fn test_convert_to_srt_withZeroDurationAndReversedEntries_shouldPassThrough() {
    let entries = vec![
        TimedTextEntry::new(2.0, 2.0, "same"),
        TimedTextEntry::new(5.0, 4.0, "backwards"),
    ];

    let srt = convert_to_srt(&entries).unwrap();
    assert!(srt.contains("1\n00:00:02,000 --> 00:00:02,000\nsame\n\n"));
    assert!(srt.contains("2\n00:00:05,000 --> 00:00:04,000\nbackwards\n\n"));
}

#[test]
fn test_subtitle_block_display_withMultilineText_shouldKeepLines() {
    let block = SubtitleBlock::from_entry(3, &TimedTextEntry::new(1.0, 2.0, "first\nsecond")).unwrap();
    assert_eq!(block.to_string(), "3\n00:00:01,000 --> 00:00:02,000\nfirst\nsecond\n\n");
}

#[test]
fn test_payload_to_srt_withSamplePayload_shouldConvertAllCues() {
    let (srt, count) = payload_to_srt(&common::sample_payload()).unwrap();
    assert_eq!(count, 3);
    assert_eq!(srt, common::SAMPLE_SRT);
}

#[test]
fn test_parse_payload_withMissingContent_shouldReportEntry() {
    let payload = json!({"body": [
        {"from": 0.0, "to": 1.0, "content": "ok"},
        {"from": 1.0, "to": 2.0}
    ]});

    assert_eq!(
        parse_payload(&payload),
        Err(SubtitleError::MalformedEntry { index: 2, field: "content" })
    );
}

#[test]
fn test_parse_payload_withStringOffset_shouldReportField() {
    let payload = json!({"body": [{"from": "0.0", "to": 1.0, "content": "x"}]});

    assert_eq!(
        parse_payload(&payload),
        Err(SubtitleError::MalformedEntry { index: 1, field: "from" })
    );
}

#[test]
fn test_parse_payload_withoutBody_shouldReportDocument() {
    assert_eq!(
        parse_payload(&json!({"type": "AIsubtitle"})),
        Err(SubtitleError::MalformedEntry { index: 0, field: "body" })
    );
}

#[test]
fn test_parse_payload_withEmptyBody_shouldReturnNoEntries() {
    assert!(parse_payload(&json!({"body": []})).unwrap().is_empty());
}
