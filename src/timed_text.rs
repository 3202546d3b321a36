use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::SubtitleError;

// @module: Timed-text (BCC JSON) model and SRT conversion

// @struct: Single cue from a timed-text payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedTextEntry {
    // @field: Start offset in seconds
    pub from: f64,

    // @field: End offset in seconds
    pub to: f64,

    // @field: Cue text
    pub content: String,
}

impl TimedTextEntry {
    pub fn new(from: f64, to: f64, content: impl Into<String>) -> Self {
        TimedTextEntry {
            from,
            to,
            content: content.into(),
        }
    }
}

// @struct: Numbered SRT block derived from a cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleBlock {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Formatted start timestamp
    pub start: String,

    // @field: Formatted end timestamp
    pub end: String,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleBlock {
    /// Build the block for `entry` at 1-based position `index`
    pub fn from_entry(index: usize, entry: &TimedTextEntry) -> Result<Self, SubtitleError> {
        Ok(SubtitleBlock {
            index,
            start: format_timestamp(entry.from)?,
            end: format_timestamp(entry.to)?,
            text: entry.content.clone(),
        })
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Format an offset in fractional seconds as an SRT timestamp (HH:MM:SS,mmm)
///
/// The offset is rounded to the nearest millisecond. Hours are zero-padded to
/// two digits and grow wider past 99.
pub fn format_timestamp(seconds: f64) -> Result<String, SubtitleError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SubtitleError::InvalidTimestamp(seconds));
    }

    let ms = (seconds * 1000.0).round() as u64;
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    Ok(format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis))
}

/// Convert cues to SRT text, numbering blocks from 1 in input order
pub fn convert_to_srt(entries: &[TimedTextEntry]) -> Result<String, SubtitleError> {
    let mut srt = String::new();

    for (i, entry) in entries.iter().enumerate() {
        let block = SubtitleBlock::from_entry(i + 1, entry)?;
        srt.push_str(&block.to_string());
    }

    Ok(srt)
}

/// Extract the cue list from a raw payload of the form `{"body": [{"from", "to", "content"}, ...]}`
pub fn parse_payload(payload: &Value) -> Result<Vec<TimedTextEntry>, SubtitleError> {
    let body = payload
        .get("body")
        .and_then(Value::as_array)
        .ok_or(SubtitleError::MalformedEntry { index: 0, field: "body" })?;

    body.iter()
        .enumerate()
        .map(|(i, item)| -> Result<TimedTextEntry, SubtitleError> {
            let index = i + 1;
            let from = item
                .get("from")
                .and_then(Value::as_f64)
                .ok_or(SubtitleError::MalformedEntry { index, field: "from" })?;
            let to = item
                .get("to")
                .and_then(Value::as_f64)
                .ok_or(SubtitleError::MalformedEntry { index, field: "to" })?;
            let content = item
                .get("content")
                .and_then(Value::as_str)
                .ok_or(SubtitleError::MalformedEntry { index, field: "content" })?;

            Ok(TimedTextEntry::new(from, to, content))
        })
        .collect()
}

/// Parse a payload and convert it to SRT in one step
pub fn payload_to_srt(payload: &Value) -> Result<(String, usize), SubtitleError> {
    let entries = parse_payload(payload)?;
    let srt = convert_to_srt(&entries)?;
    Ok((srt, entries.len()))
}
