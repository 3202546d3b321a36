/*!
 * # bilisub - Bilibili subtitle downloader
 *
 * A Rust library and CLI that downloads the CC subtitle tracks of Bilibili
 * videos and converts them from the platform's JSON timed-text format to SRT.
 *
 * ## Features
 *
 * - Process one or many BV IDs, from arguments, a file or an interactive prompt
 * - Multi-part videos: one JSON and one SRT file per part
 * - Optional cookie file for subtitles that require a login
 * - Request pacing and retry with backoff when the platform throttles
 * - Preferred subtitle language selection
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Per-video processing and batch runs
 * - `timed_text`: Timed-text model and SRT conversion
 * - `identifiers`: BV ID validation
 * - `cookies`: Cookie file parsing
 * - `rate_limit`: Request pacing and retry policy
 * - `providers`: Platform clients:
 *   - `providers::bilibili`: Bilibili web API client
 *   - `providers::mock`: In-memory provider for tests
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cookies;
pub mod errors;
pub mod file_utils;
pub mod identifiers;
pub mod providers;
pub mod rate_limit;
pub mod timed_text;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller};
pub use identifiers::Bvid;
pub use timed_text::{convert_to_srt, format_timestamp, SubtitleBlock, TimedTextEntry};
pub use errors::{AppError, ProviderError, SubtitleError};
