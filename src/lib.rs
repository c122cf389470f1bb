/*!
 * # SubShift - shift SRT subtitle timings
 *
 * A Rust library for loading SRT subtitles, moving some or all of their cues
 * by a fixed offset, and writing them back out.
 *
 * ## Features
 *
 * - Lenient SRT parsing: malformed blocks are skipped, not fatal
 * - Strict timestamp decoding with clear errors
 * - Shifting of a selection, or every cue when nothing is selected
 * - Clamping at 00:00:00,000, start and end independently
 * - Output that round-trips the input format
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: `HH:MM:SS,mmm` to milliseconds and back
 * - `subtitle_processor`: SRT parsing and serialization
 * - `shifter`: Offset application and selection handling
 * - `validation`: Optional timing checks (inverted ranges, overlaps)
 * - `app_config`: Configuration management
 * - `app_controller`: File and folder workflows used by the CLI
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod shifter;
pub mod subtitle_processor;
pub mod timecode;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, SubtitleError};
pub use shifter::{shift, shift_where, Selection, ShiftSummary};
pub use subtitle_processor::{parse, serialize, LineEnding, SubtitleCollection, SubtitleEntry};
pub use timecode::{format_timestamp, parse_offset, parse_timestamp};
