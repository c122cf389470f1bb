/*!
 * Tests for error types and conversions
 */

use subshift::errors::{AppError, SubtitleError};
use subshift::timecode::parse_timestamp;

#[test]
fn test_subtitleError_invalidTimestamp_shouldDisplayValueAndReason() {
    let error = parse_timestamp("12:00").unwrap_err();
    let display = format!("{}", error);
    assert!(display.contains("Invalid timestamp"));
    assert!(display.contains("12:00"));
}

#[test]
fn test_subtitleError_zeroShift_shouldDisplayCorrectly() {
    let display = format!("{}", SubtitleError::ZeroShift);
    assert!(display.contains("non-zero"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let app_error: AppError = SubtitleError::InvalidSelection("1,,2".to_string()).into();
    assert!(matches!(app_error, AppError::Subtitle(SubtitleError::InvalidSelection(_))));
    assert!(format!("{}", app_error).contains("Subtitle error"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert!(format!("{}", app_error).contains("boom"));
}
