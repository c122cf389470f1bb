/*!
 * Tests for SRT parsing and serialization
 */

use std::fmt::Write;
use std::path::PathBuf;
use anyhow::Result;
use subshift::subtitle_processor::{self, LineEnding, SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatBlock() {
    let entry = SubtitleEntry::from_millis(1, 5000, 10000, "Test subtitle");
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

/// Test entry accessors decode the stored timestamps
#[test]
fn test_subtitle_entry_millis_withValidEntry_shouldDecode() {
    let entry = SubtitleEntry::new(42, "00:01:01,234", "00:01:05,432", "Hello\nWorld");

    assert_eq!(entry.start_ms().unwrap(), 61234);
    assert_eq!(entry.end_ms().unwrap(), 65432);
    assert_eq!(entry.timing_line(), "00:01:01,234 --> 00:01:05,432");
}

/// Test parsing SRT string content
#[test]
fn test_parse_srt_string_withValidContent_shouldParseCorrectly() {
    let entries = SubtitleCollection::parse_srt_string(common::SAMPLE_SRT);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[0].start_time, "00:00:01,000");
    assert_eq!(entries[0].end_time, "00:00:04,000");
    assert_eq!(entries[0].text, "This is a test subtitle.");
    assert_eq!(entries[2].text, "For testing purposes.\nSecond line.");
}

/// Serializing a parsed well formed document gives the same text back
#[test]
fn test_serialize_withParsedDocument_shouldRoundTrip() {
    let entries = subtitle_processor::parse(common::SAMPLE_SRT);

    assert_eq!(subtitle_processor::serialize(&entries), common::SAMPLE_SRT);
}

/// Round trip also holds for unusual but legal content
#[test]
fn test_serialize_withUnusualContent_shouldRoundTrip() {
    let document = "12\n01:59:59,999 --> 123:00:00,000\n<i>Markup is opaque</i>\n- Dash line\n\n3\n00:00:00,000 --> 00:00:00,000\n   indented text\n\n";

    assert_eq!(subtitle_processor::serialize(&subtitle_processor::parse(document)), document);
}

/// A document with a broken block keeps the good one
#[test]
fn test_parse_withOneBlockMissingArrow_shouldReturnOneEntry() {
    let document = "1\n00:00:01,000 --> 00:00:02,000\nGood\n\n2\n00:00:03,000 -> 00:00:04,000\nBad\n\n";

    let entries = subtitle_processor::parse(document);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Good");
}

/// Windows line endings parse to the same entries
#[test]
fn test_parse_withCrlf_shouldMatchLf() {
    let crlf = common::SAMPLE_SRT.replace('\n', "\r\n");

    assert_eq!(subtitle_processor::parse(&crlf), subtitle_processor::parse(common::SAMPLE_SRT));
}

/// Test loading a collection from disk
#[test]
fn test_from_file_withSampleFile_shouldLoadEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let collection = SubtitleCollection::from_file(&path)?;

    assert_eq!(collection.source_file, path);
    assert_eq!(collection.entries.len(), 3);
    assert!(collection.to_string().contains("Entries: 3"));

    Ok(())
}

/// A leading byte order mark does not hide the first cue
#[test]
fn test_from_file_withByteOrderMark_shouldKeepFirstEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = format!("\u{feff}{}", common::SAMPLE_SRT);
    let path = common::create_test_file(temp_dir.path(), "bom.srt", &content)?;

    let collection = SubtitleCollection::from_file(&path)?;

    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[0].seq_num, 1);

    Ok(())
}

/// Test writing with both line endings
#[test]
fn test_write_to_srt_withLineEndings_shouldWriteExpectedBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut collection = SubtitleCollection::new(PathBuf::from("in.srt"));
    collection.entries = subtitle_processor::parse(common::SAMPLE_SRT);

    let lf_path = temp_dir.path().join("nested").join("lf.srt");
    collection.write_to_srt(&lf_path, LineEnding::Lf)?;
    assert_eq!(std::fs::read_to_string(&lf_path)?, common::SAMPLE_SRT);

    let crlf_path = temp_dir.path().join("crlf.srt");
    collection.write_to_srt(&crlf_path, LineEnding::Crlf)?;
    assert_eq!(std::fs::read_to_string(&crlf_path)?, common::SAMPLE_SRT.replace('\n', "\r\n"));

    Ok(())
}
