/*!
 * Tests for shifting and selection
 */

use subshift::errors::SubtitleError;
use subshift::shifter::{shift, Selection};
use subshift::subtitle_processor::{parse, serialize, SubtitleEntry};
use subshift::timecode::{format_timestamp, parse_timestamp};
use crate::common;

fn abc() -> Vec<SubtitleEntry> {
    vec![
        SubtitleEntry::from_millis(1, 1_000, 2_000, "A"),
        SubtitleEntry::from_millis(2, 3_000, 4_000, "B"),
        SubtitleEntry::from_millis(3, 5_000, 6_000, "C"),
    ]
}

#[test]
fn test_shift_withNothingSelected_shouldShiftEveryEntry() {
    let mut entries = abc();

    let summary = shift(&mut entries, 1000, &Selection::none()).unwrap();

    assert!(summary.applied_to_all);
    let starts: Vec<u64> = entries.iter().map(|e| e.start_ms().unwrap()).collect();
    assert_eq!(starts, vec![2_000, 4_000, 6_000]);
}

#[test]
fn test_shift_withOnlyBSelected_shouldLeaveOthersUntouched() {
    let mut entries = abc();
    let before = entries.clone();

    shift(&mut entries, 1000, &Selection::from_positions([1])).unwrap();

    assert_eq!(entries[0], before[0]);
    assert_eq!(entries[1].start_ms().unwrap(), 4_000);
    assert_eq!(entries[1].end_ms().unwrap(), 5_000);
    assert_eq!(entries[2], before[2]);
}

#[test]
fn test_shift_withStartDrivenNegative_shouldClampOnlyStart() {
    let mut entries = vec![SubtitleEntry::from_millis(1, 500, 2_000, "x")];

    shift(&mut entries, -1000, &Selection::none()).unwrap();
    assert_eq!(entries[0].start_ms().unwrap(), 0);
    assert_eq!(entries[0].end_ms().unwrap(), 1_000);

    shift(&mut entries, -1500, &Selection::none()).unwrap();
    assert_eq!(entries[0].start_ms().unwrap(), 0);
    assert_eq!(entries[0].end_ms().unwrap(), 0);
}

#[test]
fn test_shift_withZeroDelta_shouldReportErrorAndKeepEntries() {
    let mut entries = abc();
    let before = entries.clone();

    let result = shift(&mut entries, 0, &Selection::from_positions([0, 2]));

    assert_eq!(result, Err(SubtitleError::ZeroShift));
    assert_eq!(entries, before);
}

#[test]
fn test_shift_preservesOrderAndNumbering() {
    let mut entries = parse("9\n00:00:05,000 --> 00:00:06,000\nlate\n\n2\n00:00:01,000 --> 00:00:02,000\nearly\n\n");

    shift(&mut entries, 10_000, &Selection::from_positions([1])).unwrap();

    assert_eq!(entries[0].seq_num, 9);
    assert_eq!(entries[1].seq_num, 2);
    assert_eq!(entries[1].start_time, "00:00:11,000");
}

#[test]
fn test_shift_thenSerialize_shouldOnlyChangeTimingLines() {
    let mut entries = parse(common::SAMPLE_SRT);

    shift(&mut entries, 250, &Selection::none()).unwrap();
    let output = serialize(&entries);

    let expected = common::SAMPLE_SRT
        .replace("00:00:01,000 --> 00:00:04,000", "00:00:01,250 --> 00:00:04,250")
        .replace("00:00:05,000 --> 00:00:09,000", "00:00:05,250 --> 00:00:09,250")
        .replace("00:00:10,000 --> 00:00:14,000", "00:00:10,250 --> 00:00:14,250");
    assert_eq!(output, expected);
}

#[test]
fn test_shift_backAndForth_shouldRestoreWhenNothingClamped() {
    let mut entries = parse(common::SAMPLE_SRT);

    shift(&mut entries, -900, &Selection::none()).unwrap();
    shift(&mut entries, 900, &Selection::none()).unwrap();

    assert_eq!(serialize(&entries), common::SAMPLE_SRT);
}

#[test]
fn test_formatTimestamp_withNegative_shouldEqualZero() {
    assert_eq!(format_timestamp(-5), format_timestamp(0));
    assert_eq!(format_timestamp(0), "00:00:00,000");
}

#[test]
fn test_timestampCodec_withEveryHourBoundary_shouldBeInverse() {
    for hour in 0..100i64 {
        let ms = hour * 3_600_000 + 59 * 60_000 + 59 * 1_000 + 999;
        assert_eq!(parse_timestamp(&format_timestamp(ms)).unwrap(), ms as u64);
    }
}

#[test]
fn test_selection_combination_shouldIntersect() {
    let entries = abc();
    let by_number = Selection::by_sequence_numbers(&entries, "1-2").unwrap();
    let by_time = Selection::starting_at(&entries, 2_000).unwrap();

    let both = by_number.intersect(&by_time);

    assert_eq!(both.iter().collect::<Vec<_>>(), vec![1]);
}
