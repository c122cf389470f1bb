/*!
 * SRT timestamp codec.
 *
 * Converts between the `HH:MM:SS,mmm` representation used in SRT timing lines
 * and a plain millisecond count. Formatting clamps negative values to zero so a
 * shifted timestamp can never be rendered as a negative time.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

// @const: Offset written as decimal seconds, e.g. "2.5s"
static SECONDS_OFFSET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d{1,3}))?s$").unwrap()
});

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) into milliseconds.
///
/// Padding is not enforced, so `1:2:3,4` is accepted and yields the same
/// arithmetic as `01:02:03,004`. The text must contain exactly one comma and
/// exactly two colons before it, and every component must be made of digits.
pub fn parse_timestamp(text: &str) -> Result<u64, SubtitleError> {
    let trimmed = text.trim();

    let (clock, millis) = match trimmed.split_once(',') {
        Some((clock, millis)) if !millis.contains(',') => (clock, millis),
        Some(_) => return Err(SubtitleError::invalid_timestamp(text, "more than one comma")),
        None => return Err(SubtitleError::invalid_timestamp(text, "missing comma before milliseconds")),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(SubtitleError::invalid_timestamp(
            text,
            format!("expected 2 colons, found {}", parts.len() - 1),
        ));
    }

    let hours = parse_component(text, parts[0], "hours")?;
    let minutes = parse_component(text, parts[1], "minutes")?;
    let seconds = parse_component(text, parts[2], "seconds")?;
    let millis = parse_component(text, millis, "milliseconds")?;

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes.checked_mul(MS_PER_MINUTE)?))
        .and_then(|total| total.checked_add(seconds.checked_mul(MS_PER_SECOND)?))
        .and_then(|total| total.checked_add(millis))
        .ok_or_else(|| SubtitleError::invalid_timestamp(text, "value out of range"))
}

fn parse_component(original: &str, component: &str, name: &str) -> Result<u64, SubtitleError> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubtitleError::invalid_timestamp(
            original,
            format!("{} component '{}' is not a number", name, component),
        ));
    }

    component
        .parse()
        .map_err(|_| SubtitleError::invalid_timestamp(original, format!("{} component out of range", name)))
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm).
///
/// Negative input is clamped to zero. Hours are padded to two digits but may
/// grow wider for very long documents.
pub fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0) as u64;
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse a signed offset given on the command line.
///
/// Accepted forms:
/// - plain milliseconds: `1500`, `-250`, `+40`, optionally suffixed with `ms`
/// - decimal seconds: `2s`, `-1.5s`
/// - a timestamp: `-00:00:01,500`
///
/// A zero offset parses successfully; refusing it is up to the shifter.
pub fn parse_offset(text: &str) -> Result<i64, SubtitleError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubtitleError::InvalidOffset("empty offset".to_string()));
    }

    let (sign, magnitude) = match trimmed.as_bytes()[0] {
        b'-' => (-1, &trimmed[1..]),
        b'+' => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let millis: u64 = if magnitude.contains(':') {
        parse_timestamp(magnitude).map_err(|e| SubtitleError::InvalidOffset(e.to_string()))?
    } else if let Some(ms) = magnitude.strip_suffix("ms") {
        parse_plain_millis(text, ms)?
    } else if let Some(caps) = SECONDS_OFFSET_REGEX.captures(magnitude) {
        let seconds: u64 = caps[1]
            .parse()
            .map_err(|_| SubtitleError::InvalidOffset(format!("'{}' is out of range", text)))?;
        // "1.5" means 500 ms, "1.05" means 50 ms
        let fraction = caps.get(2).map_or(0, |m| {
            let digits = m.as_str();
            let value: u64 = digits.parse().unwrap_or(0);
            value * 10u64.pow(3 - digits.len() as u32)
        });
        seconds
            .checked_mul(MS_PER_SECOND)
            .and_then(|total| total.checked_add(fraction))
            .ok_or_else(|| SubtitleError::InvalidOffset(format!("'{}' is out of range", text)))?
    } else {
        parse_plain_millis(text, magnitude)?
    };

    let millis = i64::try_from(millis)
        .map_err(|_| SubtitleError::InvalidOffset(format!("'{}' is out of range", text)))?;

    Ok(sign * millis)
}

fn parse_plain_millis(original: &str, digits: &str) -> Result<u64, SubtitleError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubtitleError::InvalidOffset(format!(
            "'{}' is not a millisecond count, seconds value or timestamp",
            original
        )));
    }
    digits
        .parse()
        .map_err(|_| SubtitleError::InvalidOffset(format!("'{}' is out of range", original)))
}
