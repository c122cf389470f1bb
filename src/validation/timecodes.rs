/*!
 * Timecode validation for subtitle entries.
 *
 * Shifting never enforces that an entry ends after it starts, and clamping can
 * produce inverted or zero-length entries. This module reports such entries
 * without touching them:
 * - Timestamps that cannot be read
 * - Inverted ranges (end before start)
 * - Durations outside configured limits
 * - Overlaps between entries
 */

use log::debug;

use crate::subtitle_processor::SubtitleEntry;

/// Minimum duration for a subtitle in milliseconds
const MIN_SUBTITLE_DURATION_MS: u64 = 1;

/// Maximum duration for a single subtitle in milliseconds (30 seconds)
const MAX_SUBTITLE_DURATION_MS: u64 = 30_000;

/// Result of timecode validation for a single entry
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// Sequence number of the entry
    pub seq_num: u32,
    /// Whether the entry passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeEntryResult {
    /// Create a passing result
    pub fn passed(seq_num: u32) -> Self {
        Self {
            seq_num,
            passed: true,
            issues: vec![],
        }
    }

    /// Create a failing result
    pub fn failed(seq_num: u32, issues: Vec<TimecodeIssue>) -> Self {
        Self {
            seq_num,
            passed: false,
            issues,
        }
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// A timestamp could not be decoded
    UnparseableTimestamp {
        value: String,
    },
    /// End time is before start time
    InvalidTimeRange {
        start_ms: u64,
        end_ms: u64,
    },
    /// Duration is too short
    DurationTooShort {
        duration_ms: u64,
        min_duration_ms: u64,
    },
    /// Duration is too long
    DurationTooLong {
        duration_ms: u64,
        max_duration_ms: u64,
    },
    /// Overlaps with another entry
    OverlapsWithEntry {
        other_seq_num: u32,
        overlap_ms: u64,
    },
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::UnparseableTimestamp { value } => {
                write!(f, "Unreadable timestamp '{}'", value)
            }
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms > end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::DurationTooShort { duration_ms, min_duration_ms } => {
                write!(
                    f,
                    "Duration too short: {}ms (min: {}ms)",
                    duration_ms, min_duration_ms
                )
            }
            TimecodeIssue::DurationTooLong { duration_ms, max_duration_ms } => {
                write!(
                    f,
                    "Duration too long: {}ms (max: {}ms)",
                    duration_ms, max_duration_ms
                )
            }
            TimecodeIssue::OverlapsWithEntry { other_seq_num, overlap_ms } => {
                write!(
                    f,
                    "Overlaps with entry {} by {}ms",
                    other_seq_num, overlap_ms
                )
            }
        }
    }
}

/// Result of validating all timecodes in a collection
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each entry, in document order
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping entries
    pub overlap_count: usize,
}

impl TimecodeValidationResult {
    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Minimum subtitle duration in ms
    pub min_duration_ms: u64,
    /// Maximum subtitle duration in ms
    pub max_duration_ms: u64,
    /// Whether to check for overlaps
    pub check_overlaps: bool,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: MIN_SUBTITLE_DURATION_MS,
            max_duration_ms: MAX_SUBTITLE_DURATION_MS,
            check_overlaps: true,
        }
    }
}

/// Timecode validator for subtitle entries
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimecodeValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single subtitle entry
    pub fn validate_entry(&self, entry: &SubtitleEntry) -> TimecodeEntryResult {
        let (start_ms, end_ms) = match Self::decode(entry) {
            Ok(range) => range,
            Err(issues) => return TimecodeEntryResult::failed(entry.seq_num, issues),
        };

        let mut issues = Vec::new();

        if end_ms < start_ms {
            issues.push(TimecodeIssue::InvalidTimeRange { start_ms, end_ms });
            return TimecodeEntryResult::failed(entry.seq_num, issues);
        }

        let duration_ms = end_ms - start_ms;

        if duration_ms < self.config.min_duration_ms {
            issues.push(TimecodeIssue::DurationTooShort {
                duration_ms,
                min_duration_ms: self.config.min_duration_ms,
            });
        }

        if duration_ms > self.config.max_duration_ms {
            issues.push(TimecodeIssue::DurationTooLong {
                duration_ms,
                max_duration_ms: self.config.max_duration_ms,
            });
        }

        if issues.is_empty() {
            TimecodeEntryResult::passed(entry.seq_num)
        } else {
            TimecodeEntryResult::failed(entry.seq_num, issues)
        }
    }

    /// Validate a collection of subtitle entries
    pub fn validate_collection(&self, entries: &[SubtitleEntry]) -> TimecodeValidationResult {
        if entries.is_empty() {
            return TimecodeValidationResult {
                passed: true,
                entry_results: vec![],
                total_issues: 0,
                overlap_count: 0,
            };
        }

        let mut entry_results: Vec<TimecodeEntryResult> = entries
            .iter()
            .map(|e| self.validate_entry(e))
            .collect();

        let mut overlap_count = 0;

        if self.config.check_overlaps && entries.len() > 1 {
            // Only entries with readable, non-inverted ranges take part
            let mut timed: Vec<(usize, u64, u64)> = entries
                .iter()
                .enumerate()
                .filter_map(|(i, e)| match Self::decode(e) {
                    Ok((start, end)) if end >= start => Some((i, start, end)),
                    _ => None,
                })
                .collect();
            timed.sort_by_key(|&(_, start, _)| start);

            // Compare against the furthest reaching earlier cue, not just the previous one
            let mut reach: Option<(usize, u64)> = None;
            for &(idx, start, end) in &timed {
                if let Some((owner_idx, owner_end)) = reach {
                    if owner_end > start {
                        overlap_count += 1;

                        // Add issue to the later entry
                        if let Some(result) = entry_results.get_mut(idx) {
                            result.issues.push(TimecodeIssue::OverlapsWithEntry {
                                other_seq_num: entries[owner_idx].seq_num,
                                overlap_ms: owner_end.min(end) - start,
                            });
                            result.passed = false;
                        }
                    }
                }

                if reach.is_none_or(|(_, owner_end)| end > owner_end) {
                    reach = Some((idx, end));
                }
            }
        }

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} entries, {} issues, {} overlaps",
            entries.len(),
            total_issues,
            overlap_count
        );

        TimecodeValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }

    fn decode(entry: &SubtitleEntry) -> Result<(u64, u64), Vec<TimecodeIssue>> {
        let mut issues = Vec::new();
        let start = entry.start_ms().map_err(|_| {
            issues.push(TimecodeIssue::UnparseableTimestamp { value: entry.start_time.clone() })
        });
        let end = entry.end_ms().map_err(|_| {
            issues.push(TimecodeIssue::UnparseableTimestamp { value: entry.end_time.clone() })
        });

        match (start, end) {
            (Ok(start), Ok(end)) => Ok((start, end)),
            _ => Err(issues),
        }
    }
}

impl Default for TimecodeValidator {
    fn default() -> Self {
        Self::new()
    }
}
