/*!
 * Timestamp shifting for subtitle entries.
 *
 * A shift adds a signed millisecond delta to the start and end of every
 * targeted entry. The target set is the selected entries, or every entry when
 * nothing is selected. Results below zero are clamped to zero, start and end
 * independently, so a shift may leave an entry with start after end.
 *
 * Selection lives outside the entries in a [`Selection`] owned by the caller.
 */

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleEntry;
use crate::timecode;

/// Set of 0-based entry positions chosen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    positions: BTreeSet<usize>,
}

impl Selection {
    /// An empty selection, which makes a shift apply to every entry
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a selection from explicit positions
    pub fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Select the entries whose declared sequence number falls in `numbers`.
    ///
    /// `numbers` is a comma separated list of numbers and inclusive ranges,
    /// e.g. `1,4-6,10`.
    pub fn by_sequence_numbers(entries: &[SubtitleEntry], numbers: &str) -> Result<Self, SubtitleError> {
        let ranges = parse_ranges(numbers)?;
        let positions = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&entry.seq_num)))
            .map(|(index, _)| index);

        Ok(Self::from_positions(positions))
    }

    /// Select every entry that starts at or after `from_ms`
    pub fn starting_at(entries: &[SubtitleEntry], from_ms: u64) -> Result<Self, SubtitleError> {
        let mut positions = BTreeSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.start_ms()? >= from_ms {
                positions.insert(index);
            }
        }
        Ok(Self { positions })
    }

    /// Toggle a position, as a checkbox would
    pub fn toggle(&mut self, position: usize) {
        if !self.positions.remove(&position) {
            self.positions.insert(position);
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Keep only the positions also present in `other`
    pub fn intersect(&self, other: &Selection) -> Selection {
        Self {
            positions: self.positions.intersection(&other.positions).copied().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }
}

fn parse_ranges(numbers: &str) -> Result<Vec<(u32, u32)>, SubtitleError> {
    let mut ranges = Vec::new();

    for token in numbers.split(',').map(str::trim) {
        if token.is_empty() {
            return Err(SubtitleError::InvalidSelection(format!("empty item in '{}'", numbers)));
        }

        let parse_number = |text: &str| -> Result<u32, SubtitleError> {
            text.trim()
                .parse()
                .map_err(|_| SubtitleError::InvalidSelection(format!("'{}' is not a sequence number", text.trim())))
        };

        let range = match token.split_once('-') {
            Some((lo, hi)) => (parse_number(lo)?, parse_number(hi)?),
            None => {
                let n = parse_number(token)?;
                (n, n)
            }
        };

        if range.0 > range.1 {
            return Err(SubtitleError::InvalidSelection(format!("range '{}' is reversed", token)));
        }
        ranges.push(range);
    }

    Ok(ranges)
}

/// Outcome of a successful shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSummary {
    /// Number of entries whose timestamps were rewritten
    pub shifted: usize,
    /// True when nothing was selected and every entry was targeted
    pub applied_to_all: bool,
    /// Number of individual timestamps clamped to zero
    pub clamped: usize,
}

/// Shift the selected entries, or all entries if the selection matches none.
pub fn shift(entries: &mut [SubtitleEntry], delta_ms: i64, selection: &Selection) -> Result<ShiftSummary, SubtitleError> {
    shift_where(entries, delta_ms, |position, _| selection.contains(position))
}

/// Shift the entries matching `predicate`, or all entries if none match.
///
/// A zero delta is refused. All new timestamps are computed before any entry
/// is written, so an unreadable timestamp leaves every entry unchanged.
pub fn shift_where<F>(entries: &mut [SubtitleEntry], delta_ms: i64, predicate: F) -> Result<ShiftSummary, SubtitleError>
where
    F: Fn(usize, &SubtitleEntry) -> bool,
{
    if delta_ms == 0 {
        return Err(SubtitleError::ZeroShift);
    }

    let mut targets: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(position, entry)| predicate(*position, *entry))
        .map(|(position, _)| position)
        .collect();

    let applied_to_all = targets.is_empty();
    if applied_to_all {
        targets = (0..entries.len()).collect();
    }

    let mut updates = Vec::with_capacity(targets.len());
    let mut clamped = 0;
    for &position in &targets {
        let entry = &entries[position];
        let (start, start_clamped) = shift_timestamp(&entry.start_time, delta_ms)
            .inspect_err(|_| warn!("Entry {} has an unreadable start time", entry.seq_num))?;
        let (end, end_clamped) = shift_timestamp(&entry.end_time, delta_ms)
            .inspect_err(|_| warn!("Entry {} has an unreadable end time", entry.seq_num))?;

        clamped += usize::from(start_clamped) + usize::from(end_clamped);
        updates.push((position, start, end));
    }

    for (position, start, end) in updates {
        let entry = &mut entries[position];
        entry.start_time = start;
        entry.end_time = end;
    }

    debug!(
        "Shifted {} of {} entries by {}ms ({} timestamps clamped)",
        targets.len(),
        entries.len(),
        delta_ms,
        clamped
    );

    Ok(ShiftSummary {
        shifted: targets.len(),
        applied_to_all,
        clamped,
    })
}

fn shift_timestamp(text: &str, delta_ms: i64) -> Result<(String, bool), SubtitleError> {
    let ms = timecode::parse_timestamp(text)?;
    let ms = i64::try_from(ms).map_err(|_| SubtitleError::invalid_timestamp(text, "value out of range"))?;
    let shifted = ms.saturating_add(delta_ms);

    Ok((timecode::format_timestamp(shifted), shifted < 0))
}
