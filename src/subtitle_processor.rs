use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::timecode;

// @module: SRT parsing and serialization

// @const: Separator between the start and end timestamps of a timing line
pub const TIME_SEPARATOR: &str = " --> ";

// @const: Blank line between blocks, either line ending, whitespace tolerated
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n\s*\r?\n").unwrap()
});

// @struct: Single subtitle entry
//
// Timestamps are kept as the text that was loaded. They are only turned into
// milliseconds while a shift is being applied, so untouched entries keep their
// original spelling byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number as declared in the document
    pub seq_num: u32,

    // @field: Start timestamp (HH:MM:SS,mmm)
    pub start_time: String,

    // @field: End timestamp (HH:MM:SS,mmm)
    pub end_time: String,

    // @field: Caption text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry from already formatted timestamps
    pub fn new(seq_num: u32, start_time: impl Into<String>, end_time: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time: start_time.into(),
            end_time: end_time.into(),
            text: text.into(),
        }
    }

    /// Creates a new subtitle entry from millisecond offsets
    pub fn from_millis(seq_num: u32, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self::new(
            seq_num,
            timecode::format_timestamp(i64::try_from(start_ms).unwrap_or(i64::MAX)),
            timecode::format_timestamp(i64::try_from(end_ms).unwrap_or(i64::MAX)),
            text,
        )
    }

    /// Start time in milliseconds
    pub fn start_ms(&self) -> Result<u64, SubtitleError> {
        timecode::parse_timestamp(&self.start_time)
    }

    /// End time in milliseconds
    pub fn end_ms(&self) -> Result<u64, SubtitleError> {
        timecode::parse_timestamp(&self.end_time)
    }

    /// Timing line as it appears in the document
    pub fn timing_line(&self) -> String {
        format!("{}{}{}", self.start_time, TIME_SEPARATOR, self.end_time)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{}", self.timing_line())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Line ending used when writing a document
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => write!(f, "lf"),
            Self::Crlf => write!(f, "crlf"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lf" | "unix" => Ok(Self::Lf),
            "crlf" | "windows" => Ok(Self::Crlf),
            _ => Err(anyhow!("Invalid line ending: {}", s)),
        }
    }
}

/// Parse SRT text into entries.
///
/// Blocks that do not look like a subtitle (fewer than three lines, a
/// non-numeric sequence number, or a timing line without ` --> `) are dropped
/// without error so hand-edited files with stray text still load.
pub fn parse(content: &str) -> Vec<SubtitleEntry> {
    let content = content.trim();
    if content.is_empty() {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for (index, block) in BLOCK_SEPARATOR_REGEX.split(content).enumerate() {
        match parse_block(block) {
            Ok(entry) => entries.push(entry),
            Err(reason) => debug!("Skipping subtitle block {}: {}", index + 1, reason),
        }
    }

    entries
}

fn parse_block(block: &str) -> std::result::Result<SubtitleEntry, &'static str> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < 3 {
        return Err("fewer than 3 lines");
    }

    let seq_num: u32 = lines[0]
        .trim()
        .parse()
        .map_err(|_| "sequence number is not an integer")?;

    let (start, end) = lines[1]
        .split_once(TIME_SEPARATOR)
        .ok_or("timing line has no ' --> ' separator")?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err("timing line is missing a timestamp");
    }

    Ok(SubtitleEntry {
        seq_num,
        start_time: start.to_string(),
        end_time: end.to_string(),
        text: lines[2..].join("\n"),
    })
}

/// Serialize entries back to SRT text.
///
/// Every entry is followed by a blank line, including the last one. An empty
/// sequence yields an empty document.
pub fn serialize(entries: &[SubtitleEntry]) -> String {
    entries.iter().map(|entry| entry.to_string()).collect()
}

/// Collection of subtitle entries loaded from one document
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries, in document order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Load and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let entries = Self::parse_srt_string(&content);
        debug!("Loaded {} subtitle entries from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
        parse(content)
    }

    /// Render the collection as SRT text with '\n' line breaks
    pub fn to_srt_string(&self) -> String {
        serialize(&self.entries)
    }

    /// Render the collection as SRT text with the given line ending
    pub fn to_srt_string_with(&self, line_ending: LineEnding) -> String {
        let document = self.to_srt_string();
        match line_ending {
            LineEnding::Lf => document,
            LineEnding::Crlf => document.replace("\r\n", "\n").replace('\n', line_ending.as_str()),
        }
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P, line_ending: LineEnding) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &self.to_srt_string_with(line_ending))
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
