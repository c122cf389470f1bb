use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::shifter::{self, Selection, ShiftSummary};
use crate::subtitle_processor::{LineEnding, SubtitleCollection, SubtitleEntry};
use crate::validation::{TimecodeValidationResult, TimecodeValidator};

// @module: Application controller for subtitle shifting

/// Everything needed to shift one file or a folder of files
#[derive(Debug, Clone)]
pub struct ShiftRequest {
    /// Input SRT file or directory
    pub input: PathBuf,
    /// Output file (single input) or directory (folder input)
    pub output: Option<PathBuf>,
    /// Signed shift in milliseconds
    pub offset_ms: i64,
    /// Sequence numbers to shift, e.g. "1,4-6"
    pub select: Option<String>,
    /// Only shift entries starting at or after this time
    pub after_ms: Option<u64>,
    /// Replace existing output files
    pub force_overwrite: bool,
    /// Overrides the configured line ending
    pub line_ending: Option<LineEnding>,
    /// Run the timing check on the result
    pub validate: bool,
}

impl ShiftRequest {
    /// A request shifting every entry of `input` by `offset_ms`
    pub fn new(input: impl Into<PathBuf>, offset_ms: i64) -> Self {
        Self {
            input: input.into(),
            output: None,
            offset_ms,
            select: None,
            after_ms: None,
            force_overwrite: false,
            line_ending: None,
            validate: false,
        }
    }
}

/// Counts for a folder run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FolderReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Shift a single file or every SRT file below a directory
    pub fn run(&self, request: &ShiftRequest) -> Result<()> {
        if FileManager::file_exists(&request.input) {
            self.run_shift(request)?;
        } else if FileManager::dir_exists(&request.input) {
            let report = self.run_shift_folder(request)?;
            if report.failed > 0 {
                return Err(anyhow!("{} file(s) could not be shifted", report.failed));
            }
        } else {
            return Err(anyhow!("Input path does not exist: {:?}", request.input));
        }
        Ok(())
    }

    /// Shift one file. Returns the written path, or `None` when the output
    /// already existed and overwriting was not allowed.
    pub fn run_shift(&self, request: &ShiftRequest) -> Result<Option<PathBuf>> {
        let input = &request.input;
        if FileManager::detect_file_type(input)? != FileType::Subtitle {
            return Err(anyhow!("Not an SRT subtitle file: {:?}", input));
        }

        let output_path = self.output_path_for(input, request.output.as_deref());
        if output_path.exists() && !self.may_overwrite(request) {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(None);
        }

        let mut collection = SubtitleCollection::from_file(input)?;
        if collection.entries.is_empty() {
            return Err(anyhow!("No subtitle entries found in {:?}", input));
        }

        let summary = self.shift_collection(&mut collection, request)?;
        info!(
            "Shifted {} of {} entries by {}ms{}",
            summary.shifted,
            collection.entries.len(),
            request.offset_ms,
            if summary.applied_to_all { " (no selection, all entries)" } else { "" }
        );
        if summary.clamped > 0 {
            warn!("{} timestamp(s) would have gone below zero and were clamped to 00:00:00,000", summary.clamped);
        }

        if request.validate || self.config.validation.enabled {
            self.report_validation(&self.validate_entries(&collection.entries));
        }

        let line_ending = request.line_ending.unwrap_or(self.config.output.line_ending);
        collection.write_to_srt(&output_path, line_ending)?;
        info!("Success: {:?}", output_path);

        Ok(Some(output_path))
    }

    /// Shift every SRT file found below `request.input`. Failures are logged
    /// and counted; the remaining files are still processed.
    pub fn run_shift_folder(&self, request: &ShiftRequest) -> Result<FolderReport> {
        info!("Shifting subtitles in directory: {:?}", request.input);

        let own_suffix = format!(".{}.srt", self.config.output.suffix).to_lowercase();
        let mut report = FolderReport::default();

        for path in FileManager::find_files(&request.input, "srt")? {
            let name = path.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default();
            if name.ends_with(&own_suffix) {
                debug!("Skipping previously generated file: {:?}", path);
                report.skipped += 1;
                continue;
            }

            // Mirror the input tree under --output so equal file names in different folders stay apart
            let output_dir = match &request.output {
                Some(root) => {
                    let relative = path
                        .parent()
                        .and_then(|parent| parent.strip_prefix(&request.input).ok())
                        .unwrap_or(Path::new(""));
                    Some(root.join(relative))
                }
                None => path.parent().map(Path::to_path_buf),
            };
            let file_request = ShiftRequest {
                input: path.clone(),
                output: output_dir.map(|dir| FileManager::generate_output_path(&path, dir, &self.config.output.suffix, "srt")),
                ..request.clone()
            };

            match self.run_shift(&file_request) {
                Ok(Some(_)) => report.processed += 1,
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", path, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Finished: {} shifted, {} skipped, {} failed",
            report.processed, report.skipped, report.failed
        );

        Ok(report)
    }

    /// Apply the request's offset and selection to a loaded collection
    pub fn shift_collection(&self, collection: &mut SubtitleCollection, request: &ShiftRequest) -> Result<ShiftSummary> {
        let selection = Self::build_selection(&collection.entries, request)?;
        if !selection.is_empty() {
            debug!("Selected {} of {} entries", selection.len(), collection.entries.len());
        }

        shifter::shift(&mut collection.entries, request.offset_ms, &selection)
            .with_context(|| format!("Failed to shift {:?}", collection.source_file))
    }

    /// Load a file and run the timing check on it
    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<TimecodeValidationResult> {
        let collection = SubtitleCollection::from_file(path.as_ref())?;
        info!("{} entries in {:?}", collection.entries.len(), collection.source_file);

        let result = self.validate_entries(&collection.entries);
        self.report_validation(&result);
        Ok(result)
    }

    fn validate_entries(&self, entries: &[SubtitleEntry]) -> TimecodeValidationResult {
        TimecodeValidator::with_config(self.config.validation.validator_config()).validate_collection(entries)
    }

    fn report_validation(&self, result: &TimecodeValidationResult) {
        if result.passed {
            info!("Timing check passed");
            return;
        }

        for entry in result.failed_entries() {
            for issue in &entry.issues {
                warn!("Entry {}: {}", entry.seq_num, issue);
            }
        }
        warn!(
            "Timing check found {} issue(s), {} overlap(s)",
            result.total_issues, result.overlap_count
        );
    }

    // A selection that matches nothing would shift the whole file, which is
    // never what a user typing --select meant.
    fn build_selection(entries: &[SubtitleEntry], request: &ShiftRequest) -> Result<Selection> {
        let by_number = request
            .select
            .as_deref()
            .map(|numbers| Selection::by_sequence_numbers(entries, numbers))
            .transpose()?;
        let by_time = request
            .after_ms
            .map(|ms| Selection::starting_at(entries, ms))
            .transpose()?;

        let selection = match (by_number, by_time) {
            (Some(a), Some(b)) => a.intersect(&b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return Ok(Selection::none()),
        };

        if selection.is_empty() {
            return Err(anyhow!("Selection matched no subtitle entries"));
        }
        Ok(selection)
    }

    fn output_path_for(&self, input: &Path, output: Option<&Path>) -> PathBuf {
        match output {
            Some(path) if path.is_dir() => {
                FileManager::generate_output_path(input, path, &self.config.output.suffix, "srt")
            }
            Some(path) => path.to_path_buf(),
            None => FileManager::generate_output_path(
                input,
                input.parent().unwrap_or(Path::new(".")),
                &self.config.output.suffix,
                "srt",
            ),
        }
    }

    fn may_overwrite(&self, request: &ShiftRequest) -> bool {
        request.force_overwrite || self.config.output.overwrite
    }
}
