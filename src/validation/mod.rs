/*!
 * Validation of subtitle timing.
 *
 * Nothing in here modifies entries; it only reports.
 *
 * - `timecodes`: Validates timing data integrity
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig};
