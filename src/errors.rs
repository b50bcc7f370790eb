/*!
 * Error types for the dualsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when normalizing tick-based timestamps
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    /// A timestamp cannot be normalized: the tick rate is zero, or the
    /// normalized value is too large to represent
    #[error("invalid time input: cannot normalize {tick_count} ticks at rate {tick_rate}")]
    InvalidTimeInput {
        /// The tick count that could not be normalized
        tick_count: u64,

        /// The tick rate in effect for the cue
        tick_rate: u64,
    },
}

/// Errors that can occur while extracting cues from a markup document
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document contained no parseable cue elements
    #[error("no cues found in document ({format} format)")]
    NoCues {
        /// Name of the format the document was parsed as
        format: String,
    },
}

/// Errors that can occur during track alignment
#[derive(Error, Debug)]
pub enum AlignError {
    /// A configuration value was outside its sane bounds; raised before any
    /// cue is processed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error normalizing a cue timestamp
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from cue extraction
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Error from track alignment
    #[error("Alignment error: {0}")]
    Align(#[from] AlignError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
