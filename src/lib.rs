/*!
 * # dualsub - bilingual subtitle merger
 *
 * A Rust library for combining two independently-timed subtitle tracks into
 * one bilingual output.
 *
 * ## Features
 *
 * - Extract tick-timed cues from TTML/DFXP markup documents
 * - Two alignment strategies:
 *   - Timeline: chronological interleave of both tracks
 *   - Paired: nearest-time one-to-one matching, primary track leads
 * - Tick-rate-independent time normalization for cross-track comparison
 * - Render to timed SRT or untimed plain text
 * - Batch merging of stem-matched file pairs across folders
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_model`: tick-to-normalized-time conversion
 * - `cue`: timed cue and per-track cue sequence data model
 * - `extract`: regex-based cue extraction from markup documents
 * - `align`: the two alignment strategies and their shared types
 * - `render`: projection of display entries to output text
 * - `app_config`: configuration management
 * - `app_controller`: pair and folder orchestration
 * - `file_utils`: file system operations
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod time_model;
pub mod cue;
pub mod extract;
pub mod align;
pub mod render;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{AlignmentConfig, Config, OutputFormat, Strategy};
pub use cue::{CueSequence, TimedCue};
pub use time_model::NormalizedTime;
pub use align::{Alignment, DisplayEntry, SkippedCue};
pub use errors::{AlignError, AppError, ExtractError, TimeError};
