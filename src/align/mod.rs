/*!
 * Track alignment strategies.
 *
 * Two interchangeable policies turn a pair of cue sequences into one ordered
 * list of display entries:
 * - `timeline`: chronological interleave of both tracks, no pairing
 * - `paired`: one entry per primary cue, nearest-time secondary text attached
 *
 * Both policies are pure: inputs are never mutated, and re-running on the
 * same inputs yields an identical entry list.
 */

pub mod timeline;
pub mod paired;

use crate::app_config::{AlignmentConfig, Strategy};
use crate::cue::{CueSequence, TimedCue};
use crate::errors::{AlignError, TimeError};
use crate::time_model::NormalizedTime;

// @struct: One finalized, ordered unit of combined output
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    // @field: 1-based contiguous sequence index
    pub index: usize,

    // @field: Normalized start time
    pub start: NormalizedTime,

    // @field: Normalized end time
    pub end: NormalizedTime,

    // @field: First text block
    pub text: String,

    // @field: Second text block, present only when a paired match was found
    pub secondary_text: Option<String>,
}

/// Diagnostic for a cue excluded from alignment
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCue {
    /// Track label the cue came from
    pub track: String,

    /// Position of the cue in its source sequence
    pub cue_index: usize,

    /// Why the cue was excluded
    pub reason: TimeError,
}

/// Result of one alignment invocation: the ordered entries plus diagnostics
/// for any cues that had to be excluded
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// Ordered display entries, indices 1..N with no gaps
    pub entries: Vec<DisplayEntry>,

    /// Cues excluded because their times could not be normalized
    pub skipped: Vec<SkippedCue>,
}

/// Align two cue sequences with the selected strategy.
///
/// Configuration bounds are checked before any cue is touched; a bad knob
/// fails the whole invocation, a bad cue only excludes that cue.
pub fn align(
    strategy: Strategy,
    primary: &CueSequence,
    secondary: &CueSequence,
    config: &AlignmentConfig,
) -> Result<Alignment, AlignError> {
    config.validate()?;

    match strategy {
        Strategy::Timeline => Ok(timeline::merge(primary, secondary)),
        Strategy::Paired => Ok(paired::match_tracks(primary, secondary, config)),
    }
}

/// Normalize a cue's time range, or record a skip diagnostic.
///
/// A cue carries one tick rate for both endpoints, so either both normalize
/// or neither does.
pub(crate) fn normalized_range(
    cue: &TimedCue,
    track: &str,
    cue_index: usize,
    skipped: &mut Vec<SkippedCue>,
) -> Option<(NormalizedTime, NormalizedTime)> {
    match (cue.start(), cue.end()) {
        (Ok(start), Ok(end)) => Some((start, end)),
        (Err(reason), _) | (_, Err(reason)) => {
            skipped.push(SkippedCue {
                track: track.to_string(),
                cue_index,
                reason,
            });
            None
        }
    }
}
