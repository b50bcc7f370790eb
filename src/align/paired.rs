use log::{debug, trace};

use crate::align::{normalized_range, Alignment, DisplayEntry, SkippedCue};
use crate::app_config::AlignmentConfig;
use crate::cue::CueSequence;
use crate::time_model::NormalizedTime;

// @module: Paired match strategy - windowed nearest-time matching with a
// monotone cursor

/// A normalized cue ready for matching: its position in the source sequence
/// plus its time range and text.
struct PreparedCue<'a> {
    start: NormalizedTime,
    end: NormalizedTime,
    text: &'a str,
}

/// The secondary cue chosen for one primary cue: a read-only association,
/// not a copy.
struct MatchResult {
    /// Index into the prepared secondary sequence
    index: usize,

    /// Absolute start-time gap that produced the choice
    gap: NormalizedTime,
}

/// Match secondary cues onto primary cues, one entry per primary cue.
///
/// Both sequences are independently sorted by normalized start time before
/// matching. A single cursor walks the secondary track: each accepted match
/// moves it just past the matched cue, and the search for the next primary
/// cue may step back at most `backtrack` cues from there, looking at
/// `search_window` candidates. The cursor never moves on a failed match, so
/// one out-of-gap primary cue cannot desynchronize the rest of the pass.
pub fn match_tracks(
    primary: &CueSequence,
    secondary: &CueSequence,
    config: &AlignmentConfig,
) -> Alignment {
    let mut skipped = Vec::new();

    let a = prepare(primary, &mut skipped);
    let b = prepare(secondary, &mut skipped);

    let max_gap = NormalizedTime::from_seconds_f64(config.max_gap_seconds);

    let mut entries = Vec::with_capacity(a.len());
    let mut cursor = 0usize;

    for cue in &a {
        let result = best_in_window(cue.start, &b, cursor, config);

        let secondary_text = match result {
            // Strict comparison: a zero gap threshold disables matching.
            Some(m) if m.gap < max_gap => {
                trace!(
                    "Matched primary cue at {} to secondary index {} (gap {:.3}s)",
                    cue.start,
                    m.index,
                    m.gap.as_seconds_f64()
                );
                cursor = m.index + 1;
                Some(b[m.index].text.to_string())
            }
            _ => None,
        };

        entries.push(DisplayEntry {
            index: entries.len() + 1,
            start: cue.start,
            end: cue.end,
            text: cue.text.to_string(),
            secondary_text,
        });
    }

    let matched = entries.iter().filter(|e| e.secondary_text.is_some()).count();
    debug!(
        "Paired match: {}/{} primary cues matched against {} secondary cues ({} skipped)",
        matched,
        entries.len(),
        b.len(),
        skipped.len()
    );

    Alignment { entries, skipped }
}

/// Normalize and sort one track's cues by start time, excluding cues whose
/// times cannot be normalized.
fn prepare<'a>(sequence: &'a CueSequence, skipped: &mut Vec<SkippedCue>) -> Vec<PreparedCue<'a>> {
    let mut prepared: Vec<PreparedCue<'a>> = sequence
        .cues
        .iter()
        .enumerate()
        .filter_map(|(i, cue)| {
            normalized_range(cue, &sequence.track, i, skipped).map(|(start, end)| PreparedCue {
                start,
                end,
                text: &cue.text,
            })
        })
        .collect();

    prepared.sort_by_key(|cue| cue.start);
    prepared
}

/// Find the secondary cue closest in start time within the bounded window
/// `[max(0, cursor - backtrack), +search_window)`. Ties go to the earliest
/// index.
fn best_in_window(
    target: NormalizedTime,
    b: &[PreparedCue],
    cursor: usize,
    config: &AlignmentConfig,
) -> Option<MatchResult> {
    let lo = cursor.saturating_sub(config.backtrack);
    let hi = (lo + config.search_window).min(b.len());

    let mut best: Option<MatchResult> = None;
    for (index, candidate) in b.iter().enumerate().take(hi).skip(lo) {
        let gap = NormalizedTime::difference(target, candidate.start);
        match &best {
            Some(current) if gap >= current.gap => {}
            _ => best = Some(MatchResult { index, gap }),
        }
    }

    best
}
