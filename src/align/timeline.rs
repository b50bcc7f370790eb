use log::debug;

use crate::align::{normalized_range, Alignment, DisplayEntry};
use crate::cue::CueSequence;

// @module: Timeline merge strategy - chronological interleave of both tracks

/// Merge two tracks into one chronological sequence.
///
/// Every cue from both tracks appears exactly once, carrying only its own
/// track's text and its own time range. Order is ascending by normalized
/// start time; on a tie the primary-track cue comes first, and cues with
/// equal track and start keep their original sequence order.
pub fn merge(primary: &CueSequence, secondary: &CueSequence) -> Alignment {
    let mut skipped = Vec::new();

    // Track rank breaks start-time ties: primary before secondary. Building
    // the union primary-first and sorting stably keeps original order for
    // equal (start, rank) keys.
    let mut tagged = Vec::with_capacity(primary.len() + secondary.len());

    for (i, cue) in primary.cues.iter().enumerate() {
        if let Some((start, end)) = normalized_range(cue, &primary.track, i, &mut skipped) {
            tagged.push((start, 0u8, end, &cue.text));
        }
    }
    for (i, cue) in secondary.cues.iter().enumerate() {
        if let Some((start, end)) = normalized_range(cue, &secondary.track, i, &mut skipped) {
            tagged.push((start, 1u8, end, &cue.text));
        }
    }

    tagged.sort_by_key(|(start, rank, _, _)| (*start, *rank));

    let entries = tagged
        .into_iter()
        .enumerate()
        .map(|(i, (start, _, end, text))| DisplayEntry {
            index: i + 1,
            start,
            end,
            text: text.clone(),
            secondary_text: None,
        })
        .collect::<Vec<_>>();

    debug!(
        "Timeline merge: {} + {} cues -> {} entries ({} skipped)",
        primary.len(),
        secondary.len(),
        entries.len(),
        skipped.len()
    );

    Alignment { entries, skipped }
}
