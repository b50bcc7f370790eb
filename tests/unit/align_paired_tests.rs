/*!
 * Tests for the paired match strategy
 */

use dualsub::align::{align, paired};
use dualsub::app_config::{AlignmentConfig, Strategy};
use dualsub::errors::AlignError;
use crate::common;

fn config(max_gap_seconds: f64, search_window: usize, backtrack: usize) -> AlignmentConfig {
    AlignmentConfig {
        max_gap_seconds,
        search_window,
        backtrack,
    }
}

/// Close cues pair up, distant ones stay alone
#[test]
fn test_match_withNearAndFarCues_shouldPairOnlyWithinGap() {
    let a = common::sequence(
        "en",
        vec![
            common::cue_at_seconds(0.0, 1.0, "a1"),
            common::cue_at_seconds(10.0, 11.0, "a2"),
        ],
    );
    let b = common::sequence(
        "fr",
        vec![
            common::cue_at_seconds(0.2, 1.2, "b1"),
            common::cue_at_seconds(20.0, 21.0, "b2"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));

    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.entries[0].text, "a1");
    assert_eq!(result.entries[0].secondary_text.as_deref(), Some("b1"));
    assert_eq!(result.entries[1].text, "a2");
    // Nearest secondary is 10s away, beyond the 1s gap
    assert_eq!(result.entries[1].secondary_text, None);
}

/// Output length always equals the primary length
#[test]
fn test_match_withAnySecondaryLength_shouldEmitOnePerPrimary() {
    let a = common::sequence(
        "en",
        vec![
            common::cue_at_seconds(1.0, 2.0, "a1"),
            common::cue_at_seconds(3.0, 4.0, "a2"),
            common::cue_at_seconds(5.0, 6.0, "a3"),
        ],
    );

    let empty = common::sequence("fr", vec![]);
    let result = paired::match_tracks(&a, &empty, &config(1.0, 10, 2));
    assert_eq!(result.entries.len(), 3);
    assert!(result.entries.iter().all(|e| e.secondary_text.is_none()));

    let one = common::sequence("fr", vec![common::cue_at_seconds(3.1, 4.0, "b1")]);
    let result = paired::match_tracks(&a, &one, &config(1.0, 10, 2));
    assert_eq!(result.entries.len(), 3);
}

/// An empty primary yields empty output without error
#[test]
fn test_match_withEmptyPrimary_shouldReturnEmpty() {
    let empty = common::sequence("en", vec![]);
    let b = common::sequence("fr", vec![common::cue_at_seconds(5.0, 6.0, "b1")]);

    let result = paired::match_tracks(&empty, &b, &config(1.0, 10, 2));
    assert!(result.entries.is_empty());
}

/// Single-cue tracks pair when within the gap (empty-secondary scenario from
/// the companion test has no match to make)
#[test]
fn test_match_withLonePrimary_shouldSurviveEmptySecondary() {
    let a = common::sequence("en", vec![common::cue_at_seconds(5.0, 6.0, "a1")]);
    let empty = common::sequence("fr", vec![]);

    let result = paired::match_tracks(&a, &empty, &config(1.0, 10, 2));
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].text, "a1");
    assert_eq!(result.entries[0].secondary_text, None);
}

/// A zero gap threshold disables matching entirely
#[test]
fn test_match_withZeroGap_shouldNeverPair() {
    let a = common::sequence("en", vec![common::cue_at_seconds(1.0, 2.0, "a1")]);
    let b = common::sequence("fr", vec![common::cue_at_seconds(1.0, 2.0, "b1")]);

    let result = paired::match_tracks(&a, &b, &config(0.0, 10, 2));
    assert_eq!(result.entries[0].secondary_text, None);
}

/// Matched pairs always sit strictly below the gap threshold
#[test]
fn test_match_withTrackOffset_shouldRespectGapBound() {
    let a = common::sequence(
        "en",
        (0..20)
            .map(|i| common::cue_at_seconds(i as f64 * 3.0, i as f64 * 3.0 + 2.0, "a"))
            .collect(),
    );
    // Secondary shifted by 0.4s
    let b = common::sequence(
        "fr",
        (0..20)
            .map(|i| common::cue_at_seconds(i as f64 * 3.0 + 0.4, i as f64 * 3.0 + 2.4, "b"))
            .collect(),
    );

    let cfg = config(1.0, 10, 2);
    let result = paired::match_tracks(&a, &b, &cfg);

    for (entry, b_cue) in result.entries.iter().zip(&b.cues) {
        assert!(entry.secondary_text.is_some());
        let gap = (entry.start.as_seconds_f64() - b_cue.start().unwrap().as_seconds_f64()).abs();
        assert!(gap < cfg.max_gap_seconds);
    }
}

/// On well-separated tracks the cursor walks forward and no secondary cue
/// serves two primary cues
#[test]
fn test_match_withAlignedTracks_shouldUseEachSecondaryOnce() {
    let a = common::sequence(
        "en",
        (0..10)
            .map(|i| common::cue_at_seconds(i as f64 * 5.0, i as f64 * 5.0 + 4.0, "a"))
            .collect(),
    );
    let b = common::sequence(
        "fr",
        (0..10)
            .map(|i| {
                let start = i as f64 * 5.0 + 0.3;
                common::cue_at_seconds(start, start + 4.0, &format!("b{i}"))
            })
            .collect(),
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));

    let matched: Vec<&str> = result
        .entries
        .iter()
        .filter_map(|e| e.secondary_text.as_deref())
        .collect();
    assert_eq!(matched.len(), 10);

    let mut deduped = matched.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), matched.len());
}

/// A failed match leaves the cursor in place so later cues still pair
#[test]
fn test_match_withOutlierPrimaryCue_shouldNotDesynchronize() {
    let a = common::sequence(
        "en",
        vec![
            common::cue_at_seconds(0.0, 1.0, "a1"),
            // No secondary counterpart anywhere near
            common::cue_at_seconds(100.0, 101.0, "outlier"),
            common::cue_at_seconds(5.0, 6.0, "a3"),
        ],
    );
    let b = common::sequence(
        "fr",
        vec![
            common::cue_at_seconds(0.1, 1.1, "b1"),
            common::cue_at_seconds(5.1, 6.1, "b3"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));

    // Primary is sorted by start before matching: a1, a3, outlier
    assert_eq!(result.entries[0].text, "a1");
    assert_eq!(result.entries[0].secondary_text.as_deref(), Some("b1"));
    assert_eq!(result.entries[1].text, "a3");
    assert_eq!(result.entries[1].secondary_text.as_deref(), Some("b3"));
    assert_eq!(result.entries[2].text, "outlier");
    assert_eq!(result.entries[2].secondary_text, None);
}

/// The bounded window caps how far ahead of the cursor a match can be found,
/// even when the time gap is small
#[test]
fn test_match_withMatchBeyondWindow_shouldMiss() {
    // Primary cue at 50s; its true counterpart is the 6th secondary cue, but
    // a window of 3 starting at the cursor can never reach it.
    let a = common::sequence("en", vec![common::cue_at_seconds(50.0, 51.0, "a1")]);
    let b = common::sequence(
        "fr",
        vec![
            common::cue_at_seconds(1.0, 2.0, "b1"),
            common::cue_at_seconds(2.0, 3.0, "b2"),
            common::cue_at_seconds(3.0, 4.0, "b3"),
            common::cue_at_seconds(4.0, 5.0, "b4"),
            common::cue_at_seconds(5.0, 6.0, "b5"),
            common::cue_at_seconds(50.2, 51.0, "b6"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 3, 2));
    assert_eq!(result.entries[0].secondary_text, None);
}

/// Equidistant candidates resolve to the earliest secondary index
#[test]
fn test_match_withEquidistantCandidates_shouldPickEarliest() {
    let a = common::sequence("en", vec![common::cue_at_seconds(5.0, 6.0, "a1")]);
    let b = common::sequence(
        "fr",
        vec![
            common::cue_at_seconds(4.5, 5.0, "early"),
            common::cue_at_seconds(5.5, 6.0, "late"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));
    assert_eq!(result.entries[0].secondary_text.as_deref(), Some("early"));
}

/// Unsorted inputs are sorted by start before matching
#[test]
fn test_match_withUnsortedInputs_shouldSortFirst() {
    let a = common::sequence(
        "en",
        vec![
            common::cue_at_seconds(10.0, 11.0, "a2"),
            common::cue_at_seconds(0.0, 1.0, "a1"),
        ],
    );
    let b = common::sequence(
        "fr",
        vec![
            common::cue_at_seconds(10.2, 11.2, "b2"),
            common::cue_at_seconds(0.2, 1.2, "b1"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));

    assert_eq!(result.entries[0].text, "a1");
    assert_eq!(result.entries[0].secondary_text.as_deref(), Some("b1"));
    assert_eq!(result.entries[1].text, "a2");
    assert_eq!(result.entries[1].secondary_text.as_deref(), Some("b2"));
}

/// Re-running on identical inputs yields an identical entry list
#[test]
fn test_match_withSameInputsTwice_shouldBeIdempotent() {
    let a = common::sequence(
        "en",
        (0..8)
            .map(|i| common::cue_at_seconds(i as f64 * 2.0, i as f64 * 2.0 + 1.5, "a"))
            .collect(),
    );
    let b = common::sequence(
        "fr",
        (0..8)
            .map(|i| common::cue_at_seconds(i as f64 * 2.0 + 0.25, i as f64 * 2.0 + 1.75, "b"))
            .collect(),
    );

    let cfg = config(1.0, 10, 2);
    let first = paired::match_tracks(&a, &b, &cfg);
    let second = paired::match_tracks(&a, &b, &cfg);
    assert_eq!(first.entries, second.entries);
}

/// Bad knobs fail fast through the dispatcher, before any cue is processed
#[test]
fn test_align_withBadConfiguration_shouldFailFast() {
    let a = common::sequence("en", vec![common::cue_at_seconds(0.0, 1.0, "a1")]);
    let b = common::sequence("fr", vec![common::cue_at_seconds(0.0, 1.0, "b1")]);

    let negative_gap = config(-1.0, 10, 2);
    let result = align(Strategy::Paired, &a, &b, &negative_gap);
    assert!(matches!(result, Err(AlignError::InvalidConfiguration(_))));

    let zero_window = config(1.0, 0, 2);
    let result = align(Strategy::Paired, &a, &b, &zero_window);
    assert!(matches!(result, Err(AlignError::InvalidConfiguration(_))));

    let nan_gap = config(f64::NAN, 10, 2);
    let result = align(Strategy::Paired, &a, &b, &nan_gap);
    assert!(matches!(result, Err(AlignError::InvalidConfiguration(_))));
}

/// An unnormalizable secondary cue is excluded with a diagnostic and the
/// remaining cues still match
#[test]
fn test_match_withUnnormalizableSecondaryCue_shouldSkipAndContinue() {
    use dualsub::cue::TimedCue;

    let a = common::sequence("en", vec![common::cue_at_seconds(1.0, 2.0, "a1")]);
    let b = common::sequence(
        "fr",
        vec![
            TimedCue::new(500, 600, 0, "broken".to_string()),
            common::cue_at_seconds(1.1, 2.1, "b1"),
        ],
    );

    let result = paired::match_tracks(&a, &b, &config(1.0, 10, 2));

    assert_eq!(result.entries[0].secondary_text.as_deref(), Some("b1"));
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].track, "fr");
}
