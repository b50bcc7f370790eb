use std::fmt;
use std::path::PathBuf;
use anyhow::Result;
use log::{warn, debug};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cue::{CueSequence, TimedCue};
use crate::errors::ExtractError;

// @module: Regex-based cue extraction from timed-text markup

/// Tick rate assumed when the document does not declare one
pub const DEFAULT_TICK_RATE: u64 = 10_000_000;

// @const: ttp:tickRate attribute
static TICK_RATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"ttp:tickRate\s*=\s*"(\d+)""#).unwrap()
});

// @const: Any paragraph element, attribute list and body captured separately
// so begin/end may appear in either order
static PARAGRAPH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<p\b([^>]*)>(.*?)</p>").unwrap()
});

// @const: Tick-suffixed time attributes (TTML, begin="107840000t")
static TTML_BEGIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bbegin\s*=\s*"(\d+)t""#).unwrap()
});
static TTML_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bend\s*=\s*"(\d+)t""#).unwrap()
});

// @const: Bare tick-count time attributes (DFXP, begin="107840000")
static DFXP_BEGIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bbegin\s*=\s*"(\d+)""#).unwrap()
});
static DFXP_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bend\s*=\s*"(\d+)""#).unwrap()
});

// @const: Line break elements inside a cue body
static BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>").unwrap()
});

// @const: Any remaining markup tag inside a cue body
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<[^>]+>").unwrap()
});

/// Supported timed-text markup dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    /// TTML with tick-suffixed begin/end attributes
    Ttml,
    /// DFXP with bare tick counts in begin/end attributes
    Dfxp,
}

impl TrackFormat {
    fn time_regexes(&self) -> (&'static Regex, &'static Regex) {
        match self {
            TrackFormat::Ttml => (&TTML_BEGIN_REGEX, &TTML_END_REGEX),
            TrackFormat::Dfxp => (&DFXP_BEGIN_REGEX, &DFXP_END_REGEX),
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackFormat::Ttml => write!(f, "ttml"),
            TrackFormat::Dfxp => write!(f, "dfxp"),
        }
    }
}

impl std::str::FromStr for TrackFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ttml" => Ok(TrackFormat::Ttml),
            "dfxp" => Ok(TrackFormat::Dfxp),
            _ => Err(anyhow::anyhow!("Invalid track format: {}", s)),
        }
    }
}

/// Read the declared tick rate from a document, falling back to the default
pub fn extract_tick_rate(document_text: &str) -> u64 {
    TICK_RATE_REGEX
        .captures(document_text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .filter(|rate| *rate > 0)
        .unwrap_or(DEFAULT_TICK_RATE)
}

/// Guess the markup dialect from document content.
///
/// Tick-suffixed times mark TTML; a bare-tick paragraph marks DFXP. Documents
/// matching neither return None and the caller has to say what it has.
pub fn detect_track_format(document_text: &str) -> Option<TrackFormat> {
    if TTML_BEGIN_REGEX.is_match(document_text) {
        Some(TrackFormat::Ttml)
    } else if DFXP_BEGIN_REGEX.is_match(document_text) {
        Some(TrackFormat::Dfxp)
    } else {
        None
    }
}

/// Extract all cues from a markup document into a sequence for one track.
///
/// Cues with an empty body after tag stripping are skipped with a warning and
/// extraction continues; a document yielding no cues at all is an error.
pub fn extract_cues(
    document_text: &str,
    track_format: TrackFormat,
    source_file: PathBuf,
    track: &str,
) -> Result<CueSequence, ExtractError> {
    let tick_rate = extract_tick_rate(document_text);
    debug!("Extracting {} cues from {:?} (tick rate {})", track_format, source_file, tick_rate);

    let mut sequence = CueSequence::new(source_file, track.to_string());
    let (begin_regex, end_regex) = track_format.time_regexes();

    for caps in PARAGRAPH_REGEX.captures_iter(document_text) {
        let attributes = &caps[1];

        // Paragraphs without this dialect's time attributes are not cues
        let begin = match begin_regex.captures(attributes) {
            Some(time_caps) => time_caps[1].to_string(),
            None => continue,
        };
        let end = match end_regex.captures(attributes) {
            Some(time_caps) => time_caps[1].to_string(),
            None => {
                warn!("Skipping cue with a begin but no end attribute");
                continue;
            }
        };

        // The regexes only admit digit runs, so parse failures mean a tick
        // count too large for u64 - skip that cue and keep going.
        let start_ticks = match begin.parse::<u64>() {
            Ok(ticks) => ticks,
            Err(_) => {
                warn!("Skipping cue with out-of-range begin ticks: {}", begin);
                continue;
            }
        };
        let end_ticks = match end.parse::<u64>() {
            Ok(ticks) => ticks,
            Err(_) => {
                warn!("Skipping cue with out-of-range end ticks: {}", end);
                continue;
            }
        };

        let text = clean_cue_body(&caps[2]);
        if text.is_empty() {
            warn!("Skipping empty cue at {} ticks", start_ticks);
            continue;
        }

        sequence
            .cues
            .push(TimedCue::new(start_ticks, end_ticks, tick_rate, text));
    }

    if sequence.is_empty() {
        return Err(ExtractError::NoCues {
            format: track_format.to_string(),
        });
    }

    debug!("Extracted {} cues for track '{}'", sequence.len(), track);
    Ok(sequence)
}

/// Turn a raw cue body into display text: break elements become newlines,
/// remaining tags are stripped, entities unescaped, lines trimmed.
fn clean_cue_body(body: &str) -> String {
    let with_breaks = BREAK_REGEX.replace_all(body, "\n");
    let without_tags = TAG_REGEX.replace_all(&with_breaks, "");

    let unescaped = without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    unescaped
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
