use std::fmt;
use std::path::PathBuf;
use anyhow::{Result, anyhow};
use log::warn;

use crate::errors::TimeError;
use crate::time_model::NormalizedTime;

// @module: Timed cue data model

// @struct: Single timed caption unit
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCue {
    // @field: Start time in ticks
    pub start_ticks: u64,

    // @field: End time in ticks
    pub end_ticks: u64,

    // @field: Ticks per second in effect when the cue was produced
    pub tick_rate: u64,

    // @field: Display text, possibly multi-line
    pub text: String,
}

impl TimedCue {
    /// Creates a new cue - used by tests and the extraction collaborator
    pub fn new(start_ticks: u64, end_ticks: u64, tick_rate: u64, text: String) -> Self {
        TimedCue {
            start_ticks,
            end_ticks,
            tick_rate,
            text,
        }
    }

    // @creates: Validated cue
    // @validates: Non-zero tick rate and non-empty text
    pub fn new_validated(
        start_ticks: u64,
        end_ticks: u64,
        tick_rate: u64,
        text: String,
    ) -> Result<Self> {
        if tick_rate == 0 {
            return Err(anyhow!("Invalid tick rate 0 for cue starting at {} ticks", start_ticks));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty cue text at {} ticks", start_ticks));
        }

        Ok(TimedCue {
            start_ticks,
            end_ticks,
            tick_rate,
            text: trimmed_text.to_string(),
        })
    }

    /// Normalized start time
    pub fn start(&self) -> Result<NormalizedTime, TimeError> {
        NormalizedTime::normalize(self.start_ticks, self.tick_rate)
    }

    /// Normalized end time
    pub fn end(&self) -> Result<NormalizedTime, TimeError> {
        NormalizedTime::normalize(self.end_ticks, self.tick_rate)
    }
}

impl fmt::Display for TimedCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.start(), self.end()) {
            (Ok(start), Ok(end)) => write!(f, "{} --> {}: {}", start, end, self.text),
            _ => write!(f, "{}t --> {}t (rate {}): {}", self.start_ticks, self.end_ticks, self.tick_rate, self.text),
        }
    }
}

/// One track's ordered sequence of cues with source metadata
#[derive(Debug, Clone)]
pub struct CueSequence {
    /// Source filename
    pub source_file: PathBuf,

    /// Track label (language code or caller-chosen name)
    pub track: String,

    /// Cues in document order; not necessarily sorted by start time
    pub cues: Vec<TimedCue>,
}

impl CueSequence {
    /// Create an empty sequence for a track
    pub fn new(source_file: PathBuf, track: String) -> Self {
        CueSequence {
            source_file,
            track,
            cues: Vec::new(),
        }
    }

    /// Number of cues in the sequence
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the sequence holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Return a copy sorted ascending by normalized start time.
    ///
    /// Cues whose start cannot be normalized keep their relative position at
    /// the front of the result; the strategies exclude them with a diagnostic
    /// before matching, so their placement here never affects output order.
    pub fn sorted_by_start(&self) -> CueSequence {
        let mut cues = self.cues.clone();
        cues.sort_by_key(|cue| cue.start().unwrap_or_default());
        CueSequence {
            source_file: self.source_file.clone(),
            track: self.track.clone(),
            cues,
        }
    }

    /// Count cues with an end time before their start time. Malformed ranges
    /// are passed through untouched, this is informational only.
    pub fn count_inverted_ranges(&self) -> usize {
        let inverted = self
            .cues
            .iter()
            .filter(|cue| cue.end_ticks < cue.start_ticks)
            .count();
        if inverted > 0 {
            warn!("Track '{}': {} cue(s) end before they start", self.track, inverted);
        }
        inverted
    }
}

impl fmt::Display for CueSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Sequence")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Track: {}", self.track)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
