use std::fmt::Write;

use crate::align::DisplayEntry;
use crate::app_config::OutputFormat;

// @module: Output projection - display entries to on-disk text

/// Render an ordered entry list to its final textual form.
///
/// Timed output (SRT) writes an index line and a time-range line per block;
/// untimed output writes the text blocks alone. That is the only divergence
/// between the two formats - ordering and matching are already final here.
pub fn render(entries: &[DisplayEntry], format: OutputFormat) -> String {
    let mut out = String::new();

    for entry in entries {
        if format.is_timed() {
            render_timed_block(&mut out, entry);
        } else {
            render_untimed_block(&mut out, entry);
        }
        out.push('\n');
    }

    out
}

/// One SRT block: index, `HH:MM:SS,mmm --> HH:MM:SS,mmm`, text lines
fn render_timed_block(out: &mut String, entry: &DisplayEntry) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", entry.index);
    let _ = writeln!(
        out,
        "{} --> {}",
        entry.start.format_timestamp(),
        entry.end.format_timestamp()
    );
    push_text_blocks(out, entry);
}

/// One plain-text block: text lines only
fn render_untimed_block(out: &mut String, entry: &DisplayEntry) {
    push_text_blocks(out, entry);
}

fn push_text_blocks(out: &mut String, entry: &DisplayEntry) {
    out.push_str(&entry.text);
    out.push('\n');
    if let Some(secondary) = &entry.secondary_text {
        out.push_str(secondary);
        out.push('\n');
    }
}
