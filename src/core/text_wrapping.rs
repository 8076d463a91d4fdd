//! Display-width wrapping for the transcript.
//!
//! Messages are pre-wrapped into explicit lines before rendering so the
//! renderer knows exactly how many rows the transcript occupies when it
//! computes the scroll offset. Chinese text has no spaces to break on, so
//! lines break between any two characters; runs of ASCII words still break at
//! the last space when one is available.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

/// Wrap `text` to `width` terminal columns. Explicit newlines are kept and an
/// empty input yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    wrap_ranges(text, width)
        .into_iter()
        .map(|row| text[row].to_string())
        .collect()
}

/// Byte ranges of `text` making up each wrapped row. Newlines belong to no
/// row; the rows of one source line concatenate back to that line.
pub fn wrap_ranges(text: &str, width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        if width == 0 {
            rows.push(line_start..line_start + line.len());
        } else {
            rows.extend(
                wrap_line(line, width)
                    .into_iter()
                    .map(|row| row.start + line_start..row.end + line_start),
            );
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Number of rows `text` occupies at `width` columns.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    wrap_ranges(text, width).len()
}

fn wrap_line(line: &str, width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut row_width = 0;
    // Byte offset just past the last space in the current row, if any.
    let mut break_at: Option<usize> = None;

    for (idx, ch) in line.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if row_width + ch_width > width && idx > start {
            // Carrying the last word only helps if it still fits with `ch`.
            let end = break_at
                .filter(|&at| at < idx && display_width(&line[at..idx]) + ch_width <= width)
                .unwrap_or(idx);
            rows.push(start..end);
            start = end;
            row_width = display_width(&line[start..idx]);
            break_at = None;
        }

        row_width += ch_width;
        if ch == ' ' {
            break_at = Some(idx + 1);
        }
    }

    rows.push(start..line.len());
    rows
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}
