//! Text helpers shared by the renderer.

use std::ops::Range;

const HIGHLIGHT: &str = "\u{1b}[1;33m";
const BOLD: &str = "\u{1b}[1m";
const DIM: &str = "\u{1b}[2m";
const RESET: &str = "\u{1b}[0m";

/// Display width of `text` in chars.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Pads `text` with spaces to `width` chars, or cuts it with an ellipsis.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let len = self::width(text);
    if len <= width {
        return format!("{text}{}", " ".repeat(width - len));
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Byte length of the prefix of `text` that [`fit`] keeps at `width`.
#[must_use]
pub fn kept_len(text: &str, width: usize) -> usize {
    if self::width(text) <= width {
        return text.len();
    }
    text.char_indices()
        .nth(width.saturating_sub(1))
        .map_or(text.len(), |(index, _)| index)
}

/// Restricts byte ranges to the first `limit` bytes, dropping those past it.
#[must_use]
pub fn clip_ranges(ranges: &[Range<usize>], limit: usize) -> Vec<Range<usize>> {
    ranges
        .iter()
        .filter(|range| range.start < limit)
        .map(|range| range.start..range.end.min(limit))
        .collect()
}

/// Wraps the given byte ranges of `text` in highlight escapes.
///
/// Ranges must be sorted, non-overlapping and on char boundaries, as produced by
/// [`crate::app::search::match_ranges`]. Without `color` the text is returned
/// unchanged.
#[must_use]
pub fn highlight(text: &str, ranges: &[Range<usize>], color: bool) -> String {
    if !color || ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut cursor = 0;
    for range in ranges {
        let (Some(before), Some(hit)) = (text.get(cursor..range.start), text.get(range.clone())) else {
            break;
        };
        out.push_str(before);
        out.push_str(HIGHLIGHT);
        out.push_str(hit);
        out.push_str(RESET);
        cursor = range.end;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}

/// Bold when `color` is set.
#[must_use]
pub fn bold(text: &str, color: bool) -> String {
    if color {
        format!("{BOLD}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Dimmed when `color` is set.
#[must_use]
pub fn dim(text: &str, color: bool) -> String {
    if color {
        format!("{DIM}{text}{RESET}")
    } else {
        text.to_string()
    }
}
