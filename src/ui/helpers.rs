//! Shared rendering utilities and helpers.
//!
//! Everything here measures text in characters rather than bytes, so
//! non-ASCII search terms and alt texts line up with the grid columns.
//!
//! # Example
//!
//! ```rust
//! use zsplash::ui::helpers::{pad, truncate};
//!
//! assert_eq!(truncate("mountain lake at dawn", 12), "mountain ...");
//! assert_eq!(pad("cats", 6), "cats  ");
//! ```

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Shortens `text` to at most `width` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    const ELLIPSIS: &str = "...";

    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }

    let kept: String = text.chars().take(width - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Right-pads `text` with spaces to `width` characters, truncating if longer.
#[must_use]
pub fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Prints `text` with the character ranges in `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices, end exclusive, sorted and
/// non-overlapping. Indices past the end of `text` are ignored. After each
/// highlight, `restore` is printed to return to the surrounding style.
///
/// # Example
///
/// ```rust
/// use zsplash::ui::helpers::render_highlighted_text;
/// use zsplash::ui::theme::Theme;
///
/// let theme = Theme::default();
/// render_highlighted_text("sunset beach", &[(0, 3)], &theme, "");
/// ```
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        let normal: String = chars[current_pos..start].iter().collect();
        print!("{normal}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted: String = chars[start..end].iter().collect();
        print!("{highlighted}");
        print!("{}{restore}", Theme::reset());

        current_pos = end;
    }

    let remaining: String = chars[current_pos..].iter().collect();
    print!("{remaining}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("café au lait", 20), "café au lait");
        assert_eq!(truncate("café au lait", 7), "café...");
        assert_eq!(truncate("cats", 2), "ca");
        assert_eq!(truncate("cats", 0), "");
    }

    #[test]
    fn pad_fills_and_clips() {
        assert_eq!(pad("ñu", 4), "ñu  ");
        assert_eq!(pad("mountains", 6), "mou...");
    }
}
