//! Search bar component renderer.

use crate::ui::helpers::{pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the 3-line search box at `row`, starting at column `col` and
/// spanning `width` columns.
///
/// The border takes the accent color while the bar has focus. A pending
/// search replaces the query with `Searching...`; the bar stays read-only
/// until it settles.
///
/// # Returns
///
/// The next available row position (row + 3)
///
/// # Layout
///
/// ```text
/// [margin] ┌────────────────────┐ [margin]
/// [margin] │ Search: mountains_ │ [margin]
/// [margin] └────────────────────┘ [margin]
/// ```
pub fn render_search_bar(row: usize, col: usize, search: &SearchBarInfo, theme: &Theme, width: usize) -> usize {
    let box_width = width.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if search.focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };

    let (text, color) = if search.searching {
        (" Searching...".to_string(), &theme.colors.text_dim)
    } else {
        let caret = if search.focused { "_" } else { "" };
        (format!(" Search: {}{caret}", search.query), &theme.colors.text_normal)
    };

    position_cursor(row, col + SEARCH_BOX_MARGIN);
    print!("{}┌{}┐{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());

    position_cursor(row + 1, col + SEARCH_BOX_MARGIN);
    print!("{}│", Theme::fg(border));
    print!("{}{}", Theme::fg(color), pad(&text, inner_width));
    print!("{}│{}", Theme::fg(border), Theme::reset());

    position_cursor(row + 2, col + SEARCH_BOX_MARGIN);
    print!("{}└{}┘{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());

    row + 3
}
