//! Empty state component renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders a centred two-line message with its first line at `row`.
///
/// Used for the session check screen. The message uses `empty_state_fg`,
/// the subtitle `text_dim` with dim styling.
///
/// # Example
///
/// ```rust
/// use zsplash::ui::components::empty::render_empty_state;
/// use zsplash::ui::viewmodel::EmptyState;
/// use zsplash::ui::Theme;
///
/// let empty = EmptyState {
///     message: "Loading...".to_string(),
///     subtitle: "Checking your session".to_string(),
/// };
/// render_empty_state(6, &empty, &Theme::default(), 80);
/// ```
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    render_centered(row, &empty.message, &Theme::fg(&theme.colors.empty_state_fg), cols);

    let subtitle_style = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    render_centered(row + 1, &empty.subtitle, &subtitle_style, cols);
}

/// Prints `text` centred on `row` across the full pane width.
pub fn render_centered(row: usize, text: &str, style: &str, cols: usize) {
    let text = truncate(text, cols);
    let len = text.chars().count();
    let padding = cols.saturating_sub(len) / 2;

    position_cursor(row, 1);
    print!("{style}");
    print!("{}", " ".repeat(padding));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
    print!("{}", Theme::reset());
}
