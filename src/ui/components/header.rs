//! Header component renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title bar at `row`: the title centred, the signed-in user on
/// the right.
///
/// # Returns
///
/// The next available row position (row + 1)
///
/// # Example
///
/// ```rust
/// use zsplash::ui::components::header::render_header;
/// use zsplash::ui::viewmodel::HeaderInfo;
/// use zsplash::ui::Theme;
///
/// let header = HeaderInfo { title: " zsplash ".to_string(), user: Some("Ann".to_string()) };
/// let next_row = render_header(1, &header, &Theme::default(), 80);
/// assert_eq!(next_row, 2);
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&header.title, cols);
    let title_len = title.chars().count();
    let padding = cols.saturating_sub(title_len) / 2;

    let user = header
        .user
        .as_deref()
        .map(|user| truncate(user, padding.saturating_sub(2)))
        .unwrap_or_default();
    let user_len = user.chars().count();

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");

    let right = cols.saturating_sub(padding + title_len);
    if user_len > 0 {
        print!("{}", " ".repeat(right.saturating_sub(user_len + 1)));
        print!("{}{user} ", Theme::fg(&theme.colors.accent_fg));
    } else {
        print!("{}", " ".repeat(right));
    }

    print!("{}", Theme::reset());
    row + 1
}
