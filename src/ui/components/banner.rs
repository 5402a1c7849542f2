//! Top searches banner renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::BannerInfo;

const TITLE: &str = " Top Searches Across All Users: ";

/// Renders the one-line banner of global top searches at `row`.
///
/// Chips that do not fit in `width` are dropped; the focused chip is drawn
/// with selection colors.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_banner(row: usize, col: usize, banner: &BannerInfo, theme: &Theme, width: usize) -> usize {
    position_cursor(row, col);

    let title = truncate(TITLE, width);
    let mut used = title.chars().count();
    let title_color = if banner.focused {
        &theme.colors.header_fg
    } else {
        &theme.colors.text_dim
    };
    print!("{}{}{title}{}", Theme::bold(), Theme::fg(title_color), Theme::reset());

    if banner.items.is_empty() {
        let empty = truncate("none yet", width.saturating_sub(used));
        used += empty.chars().count();
        print!("{}{empty}", Theme::fg(&theme.colors.text_dim));
    }

    for item in &banner.items {
        let chip = format!(" {} ", item.label);
        let chip_len = chip.chars().count();
        if used + chip_len + 1 > width {
            break;
        }

        if item.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.accent_fg));
        }
        print!("{chip}{} ", Theme::reset());
        used += chip_len + 1;
    }

    print!("{}{}", Theme::reset(), " ".repeat(width.saturating_sub(used)));
    row + 1
}
