//! Results summary, image grid and status line renderers.
//!
//! The grid lists one image per row:
//!
//! ```text
//! > [x] a cat sleeping on a windowsill          Photo by Ann Smith
//!   [ ] orange cat in the snow                  Photo by Lee
//! ```
//!
//! The cursor row is drawn with selection colors; checked images show their
//! box in the accent color.

use crate::ui::helpers::{pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{GridItem, SummaryInfo};

/// Width of `> [x] `.
const MARKER_WIDTH: usize = 6;

/// Renders the summary line at `row`, or a blank line without a committed
/// search.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_summary(row: usize, col: usize, summary: Option<&SummaryInfo>, theme: &Theme, width: usize) -> usize {
    position_cursor(row, col);

    let Some(summary) = summary else {
        print!("{}", " ".repeat(width));
        return row + 1;
    };

    let selected = summary.selected.as_deref().unwrap_or_default();
    let text_width = width.saturating_sub(selected.chars().count() + 1);

    print!("{}{}", Theme::fg(&theme.colors.text_normal), pad(&format!(" {}", summary.text), text_width));
    print!("{}{selected} {}", Theme::fg(&theme.colors.accent_fg), Theme::reset());
    row + 1
}

/// Renders the visible grid rows starting at `row`, filling `available`
/// rows so stale content from a previous frame is cleared.
///
/// # Returns
///
/// The row after the grid area (row + available)
pub fn render_grid(row: usize, col: usize, items: &[GridItem], available: usize, theme: &Theme, width: usize) -> usize {
    for offset in 0..available {
        position_cursor(row + offset, col);
        match items.get(offset) {
            Some(item) => render_grid_row(item, theme, width),
            None => print!("{}", " ".repeat(width)),
        }
    }
    row + available
}

fn render_grid_row(item: &GridItem, theme: &Theme, width: usize) {
    let credit_len = item.credit.chars().count();
    let title_width = width.saturating_sub(MARKER_WIDTH + credit_len + 1);

    let (fg, base) = if item.is_cursor {
        (
            Theme::fg(&theme.colors.selection_fg),
            format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg)),
        )
    } else {
        let fg = Theme::fg(&theme.colors.text_normal);
        (fg.clone(), fg)
    };

    print!("{base}");
    print!("{}", if item.is_cursor { "> " } else { "  " });

    if item.is_checked && !item.is_cursor {
        print!("{}[x]{fg}", Theme::fg(&theme.colors.accent_fg));
    } else if item.is_checked {
        print!("[x]");
    } else {
        print!("[ ]");
    }

    print!(" {}", pad(&item.title, title_width));
    if !item.is_cursor {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{} ", item.credit);
    print!("{}", Theme::reset());
}

/// Renders the status line under the grid (loading, end of results, empty
/// states), or a blank line.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_status(row: usize, col: usize, status: Option<&str>, theme: &Theme, width: usize) -> usize {
    position_cursor(row, col);
    match status {
        Some(status) => {
            let text = pad(status, width.saturating_sub(2));
            print!("{}{}  {text}{}", Theme::dim(), Theme::fg(&theme.colors.empty_state_fg), Theme::reset());
        }
        None => print!("{}", " ".repeat(width)),
    }
    row + 1
}
