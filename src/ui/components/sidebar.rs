//! History sidebar renderer.
//!
//! The sidebar occupies the left edge of the home screen, from the banner row
//! down to the row above the notice line:
//!
//! ```text
//! Search History        │
//! Filter: sun_          │
//!  sunset beach  5m ago │
//!  sunflower     2h ago │
//!                       │
//!  2 searches total     │
//! ```

use crate::ui::helpers::{pad, position_cursor, render_highlighted_text, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HistoryItem, SidebarView};

/// Renders the sidebar in rows `top..=bottom`, `width` columns wide
/// including its right border.
pub fn render_sidebar(top: usize, bottom: usize, sidebar: &SidebarView, theme: &Theme, width: usize) {
    let inner = width.saturating_sub(1);
    let total_row = bottom;
    let items_top = top + 2;

    position_cursor(top, 1);
    let title_color = if sidebar.focused {
        &theme.colors.header_fg
    } else {
        &theme.colors.text_dim
    };
    print!("{}{}{}{}", Theme::bold(), Theme::fg(title_color), pad(" Search History", inner), Theme::reset());

    position_cursor(top + 1, 1);
    let caret = if sidebar.focused { "_" } else { "" };
    print!(
        "{}{}{}",
        Theme::fg(&theme.colors.text_normal),
        pad(&format!(" Filter: {}{caret}", sidebar.filter), inner),
        Theme::reset()
    );

    for (offset, row) in (items_top..total_row).enumerate() {
        position_cursor(row, 1);
        if let Some(item) = sidebar.items.get(offset) {
            render_history_item(item, theme, inner);
        } else if offset == 0 && sidebar.empty_message.is_some() {
            let message = sidebar.empty_message.as_deref().unwrap_or_default();
            print!("{}{}{}", Theme::fg(&theme.colors.text_dim), pad(&format!(" {message}"), inner), Theme::reset());
        } else {
            print!("{}", " ".repeat(inner));
        }
    }

    position_cursor(total_row, 1);
    let total = sidebar.total_label.as_deref().unwrap_or_default();
    print!("{}{}{}", Theme::fg(&theme.colors.text_dim), pad(&format!(" {total}"), inner), Theme::reset());

    for row in top..=bottom {
        position_cursor(row, width);
        print!("{}│{}", Theme::fg(&theme.colors.border), Theme::reset());
    }
}

fn render_history_item(item: &HistoryItem, theme: &Theme, inner: usize) {
    let when = truncate(&item.when, 9);
    let when_len = when.chars().count();
    let term_width = inner.saturating_sub(when_len + 2);
    let term = truncate(&item.term, term_width);
    let gap = term_width.saturating_sub(term.chars().count());

    let style = if item.is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    print!("{style} ");
    render_highlighted_text(&term, &item.highlight_ranges, theme, &style);
    print!("{}", " ".repeat(gap));
    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{when} {}", Theme::reset());
}
