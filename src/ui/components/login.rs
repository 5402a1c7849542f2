//! Login view renderer.
//!
//! ```text
//!                 Sign in to search images
//!
//!                 > Continue with Google
//!                   Continue with GitHub
//!                   Continue with Facebook
//!
//!                 Session cookie (paste after signing in):
//!                 ┌──────────────────────────────────┐
//!                 │ ********_                        │
//!                 └──────────────────────────────────┘
//!                 Verifying session...
//! ```

use super::empty::render_centered;
use crate::ui::helpers::{pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LoginView;

const FORM_WIDTH: usize = 48;

/// Renders the login form starting at `row`.
///
/// # Returns
///
/// The row after the form.
pub fn render_login(row: usize, login: &LoginView, theme: &Theme, cols: usize) -> usize {
    let width = FORM_WIDTH.min(cols);
    let col = cols.saturating_sub(width) / 2 + 1;
    let mut current_row = row;

    render_centered(
        current_row,
        "Sign in to search images",
        &format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg)),
        cols,
    );
    current_row += 2;

    for provider in &login.providers {
        position_cursor(current_row, col);
        let line = format!("Continue with {}", provider.label);
        if provider.is_selected && login.providers_focused {
            print!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg));
            print!("{}", pad(&format!("> {line}"), width));
        } else if provider.is_selected {
            print!("{}{}", Theme::fg(&theme.colors.text_normal), pad(&format!("> {line}"), width));
        } else {
            print!("{}{}", Theme::fg(&theme.colors.text_dim), pad(&format!("  {line}"), width));
        }
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row += 1;

    position_cursor(current_row, col);
    print!(
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        pad("Session cookie (paste after signing in):", width),
        Theme::reset()
    );
    current_row += 1;

    let inner = width.saturating_sub(2);
    let border = if login.cookie_focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };
    let caret = if login.cookie_focused { "_" } else { "" };

    position_cursor(current_row, col);
    print!("{}┌{}┐", Theme::fg(border), "─".repeat(inner));
    position_cursor(current_row + 1, col);
    print!("│{}", Theme::fg(&theme.colors.text_normal));
    print!("{}", pad(&format!(" {}{caret}", login.cookie_input), inner));
    print!("{}│", Theme::fg(border));
    position_cursor(current_row + 2, col);
    print!("└{}┘{}", "─".repeat(inner), Theme::reset());
    current_row += 3;

    position_cursor(current_row, col);
    if login.verifying {
        print!("{}{}", Theme::fg(&theme.colors.empty_state_fg), pad("Verifying session...", width));
    } else if let Some(error) = &login.error {
        print!("{}{}", Theme::fg(&theme.colors.error_fg), pad(error, width));
    } else {
        print!("{}", " ".repeat(width));
    }
    print!("{}", Theme::reset());

    current_row + 1
}
