//! Composable UI component renderers.
//!
//! Each component draws one part of the pane at an explicit position and
//! returns the next free row where that makes sense. The layout functions at
//! the bottom of this module stack them per screen.
//!
//! # Components
//!
//! - [`header`]: Title bar with the signed-in user
//! - [`footer`]: Keybinding hints
//! - [`banner`]: Top searches across all users
//! - [`search`]: Search input box
//! - [`grid`]: Results summary, image rows and status line
//! - [`sidebar`]: Filterable search history
//! - [`login`]: Provider list and session cookie input
//! - [`empty`]: Centred messages
//!
//! # Home Layout
//!
//! ```text
//! [Header]
//! [Border]
//! [Sidebar │ Banner     ]
//! [        │ Search Bar ]  3 lines
//! [        │ Summary    ]
//! [        │ Grid       ]  rows - 11 lines
//! [        │ Status     ]
//! [Notice]
//! [Border]
//! [Footer]
//! ```

pub mod banner;
pub mod empty;
pub mod footer;
pub mod grid;
pub mod header;
pub mod login;
pub mod search;
pub mod sidebar;

use crate::app::state::{AppState, SIDEBAR_WIDTH};
use crate::ui::helpers::{pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{EmptyState, HomeView, LoginView, UIViewModel};

use footer::render_footer;
use header::render_header;

/// Renders a horizontal border line at `row`.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the notice line, or clears it.
fn render_notice(row: usize, notice: Option<&str>, theme: &Theme, cols: usize) {
    position_cursor(row, 1);
    match notice {
        Some(notice) => print!("{}{}{}", Theme::fg(&theme.colors.error_fg), pad(&format!(" {notice}"), cols), Theme::reset()),
        None => print!("{}", " ".repeat(cols)),
    }
}

/// Renders the rows shared by every screen: header, the two borders, the
/// notice line and the footer.
fn render_chrome(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let row = render_header(1, &vm.header, theme, cols);
    render_border(row, &theme.colors.border, cols);

    let footer_row = rows;
    let border_row = footer_row.saturating_sub(1);
    render_notice(border_row.saturating_sub(1), vm.notice.as_deref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}

/// Renders the session check screen.
pub fn render_loading_screen(vm: &UIViewModel, empty: &EmptyState, theme: &Theme, cols: usize, rows: usize) {
    render_chrome(vm, theme, cols, rows);
    empty::render_empty_state(rows / 2, empty, theme, cols);
}

/// Renders the login screen.
pub fn render_login_screen(vm: &UIViewModel, login: &LoginView, theme: &Theme, cols: usize, rows: usize) {
    render_chrome(vm, theme, cols, rows);
    login::render_login(4, login, theme, cols);
}

/// Renders the home screen.
pub fn render_home_screen(vm: &UIViewModel, home: &HomeView, theme: &Theme, cols: usize, rows: usize) {
    render_chrome(vm, theme, cols, rows);

    let top = 3;
    let (col, width) = match &home.sidebar {
        Some(sidebar) => {
            sidebar::render_sidebar(top, rows.saturating_sub(3), sidebar, theme, SIDEBAR_WIDTH);
            (SIDEBAR_WIDTH + 1, cols.saturating_sub(SIDEBAR_WIDTH))
        }
        None => (1, cols),
    };

    let mut row = banner::render_banner(top, col, &home.banner, theme, width);
    row = search::render_search_bar(row, col, &home.search_bar, theme, width);
    row = grid::render_summary(row, col, home.summary.as_ref(), theme, width);
    row = grid::render_grid(row, col, &home.grid, AppState::grid_rows(rows), theme, width);
    grid::render_status(row, col, home.status.as_deref(), theme, width);
}
