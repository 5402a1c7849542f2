//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the layout for the current screen
//!
//! # Example
//!
//! ```rust
//! use zsplash::api::{ApiClient, CookieJar};
//! use zsplash::app::AppState;
//! use zsplash::ui::{render, Theme};
//!
//! let client = ApiClient::new("https://example.com/api", CookieJar::new());
//! let state = AppState::new(client, Theme::default(), "xdg-open".to_string());
//! render(&state, 24, 80);
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Screen, UIViewModel};

/// Renders the plugin UI to stdout.
///
/// Does not clear the screen; every layout overwrites each row it owns.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows = rows, cols = cols).entered();

    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols);
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    match &vm.screen {
        Screen::Loading(empty) => components::render_loading_screen(vm, empty, theme, cols, rows),
        Screen::Login(login) => components::render_login_screen(vm, login, theme, cols, rows),
        Screen::Home(home) => components::render_home_screen(vm, home, theme, cols, rows),
    }
}
