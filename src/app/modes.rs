//! Route and focus state types.
//!
//! The plugin shows one of two routes. [`Route::Home`] is only reachable
//! through the auth gate; [`Route::Login`] is where the gate and any expired
//! session send the user.
//!
//! Within a route, [`Focus`] decides where keys go. Typing focuses receive
//! plain characters; the others interpret them as commands.
//!
//! # Example
//!
//! ```rust
//! use zsplash::app::modes::{Focus, Route};
//!
//! let focus = Focus::SearchInput;
//! assert!(focus.is_typing());
//! assert_eq!(focus.cycle(Route::Home, true), Focus::Results);
//! ```

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Provider list and session cookie input.
    Login,
    /// Search, results and history. Guarded by the auth gate.
    Home,
}

/// Element receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Home: the search bar. Typing.
    SearchInput,

    /// Home: the image grid.
    Results,

    /// Home: the top searches banner.
    TopSearches,

    /// Home: the history sidebar filter and list. Typing.
    History,

    /// Login: the OAuth provider list.
    Providers,

    /// Login: the session cookie input. Typing.
    CookieInput,
}

impl Focus {
    /// Whether plain characters are text input rather than commands.
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::SearchInput | Self::History | Self::CookieInput)
    }

    /// Initial focus after navigating to `route`.
    #[must_use]
    pub const fn initial(route: Route) -> Self {
        match route {
            Route::Home => Self::SearchInput,
            Route::Login => Self::Providers,
        }
    }

    /// Next focus in `Tab` order. History is skipped while the sidebar is closed.
    #[must_use]
    pub const fn cycle(self, route: Route, sidebar_open: bool) -> Self {
        match (route, self) {
            (Route::Login, Self::Providers) => Self::CookieInput,
            (Route::Login, _) => Self::Providers,
            (Route::Home, Self::SearchInput) => Self::Results,
            (Route::Home, Self::Results) => Self::TopSearches,
            (Route::Home, Self::TopSearches) if sidebar_open => Self::History,
            (Route::Home, _) => Self::SearchInput,
        }
    }
}
