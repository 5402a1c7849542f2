//! Zsplash: a Zellij plugin for searching and collecting images.
//!
//! Zsplash talks to an OAuth-protected image search backend and provides:
//! - A session check on every visit to the home view, with a login view
//!   (OAuth providers opened in the browser, or a pasted session cookie)
//! - Paginated search with incremental loading as the grid scrolls
//! - Multi-selection of results and opening images in the browser
//! - Top searches across all users and a filterable personal search history
//! - A persisted session cookie, written from a Zellij worker thread

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, auth gate, search session        │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Worker Layer  │
//! │ (ui/)         │   │ (api/)        │   │ (worker/)     │
//! │ - Rendering   │   │ - Requests    │   │ - Session I/O │
//! │ - Theming     │   │ - Cookie jar  │   │ - IPC bridge  │
//! │ - Components  │   │ - 401 refresh │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                 │
//!                                         ┌───────────────┐
//!                                         │ Storage Layer │
//!                                         │ (storage/)    │
//!                                         └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Error types, images, users, history (domain/)    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/zsplash.wasm" {
//!         api_url "https://image-serach-app-backend.vercel.app/api"
//!         browser_command "xdg-open"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`): parse configuration, initialize tracing,
//!    create `AppState`, request permissions, subscribe to events.
//! 2. **Permissions granted**: the worker is asked for the stored session.
//! 3. **Session loaded**: the cookie (if any) replaces the configured seed
//!    and the home view mounts, probing `GET /auth/user`.
//! 4. **Probe settles**: home data loads, or the user lands on the login view.
//!
//! # Example
//!
//! ```rust
//! use zsplash::{Config, initialize, handle_event, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::CloseFocus)?;
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), zsplash::ZsplashError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, Focus, Route};
pub use domain::{Result, ZsplashError};
pub use ui::Theme;

use api::{ApiClient, CookieJar};
use std::collections::BTreeMap;

/// Backend used when `api_url` is not configured.
pub const DEFAULT_API_URL: &str = "https://image-serach-app-backend.vercel.app/api";

/// Command used to open URLs when `browser_command` is not configured.
pub const DEFAULT_BROWSER_COMMAND: &str = "xdg-open";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/zsplash.wasm" {
///     api_url "http://localhost:5000/api"
///     session_cookie "connect.sid=s%3Aabc"
///     browser_command "open"
///     theme "catppuccin-latte"
///     theme_file "~/.config/zsplash/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend API. A trailing `/` is ignored.
    pub api_url: String,

    /// `Cookie` header value used when no session has been persisted yet.
    pub session_cookie: Option<String>,

    /// Program run with a URL as its only argument to open it.
    pub browser_command: String,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme_name`.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_cookie: None,
            browser_command: DEFAULT_BROWSER_COMMAND.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Blank values count as unset. `theme_file` has `~` expanded to the
    /// sandbox's `/host`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zsplash::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "http://localhost:5000/api".to_string());
    /// map.insert("browser_command".to_string(), "open".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_url, "http://localhost:5000/api");
    /// assert_eq!(config.browser_command, "open");
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        Self {
            api_url: get("api_url").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_cookie: get("session_cookie"),
            browser_command: get("browser_command").unwrap_or_else(|| DEFAULT_BROWSER_COMMAND.to_string()),
            theme_name: get("theme"),
            theme_file: get("theme_file").map(|path| infrastructure::expand_tilde(&path)),
            trace_level: get("trace_level"),
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Creates a new `AppState` with:
/// - Loaded theme (from file, name, or default)
/// - An API client for `api_url`, seeded with `session_cookie`
/// - The home route in its session check; no request is issued until the
///   stored session has been read
///
/// # Example
///
/// ```rust
/// use zsplash::{Config, initialize, Route};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.route, Route::Home);
/// assert!(!state.booted);
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api_url = %config.api_url, "initializing zsplash plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let jar = config
        .session_cookie
        .as_deref()
        .map_or_else(CookieJar::new, CookieJar::from_header);

    AppState::new(ApiClient::new(&config.api_url, jar), theme, config.browser_command.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_options_use_defaults() {
        let mut map = BTreeMap::new();
        map.insert("api_url".to_string(), "  ".to_string());

        let config = Config::from_zellij(&map);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn theme_file_is_expanded_and_cookie_seeds_the_jar() {
        let mut map = BTreeMap::new();
        map.insert("theme_file".to_string(), "~/theme.toml".to_string());
        map.insert("session_cookie".to_string(), "connect.sid=abc".to_string());

        let config = Config::from_zellij(&map);
        assert_eq!(config.theme_file.as_deref(), Some("/host/theme.toml"));

        let state = initialize(&Config {
            theme_file: None,
            ..config
        });
        assert_eq!(state.client.jar().get("connect.sid"), Some("abc"));
    }
}
