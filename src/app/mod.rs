//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin runtime (main.rs) and the api,
//! domain and worker layers. Nothing here talks to Zellij directly: host
//! results come in as [`Event`]s and side effects go out as [`Action`]s.
//!
//! # Architecture
//!
//! ```text
//! Keys / Web results → Events → Event Handler → State Mutations → Actions → Side Effects
//!                                   ↑                                  ↓
//!                                   └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`auth`]: Auth gate and login form
//! - [`handler`]: Event processing and response dispatch
//! - [`modes`]: Route and focus types
//! - [`search`]: Search, pagination and selection state machine
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use zsplash::api::{ApiClient, CookieJar};
//! use zsplash::app::{AppState, Event, handle_event};
//! use zsplash::ui::theme::Theme;
//!
//! let client = ApiClient::new("https://example.com/api", CookieJar::new());
//! let mut state = AppState::new(client, Theme::default(), "xdg-open".to_string());
//! let (_render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod auth;
pub mod handler;
pub mod modes;
pub mod search;
pub mod state;

pub use actions::Action;
pub use auth::{AuthGate, LoginForm};
pub use handler::{handle_event, Event};
pub use modes::{Focus, Route};
pub use search::{SearchSession, Settled};
pub use state::AppState;
