//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the Zsplash library and
//! the Zellij plugin system. It translates host events into library events,
//! runs the returned actions through host calls, and registers the worker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │        web_request
//! │  │  State (plugin)  │───┼──────────────────────▶ backend API
//! │  └──────────────────┘   │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  ZsplashWorker   │   │  ← Session file reads/writes
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Key, `CustomMessage`, `WebRequestResult`, `RunCommandResult`
//! 3. **Permissions granted**: Ask the worker for the stored session
//! 4. **Update**: Handle events, delegate to the library layer
//! 5. **Render**: Report size changes, then call the library renderer
//!
//! # Keybindings
//!
//! Global:
//! - `Ctrl+n` / `Down`: Move down
//! - `Ctrl+p` / `Up`: Move up
//! - `Tab`: Next element
//! - `Enter`: Submit the focused element
//! - `Esc`: Clear input, leave input, or dismiss a message
//!
//! When no input has focus:
//! - `j`/`k`: Move down/up
//! - `Space`: Toggle selection
//! - `o`: Open the image in the browser
//! - `/`: Focus the search bar
//! - `b`: Toggle the history sidebar
//! - `L` (shift): Log out
//! - `q`: Close plugin

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use zsplash::api::{HttpMethod, HttpRequest};
use zsplash::worker::{WorkerMessage, WorkerResponse, ZsplashWorker};
use zsplash::{handle_event, Action, Config, Event};

register_plugin!(State);
register_worker!(ZsplashWorker, zsplash_worker, ZSPLASH_WORKER);

/// Context key marking `run_command` calls that open a URL.
const OPEN_URL_CONTEXT: &str = "zsplash_open_url";

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication and the last rendered size.
struct State {
    /// Core application state from library layer.
    app: zsplash::AppState,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,

    last_size: Option<(usize, usize)>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: zsplash::initialize(&Config::default()),
            worker_name: "zsplash".to_string(),
            last_size: None,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// - `WebAccess`: Reach the backend API
    /// - `RunCommands`: Open URLs with the browser command
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        zsplash::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(api_url = %config.api_url, browser = %config.browser_command, "parsed configuration");
        self.app = zsplash::initialize(&config);

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess, PermissionType::RunCommands]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::RunCommandResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, headers, body, context) => {
                tracing::debug!(status = status, body_len = body.len(), "web request result");
                Event::HttpResponse {
                    status,
                    headers,
                    body,
                    context,
                }
            }
            zellij_tile::prelude::Event::RunCommandResult(exit_code, _stdout, stderr, context) => {
                match Self::map_command_result_event(exit_code, &stderr, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Event::PermissionsResult {
                granted: matches!(status, PermissionStatus::Granted),
            },
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Renders the plugin UI.
    ///
    /// A changed size goes through the event handler first so the grid window
    /// and the scroll prefetch see the new viewport.
    fn render(&mut self, rows: usize, cols: usize) {
        if self.last_size != Some((rows, cols)) {
            self.last_size = Some((rows, cols));
            match handle_event(&mut self.app, &Event::Resized { rows, cols }) {
                Ok((_, actions)) => {
                    for a in actions {
                        self.execute_action(&a);
                    }
                }
                Err(e) => tracing::debug!(error = %e, "error handling resize"),
            }
        }
        zsplash::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    ///
    /// While an input has focus, letters are text; otherwise they are
    /// commands.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::CursorDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::CursorUp);
        }

        let typing = self.app.is_typing();
        Some(match key.bare_key {
            BareKey::Down => Event::CursorDown,
            BareKey::Up => Event::CursorUp,
            BareKey::Tab => Event::CycleFocus,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if typing => Event::Char(c),
            BareKey::Char('j') => Event::CursorDown,
            BareKey::Char('k') => Event::CursorUp,
            BareKey::Char(' ') => Event::ToggleSelection,
            BareKey::Char('o') => Event::OpenImage,
            BareKey::Char('/') => Event::FocusSearch,
            BareKey::Char('b') => Event::ToggleSidebar,
            BareKey::Char('L') => Event::Logout,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => {
                    tracing::debug!(response = ?response, "worker response received");
                    Some(Event::WorkerResponse(response))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Maps the result of a browser command; other commands are ignored.
    fn map_command_result_event(
        exit_code: Option<i32>,
        stderr: &[u8],
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        if !context.contains_key(OPEN_URL_CONTEXT) {
            return None;
        }
        tracing::debug!(exit_code = ?exit_code, "browser command result");

        if exit_code == Some(0) {
            return None;
        }
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        let error = if stderr.is_empty() {
            format!("exit code {exit_code:?}")
        } else {
            stderr
        };
        Some(Event::BrowserFailed { error })
    }

    /// Posts a message to the worker thread.
    ///
    /// Logs serialization errors but does not propagate them.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    fn send_web_request(request: &HttpRequest) {
        let verb = match request.method {
            HttpMethod::Get => HttpVerb::Get,
            HttpMethod::Post => HttpVerb::Post,
        };
        web_request(
            &request.url,
            verb,
            request.headers.clone(),
            request.body.clone(),
            request.context.clone(),
        );
    }

    /// Executes an action returned from event handling.
    ///
    /// Translates library actions to Zellij API calls.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(ref message) => {
                tracing::debug!(message = message.name(), "posting message to worker");
                self.post_worker_message(message);
            }
            Action::WebRequest(ref request) => {
                tracing::debug!(url = %request.url, method = ?request.method, "sending web request");
                Self::send_web_request(request);
            }
            Action::OpenUrl(ref url) => {
                tracing::debug!(url = %url, browser = %self.app.browser_command, "opening url");
                let mut context = BTreeMap::new();
                context.insert(OPEN_URL_CONTEXT.to_string(), url.clone());
                run_command(&[self.app.browser_command.as_str(), url.as_str()], context);
            }
        }
    }
}
