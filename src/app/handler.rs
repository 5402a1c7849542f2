//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! backend responses, and worker responses, translating them into state
//! changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` and its sub-states
//! 4. Actions are collected and returned for execution
//!
//! # Backend responses
//!
//! `HttpResponse` events go through [`ApiClient::receive`](crate::api::ApiClient::receive)
//! first, which may turn a 401 into a refresh round trip. Only finished calls
//! reach the dispatch below, and only if they belong to the current mount.
//! A final `Unauthorized` outside the session probe sends the user to the
//! login view; on the login view it is swallowed so the redirect cannot loop.
//!
//! # Example
//!
//! ```rust
//! use zsplash::api::{ApiClient, CookieJar};
//! use zsplash::app::{AppState, handler::{Event, handle_event}};
//! use zsplash::ui::theme::Theme;
//!
//! let client = ApiClient::new("https://example.com/api", CookieJar::new());
//! let mut state = AppState::new(client, Theme::default(), "xdg-open".to_string());
//! let (should_render, actions) = handle_event(&mut state, &Event::CloseFocus)?;
//! assert!(!should_render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::auth::{AuthGate, AUTH_FAILED, SESSION_EXPIRED};
use super::modes::{Focus, Route};
use super::search::Settled;
use crate::api::{ApiRequest, ApiResponse, CookieJar, Delivery, RequestTag};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{ApiError, SearchPage, User};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;

/// Events triggered by user input, host results, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor of the focused list down.
    CursorDown,
    /// Moves the cursor of the focused list up.
    CursorUp,
    /// Moves focus to the next element in `Tab` order.
    CycleFocus,
    /// Jumps to the search bar.
    FocusSearch,
    /// `Enter` on the focused element.
    Submit,
    /// Clears the focused input, leaves it, or dismisses a message.
    Escape,
    /// Appends a character to the focused input.
    Char(char),
    /// Removes the last character from the focused input.
    Backspace,
    /// Selects or deselects the image under the cursor.
    ToggleSelection,
    /// Opens the image under the cursor in the browser.
    OpenImage,
    ToggleSidebar,
    Logout,
    /// Hides the plugin pane.
    CloseFocus,

    /// The pane was rendered at a new size.
    Resized { rows: usize, cols: usize },

    /// Result of the permission request made at load.
    PermissionsResult { granted: bool },

    /// Result of a `web_request` issued by this plugin.
    HttpResponse {
        status: u16,
        headers: BTreeMap<String, String>,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },

    /// The browser command exited unsuccessfully.
    BrowserFailed { error: String },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Short name for spans; bodies and headers stay out of the trace.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CursorDown => "cursor_down",
            Self::CursorUp => "cursor_up",
            Self::CycleFocus => "cycle_focus",
            Self::FocusSearch => "focus_search",
            Self::Submit => "submit",
            Self::Escape => "escape",
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::ToggleSelection => "toggle_selection",
            Self::OpenImage => "open_image",
            Self::ToggleSidebar => "toggle_sidebar",
            Self::Logout => "logout",
            Self::CloseFocus => "close_focus",
            Self::Resized { .. } => "resized",
            Self::PermissionsResult { .. } => "permissions_result",
            Self::HttpResponse { .. } => "http_response",
            Self::BrowserFailed { .. } => "browser_failed",
            Self::WorkerResponse(_) => "worker_response",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// Whether the pane needs a re-render, and the actions to execute in order.
///
/// # Errors
///
/// Returns an error if a request cannot be encoded or a response carries no
/// correlation tag from this plugin.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Resized { rows, cols } => {
            if (state.viewport_rows, state.viewport_cols) == (*rows, *cols) {
                return Ok((false, vec![]));
            }
            tracing::debug!(rows = rows, cols = cols, "viewport resized");
            state.viewport_rows = *rows;
            state.viewport_cols = *cols;
            state.clamp_cursor();
            Ok((false, state.maybe_load_more()?))
        }
        Event::PermissionsResult { granted } => {
            if *granted {
                tracing::debug!("permissions granted, loading stored session");
                Ok((false, vec![Action::PostToWorker(WorkerMessage::load_session())]))
            } else {
                tracing::warn!("permissions denied");
                state.notice = Some("Web access permission is required to reach the backend".to_string());
                Ok((true, vec![]))
            }
        }
        Event::HttpResponse {
            status,
            headers,
            body,
            context,
        } => handle_http_response(state, *status, headers, body, context),
        Event::BrowserFailed { error } => {
            tracing::warn!(error = %error, "browser command failed");
            state.notice = Some(format!("Could not open browser: {error}"));
            Ok((true, vec![]))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
        key => {
            if matches!(state.route, Route::Home) && !state.home_ready() {
                tracing::debug!("session check pending, ignoring input");
                return Ok((false, vec![]));
            }
            handle_key(state, key)
        }
    }
}

#[allow(clippy::too_many_lines)]
fn handle_key(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::CursorDown | Event::CursorUp => {
            let down = matches!(event, Event::CursorDown);
            match state.focus {
                Focus::SearchInput | Focus::Results => {
                    if down {
                        state.move_cursor_down();
                    } else {
                        state.move_cursor_up();
                    }
                    Ok((true, state.maybe_load_more()?))
                }
                Focus::TopSearches => {
                    state.move_top_cursor(down);
                    Ok((true, vec![]))
                }
                Focus::History => {
                    state.move_history_cursor(down);
                    Ok((true, vec![]))
                }
                Focus::Providers | Focus::CookieInput => {
                    if down {
                        state.login.next_provider();
                    } else {
                        state.login.previous_provider();
                    }
                    Ok((true, vec![]))
                }
            }
        }
        Event::CycleFocus => {
            state.focus = state.focus.cycle(state.route, state.sidebar_open);
            tracing::debug!(focus = ?state.focus, "focus cycled");
            Ok((true, vec![]))
        }
        Event::FocusSearch => {
            if matches!(state.route, Route::Home) {
                state.focus = Focus::SearchInput;
            }
            Ok((true, vec![]))
        }
        Event::Submit => handle_submit(state),
        Event::Escape => {
            let Some(text) = focused_text(state) else {
                state.notice = None;
                state.search.dismiss_error();
                state.login.error = None;
                return Ok((true, vec![]));
            };

            if text.is_empty() {
                state.focus = match state.focus {
                    Focus::CookieInput => Focus::Providers,
                    _ => Focus::Results,
                };
            } else {
                text.clear();
                state.history_cursor = 0;
            }
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            let Some(text) = focused_text(state) else {
                return Ok((false, vec![]));
            };
            text.push(*c);
            state.history_cursor = 0;
            Ok((true, vec![]))
        }
        Event::Backspace => {
            let Some(text) = focused_text(state) else {
                return Ok((false, vec![]));
            };
            text.pop();
            state.history_cursor = 0;
            Ok((true, vec![]))
        }
        Event::ToggleSelection => {
            let Some(id) = state.selected_image().map(|image| image.id.clone()) else {
                return Ok((false, vec![]));
            };
            state.search.toggle_selection(&id);
            Ok((true, vec![]))
        }
        Event::OpenImage => match state.selected_image() {
            Some(image) if !image.thumb.is_empty() => {
                tracing::debug!(image_id = %image.id, "opening image");
                Ok((false, vec![Action::OpenUrl(image.thumb.clone())]))
            }
            _ => Ok((false, vec![])),
        },
        Event::ToggleSidebar => {
            if !matches!(state.route, Route::Home) {
                return Ok((false, vec![]));
            }
            state.sidebar_open = !state.sidebar_open;
            if !state.sidebar_open && state.focus == Focus::History {
                state.focus = Focus::SearchInput;
            }
            Ok((true, state.maybe_load_more()?))
        }
        Event::Logout => {
            if !state.home_ready() {
                return Ok((false, vec![]));
            }
            tracing::info!("logging out");
            Ok((false, vec![state.request(ApiRequest::Logout)?]))
        }
        _ => Ok((false, vec![])),
    }
}

fn handle_submit(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.focus {
        Focus::SearchInput => {
            let term = state.search.input.clone();
            match state.search.submit_search(&term) {
                Some(request) => Ok((true, vec![state.request(request)?])),
                None => Ok((false, vec![])),
            }
        }
        Focus::Results => handle_key(state, &Event::ToggleSelection),
        Focus::TopSearches => {
            let Some(term) = state.top_searches.get(state.top_cursor).map(|top| top.term.clone()) else {
                return Ok((false, vec![]));
            };
            state.search.top_search_click(&term);
            state.focus = Focus::SearchInput;
            Ok((true, vec![]))
        }
        Focus::History => {
            let Some(term) = state
                .filtered_history()
                .get(state.history_cursor)
                .map(|found| found.entry.term.clone())
            else {
                return Ok((false, vec![]));
            };
            state.search.history_click(&term);
            state.sidebar_open = false;
            state.focus = Focus::SearchInput;
            Ok((true, state.maybe_load_more()?))
        }
        Focus::Providers => {
            let url = state.client.login_url(state.login.provider_slug());
            tracing::info!(provider = state.login.provider_slug(), "starting browser sign in");
            state.login.error = None;
            state.notice = Some("Finish signing in, then paste the session cookie below".to_string());
            state.focus = Focus::CookieInput;
            Ok((true, vec![Action::OpenUrl(url)]))
        }
        Focus::CookieInput => {
            if state.login.verifying {
                return Ok((false, vec![]));
            }

            let jar = CookieJar::from_header(state.login.cookie_input.trim());
            if jar.is_empty() {
                state.login.error = Some(AUTH_FAILED.to_string());
                return Ok((true, vec![]));
            }

            tracing::info!(cookies = jar.len(), "verifying pasted session");
            let header = jar.header_value();
            state.client.replace_jar(jar);
            state.login.cookie_input.clear();
            state.login.error = None;
            state.login.verifying = true;
            state.notice = None;
            // supersede the probe issued when the login view mounted
            state.mount += 1;

            Ok((
                true,
                vec![
                    Action::PostToWorker(WorkerMessage::save_session(header)),
                    state.request(ApiRequest::CurrentUser)?,
                ],
            ))
        }
    }
}

/// Text buffer behind the focused input, if the focus is a typing one.
fn focused_text(state: &mut AppState) -> Option<&mut String> {
    match state.focus {
        Focus::SearchInput => Some(&mut state.search.input),
        Focus::History => Some(&mut state.history_filter),
        Focus::CookieInput => Some(&mut state.login.cookie_input),
        Focus::Results | Focus::TopSearches | Focus::Providers => None,
    }
}

fn handle_http_response(
    state: &mut AppState,
    status: u16,
    headers: &BTreeMap<String, String>,
    body: &[u8],
    context: &BTreeMap<String, String>,
) -> Result<(bool, Vec<Action>)> {
    let received = state.client.receive(status, headers, body, context)?;

    let mut actions = vec![];
    if received.cookies_changed {
        actions.push(persist_cookies(state));
    }

    match received.delivery {
        Delivery::Resend(request) => {
            actions.push(Action::WebRequest(request));
            Ok((false, actions))
        }
        Delivery::Done { tag, result } => {
            if tag.mount != state.mount {
                tracing::debug!(
                    request = tag.request.label(),
                    mount = tag.mount,
                    current = state.mount,
                    "discarding response for previous mount"
                );
                return Ok((false, actions));
            }

            let (should_render, more) = dispatch_result(state, &tag, result)?;
            actions.extend(more);
            Ok((should_render, actions))
        }
    }
}

fn persist_cookies(state: &AppState) -> Action {
    let jar = state.client.jar();
    if jar.is_empty() {
        Action::PostToWorker(WorkerMessage::clear_session())
    } else {
        Action::PostToWorker(WorkerMessage::save_session(jar.header_value()))
    }
}

fn dispatch_result(
    state: &mut AppState,
    tag: &RequestTag,
    result: std::result::Result<ApiResponse, ApiError>,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("dispatch_result", request = tag.request.label()).entered();

    match (&tag.request, result) {
        (ApiRequest::CurrentUser, result) => {
            let user = result.and_then(|response| match response {
                ApiResponse::CurrentUser(user) => Ok(user),
                other => Err(unexpected(&other)),
            });
            handle_current_user(state, user)
        }
        (_, Err(ApiError::Unauthorized)) => handle_unauthorized(state),
        (ApiRequest::Search { .. }, result) => {
            let page = result.and_then(|response| match response {
                ApiResponse::Search(page) => Ok(page),
                other => Err(unexpected(&other)),
            });
            handle_search_result(state, tag.generation, page)
        }
        (_, Ok(ApiResponse::TopSearches(top_searches))) => {
            tracing::debug!(count = top_searches.len(), "top searches loaded");
            state.top_searches = top_searches;
            state.top_cursor = 0;
            Ok((true, vec![]))
        }
        (_, Ok(ApiResponse::History(history))) => {
            tracing::debug!(count = history.len(), "history loaded");
            state.history = history;
            state.history_cursor = 0;
            Ok((true, vec![]))
        }
        (_, Ok(ApiResponse::LoggedOut)) => {
            tracing::info!("logged out");
            state.client.clear_session();
            let mut actions = vec![Action::PostToWorker(WorkerMessage::clear_session())];
            actions.extend(state.navigate(Route::Login)?);
            Ok((true, actions))
        }
        (ApiRequest::Logout, Err(e)) => {
            tracing::warn!(error = %e, "logout failed");
            state.notice = Some("Logout failed".to_string());
            Ok((true, vec![]))
        }
        (request, Err(e)) => {
            tracing::warn!(request = request.label(), error = %e, "request failed");
            Ok((false, vec![]))
        }
        (request, Ok(response)) => {
            tracing::debug!(request = request.label(), response = ?response, "ignoring response");
            Ok((false, vec![]))
        }
    }
}

fn unexpected(response: &ApiResponse) -> ApiError {
    ApiError::failed(None, format!("unexpected response: {response:?}"))
}

fn handle_current_user(
    state: &mut AppState,
    result: std::result::Result<Option<User>, ApiError>,
) -> Result<(bool, Vec<Action>)> {
    match state.route {
        Route::Home => {
            if state.gate != AuthGate::Checking {
                return Ok((false, vec![]));
            }

            let authenticated = matches!(state.gate.resolve(result), AuthGate::Authenticated(_));
            if authenticated {
                tracing::info!(
                    user = state.gate.user().map_or("", |user| user.display_name()),
                    "session verified"
                );
                let actions = vec![
                    state.request(ApiRequest::TopSearches)?,
                    state.request(ApiRequest::History)?,
                ];
                Ok((true, actions))
            } else {
                tracing::info!("no session, redirecting to login");
                Ok((true, state.navigate(Route::Login)?))
            }
        }
        Route::Login => match result {
            Ok(Some(user)) => {
                tracing::info!(user = user.display_name(), "signed in");
                Ok((true, state.navigate(Route::Home)?))
            }
            _ if state.login.verifying => {
                tracing::info!("pasted session was not accepted");
                state.login.verifying = false;
                state.login.error = Some(AUTH_FAILED.to_string());
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },
    }
}

fn handle_unauthorized(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    if matches!(state.route, Route::Login) {
        tracing::debug!("unauthorized on login view, not redirecting");
        return Ok((false, vec![]));
    }

    tracing::info!("session expired, redirecting to login");
    let actions = state.navigate(Route::Login)?;
    state.login.error = Some(SESSION_EXPIRED.to_string());
    Ok((true, actions))
}

fn handle_search_result(
    state: &mut AppState,
    generation: u64,
    result: std::result::Result<SearchPage, ApiError>,
) -> Result<(bool, Vec<Action>)> {
    match state.search.settle(generation, result) {
        Settled::Searched => {
            state.cursor = 0;
            state.focus = Focus::Results;
            let mut actions = vec![state.request(ApiRequest::History)?];
            actions.extend(state.maybe_load_more()?);
            Ok((true, actions))
        }
        Settled::LoadedMore { .. } => Ok((true, state.maybe_load_more()?)),
        Settled::Failed(_) => Ok((true, vec![])),
        Settled::Stale => Ok((false, vec![])),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::SessionLoaded { cookie } => {
            if state.booted {
                return Ok((false, vec![]));
            }
            state.booted = true;

            if let Some(cookie) = cookie.as_deref().filter(|c| !c.trim().is_empty()) {
                tracing::debug!("restoring stored session");
                state.client.replace_jar(CookieJar::from_header(cookie));
            }
            Ok((true, state.navigate(Route::Home)?))
        }
        WorkerResponse::SessionSaved | WorkerResponse::SessionCleared => Ok((false, vec![])),
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker error");
            if state.booted {
                return Ok((false, vec![]));
            }
            state.booted = true;
            Ok((true, state.navigate(Route::Home)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, HttpRequest};
    use crate::ui::theme::Theme;

    const USER: &str = r#"{"user": {"_id": "u1", "name": "Ann", "email": "ann@example.com"}}"#;

    fn state() -> AppState {
        AppState::new(
            ApiClient::new("https://api.test/api", CookieJar::new()),
            Theme::default(),
            "xdg-open".to_string(),
        )
    }

    fn requests(actions: &[Action]) -> Vec<HttpRequest> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::WebRequest(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &str) -> (bool, Vec<Action>) {
        handle_event(
            state,
            &Event::HttpResponse {
                status,
                headers: BTreeMap::new(),
                body: body.as_bytes().to_vec(),
                context: request.context.clone(),
            },
        )
        .unwrap()
    }

    fn boot(state: &mut AppState) -> HttpRequest {
        let (_, actions) = handle_event(
            state,
            &Event::WorkerResponse(WorkerResponse::SessionLoaded {
                cookie: Some("sid=abc".to_string()),
            }),
        )
        .unwrap();
        let mut sent = requests(&actions);
        assert_eq!(sent.len(), 1);
        sent.remove(0)
    }

    fn signed_in() -> AppState {
        let mut state = state();
        let probe = boot(&mut state);
        respond(&mut state, &probe, 200, USER);
        assert!(state.home_ready());
        state
    }

    #[test]
    fn boot_probes_with_stored_cookie() {
        let mut state = state();
        let probe = boot(&mut state);

        assert!(probe.url.ends_with("/auth/user"));
        assert_eq!(probe.headers.get("Cookie").map(String::as_str), Some("sid=abc"));
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.gate, AuthGate::Checking);
    }

    #[test]
    fn verified_session_loads_home_data() {
        let mut state = state();
        let probe = boot(&mut state);
        let (should_render, actions) = respond(&mut state, &probe, 200, USER);

        assert!(should_render);
        let urls: Vec<String> = requests(&actions).into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://api.test/api/top-searches".to_string(),
                "https://api.test/api/history".to_string()
            ]
        );
    }

    #[test]
    fn missing_user_redirects_to_login() {
        let mut state = state();
        let probe = boot(&mut state);
        respond(&mut state, &probe, 200, r#"{"user": null}"#);

        assert_eq!(state.route, Route::Login);
        assert_eq!(state.focus, Focus::Providers);
        assert_eq!(state.login.error, None);
    }

    #[test]
    fn user_without_id_opens_home() {
        let mut state = state();
        let probe = boot(&mut state);
        respond(&mut state, &probe, 200, r#"{"user": {"name": "Ann"}}"#);

        assert_eq!(state.route, Route::Home);
        assert!(state.home_ready());
    }

    #[test]
    fn expired_session_redirects_once_to_login() {
        let mut state = signed_in();
        state.search.input = "cats".to_string();
        state.focus = Focus::SearchInput;

        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        let search = requests(&actions).remove(0);

        let (_, actions) = respond(&mut state, &search, 401, "");
        let refresh = requests(&actions).remove(0);
        assert!(refresh.url.ends_with("/auth/refresh"));
        assert_eq!(state.route, Route::Home);

        let (_, actions) = respond(&mut state, &refresh, 401, "");
        assert_eq!(state.route, Route::Login);
        assert_eq!(state.login.error.as_deref(), Some(SESSION_EXPIRED));

        let probe = requests(&actions).remove(0);
        assert!(probe.url.ends_with("/auth/user"));

        let (_, actions) = respond(&mut state, &probe, 401, "");
        let refresh = requests(&actions).remove(0);
        let (_, actions) = respond(&mut state, &refresh, 401, "");
        assert!(requests(&actions).is_empty());
        assert_eq!(state.route, Route::Login);
    }

    #[test]
    fn refresh_then_retry_succeeds() {
        let mut state = signed_in();
        state.search.input = "cats".to_string();
        state.focus = Focus::SearchInput;

        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        let search = requests(&actions).remove(0);
        let (_, actions) = respond(&mut state, &search, 401, "");
        let refresh = requests(&actions).remove(0);
        let (_, actions) = respond(&mut state, &refresh, 200, "{}");
        let retry = requests(&actions).remove(0);
        assert!(retry.url.ends_with("/search"));

        let page = r#"{"term":"cats","images":[{"id":"a","thumb":"t","alt":"a cat","author":"Ann"}],"total":1,"currentPage":1,"totalPages":1}"#;
        respond(&mut state, &retry, 200, page);
        assert_eq!(state.search.images().len(), 1);
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn responses_from_previous_mount_are_dropped() {
        let mut state = signed_in();
        let stale = state.client.prepare(&RequestTag::new(ApiRequest::TopSearches, state.mount - 1)).unwrap();

        let (should_render, _) = respond(&mut state, &stale, 200, r#"[{"term":"cats","count":3}]"#);
        assert!(!should_render);
        assert!(state.top_searches.is_empty());
    }

    #[test]
    fn logout_failure_keeps_user_on_home() {
        let mut state = signed_in();
        let (_, actions) = handle_event(&mut state, &Event::Logout).unwrap();
        let logout = requests(&actions).remove(0);

        respond(&mut state, &logout, 500, r#"{"message":"boom"}"#);
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.notice.as_deref(), Some("Logout failed"));
    }

    #[test]
    fn logout_clears_session_and_shows_login() {
        let mut state = signed_in();
        let (_, actions) = handle_event(&mut state, &Event::Logout).unwrap();
        let logout = requests(&actions).remove(0);

        let (_, actions) = respond(&mut state, &logout, 200, "");
        assert_eq!(state.route, Route::Login);
        assert!(state.client.jar().is_empty());
        assert!(actions
            .iter()
            .any(|action| matches!(action, Action::PostToWorker(WorkerMessage::ClearSession { .. }))));
    }

    #[test]
    fn pasted_cookie_is_verified() {
        let mut state = state();
        let probe = boot(&mut state);
        respond(&mut state, &probe, 200, "{}");
        assert_eq!(state.route, Route::Login);

        state.focus = Focus::CookieInput;
        for c in "sid=new".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(state.login.verifying);
        let verify = requests(&actions).remove(0);
        assert_eq!(verify.headers.get("Cookie").map(String::as_str), Some("sid=new"));

        respond(&mut state, &verify, 200, r#"{"user": null}"#);
        assert!(!state.login.verifying);
        assert_eq!(state.login.error.as_deref(), Some(AUTH_FAILED));
    }

    #[test]
    fn input_is_ignored_while_checking() {
        let mut state = state();
        boot(&mut state);

        let (should_render, _) = handle_event(&mut state, &Event::Char('q')).unwrap();
        assert!(!should_render);
        assert!(state.search.input.is_empty());
    }

    #[test]
    fn escape_clears_then_leaves_input() {
        let mut state = signed_in();
        state.search.input = "ca".to_string();

        handle_event(&mut state, &Event::Escape).unwrap();
        assert!(state.search.input.is_empty());
        assert_eq!(state.focus, Focus::SearchInput);

        handle_event(&mut state, &Event::Escape).unwrap();
        assert_eq!(state.focus, Focus::Results);
    }
}
