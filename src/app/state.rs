//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for the plugin: the current
//! route and its mount id, the auth gate, the search session, cached home data
//! (top searches, history), focus and cursors, the API client, and the last
//! known viewport size.
//!
//! # Mounts
//!
//! Every navigation bumps `mount`. Requests are tagged with the mount that
//! issued them and the handler drops responses for any other mount, so a slow
//! response can never leak into a view that has since been replaced.
//!
//! # Scroll proximity
//!
//! The grid shows one image per row in a window centred on the cursor. The
//! end-of-list sentinel counts as visible once the window reaches within
//! [`PREFETCH_ROWS`] of the last image, which is what drives `load_more`.
//!
//! # Example
//!
//! ```rust
//! use zsplash::api::{ApiClient, CookieJar};
//! use zsplash::app::AppState;
//! use zsplash::ui::Theme;
//!
//! let client = ApiClient::new("https://example.com/api", CookieJar::new());
//! let state = AppState::new(client, Theme::default(), "xdg-open".to_string());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! ```

use super::auth::{AuthGate, LoginForm, PROVIDERS};
use super::modes::{Focus, Route};
use super::search::SearchSession;
use super::Action;
use crate::api::{ApiClient, ApiRequest, RequestTag};
use crate::domain::error::Result;
use crate::domain::{HistoryEntry, Image, TopSearch};
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BannerInfo, BannerItem, EmptyState, FooterInfo, GridItem, HeaderInfo, HistoryItem, HomeView,
    LoginView, ProviderItem, Screen, SearchBarInfo, SidebarView, SummaryInfo, UIViewModel,
};
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Rows used by everything on the home screen except the grid: header,
/// border, banner, search bar (3), summary, status, notice, border, footer.
pub const HOME_CHROME_ROWS: usize = 11;

/// Rows of look-ahead before the end of the grid that trigger a page fetch.
pub const PREFETCH_ROWS: usize = 3;

/// Width of the history sidebar, including its right border.
pub const SIDEBAR_WIDTH: usize = 32;

/// Rows of the sidebar not used by history entries: the header and border
/// above it, its title, filter and total lines, and notice, border and footer
/// below it.
const SIDEBAR_CHROME_ROWS: usize = 8;

/// A history entry that passes the sidebar filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMatch<'a> {
    pub entry: &'a HistoryEntry,
    /// Matched character ranges, empty without a filter.
    pub ranges: Vec<(usize, usize)>,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current top-level view.
    pub route: Route,

    /// Id of the current navigation. Responses tagged with another id are stale.
    pub mount: u64,

    /// Session check for the current home mount.
    pub gate: AuthGate,

    /// Login view inputs.
    pub login: LoginForm,

    /// Search, pagination and selection.
    pub search: SearchSession,

    /// Global top searches, loaded once the gate opens.
    pub top_searches: Vec<TopSearch>,

    /// Highlighted banner chip.
    pub top_cursor: usize,

    /// Search history of the signed-in user, newest first.
    pub history: Vec<HistoryEntry>,

    /// Sidebar filter text.
    pub history_filter: String,

    /// Highlighted row within the filtered history.
    pub history_cursor: usize,

    pub sidebar_open: bool,

    /// Element receiving keyboard input.
    pub focus: Focus,

    /// Grid cursor, an index into the accumulated images.
    pub cursor: usize,

    /// Non-blocking message, e.g. a failed logout.
    pub notice: Option<String>,

    /// Backend adapter holding the session cookies.
    pub client: ApiClient,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Command used to open URLs.
    pub browser_command: String,

    /// Last rendered pane height; zero until the first render.
    pub viewport_rows: usize,

    /// Last rendered pane width.
    pub viewport_cols: usize,

    /// Whether the stored session has been loaded and the first mount issued.
    pub booted: bool,
}

impl AppState {
    /// Creates the initial state, showing the home route in `Checking`.
    ///
    /// No request is issued until [`navigate`](Self::navigate) runs, which
    /// happens once the stored session has been loaded.
    #[must_use]
    pub fn new(client: ApiClient, theme: Theme, browser_command: String) -> Self {
        Self {
            route: Route::Home,
            mount: 0,
            gate: AuthGate::Checking,
            login: LoginForm::default(),
            search: SearchSession::new(),
            top_searches: Vec::new(),
            top_cursor: 0,
            history: Vec::new(),
            history_filter: String::new(),
            history_cursor: 0,
            sidebar_open: true,
            focus: Focus::initial(Route::Home),
            cursor: 0,
            notice: None,
            client,
            theme,
            browser_command,
            viewport_rows: 0,
            viewport_cols: 0,
            booted: false,
        }
    }

    /// Tags `request` with the current mount and search generation and
    /// prepares it for the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be encoded.
    pub fn request(&self, request: ApiRequest) -> Result<Action> {
        let tag = RequestTag::new(request, self.mount).with_generation(self.search.generation());
        Ok(Action::WebRequest(self.client.prepare(&tag)?))
    }

    /// Replaces the current view with `route`.
    ///
    /// Bumps the mount, drops all per-view data and issues the current-user
    /// probe both routes start with.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe request cannot be encoded.
    pub fn navigate(&mut self, route: Route) -> Result<Vec<Action>> {
        let _span = tracing::debug_span!("navigate", from = ?self.route, to = ?route).entered();

        self.mount += 1;
        self.route = route;
        self.gate = AuthGate::Checking;
        self.login = LoginForm::default();
        self.reset_home();
        self.focus = Focus::initial(route);

        tracing::debug!(mount = self.mount, "mounted");
        Ok(vec![self.request(ApiRequest::CurrentUser)?])
    }

    /// Drops every piece of cached home data.
    pub fn reset_home(&mut self) {
        self.search = SearchSession::new();
        self.top_searches.clear();
        self.top_cursor = 0;
        self.history.clear();
        self.history_filter.clear();
        self.history_cursor = 0;
        self.cursor = 0;
        self.notice = None;
    }

    /// Whether the home view is open for interaction.
    #[must_use]
    pub const fn home_ready(&self) -> bool {
        matches!(self.route, Route::Home) && matches!(self.gate, AuthGate::Authenticated(_))
    }

    /// Whether plain characters should be delivered as text.
    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.focus.is_typing() && (matches!(self.route, Route::Login) || self.home_ready())
    }

    /// Image under the grid cursor.
    #[must_use]
    pub fn selected_image(&self) -> Option<&Image> {
        self.search.images().get(self.cursor)
    }

    /// Moves the grid cursor down, stopping at the last image.
    pub fn move_cursor_down(&mut self) {
        let len = self.search.images().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    /// Moves the grid cursor up, stopping at the first image.
    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keeps the grid cursor inside the accumulated images.
    pub fn clamp_cursor(&mut self) {
        let len = self.search.images().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    /// Rows available to the image grid for a pane of `rows`.
    #[must_use]
    pub const fn grid_rows(rows: usize) -> usize {
        rows.saturating_sub(HOME_CHROME_ROWS)
    }

    /// Rows available to history entries for a pane of `rows`.
    #[must_use]
    pub const fn history_rows(rows: usize) -> usize {
        rows.saturating_sub(SIDEBAR_CHROME_ROWS)
    }

    /// Whether the end-of-list sentinel is within the current viewport.
    ///
    /// Always `false` before the first render, when the viewport is unknown.
    #[must_use]
    pub fn sentinel_visible(&self) -> bool {
        let available = Self::grid_rows(self.viewport_rows);
        if available == 0 {
            return false;
        }
        let len = self.search.images().len();
        let (_, end) = visible_window(self.cursor, len, available);
        end + PREFETCH_ROWS >= len
    }

    /// Issues the next page request when the sentinel is in view.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be encoded.
    pub fn maybe_load_more(&mut self) -> Result<Vec<Action>> {
        if !self.home_ready() {
            return Ok(vec![]);
        }
        let visible = self.sentinel_visible();
        match self.search.load_more(visible) {
            Some(request) => Ok(vec![self.request(request)?]),
            None => Ok(vec![]),
        }
    }

    /// History entries passing the sidebar filter, with match ranges.
    #[must_use]
    pub fn filtered_history(&self) -> Vec<HistoryMatch<'_>> {
        use fuzzy_matcher::FuzzyMatcher;

        let query = self.history_filter.trim();
        if query.is_empty() {
            return self
                .history
                .iter()
                .map(|entry| HistoryMatch { entry, ranges: vec![] })
                .collect();
        }

        let matcher = SkimMatcherV2::default();
        self.history
            .iter()
            .filter_map(|entry| {
                matcher
                    .fuzzy_indices(&entry.term, query)
                    .map(|(_score, indices)| HistoryMatch {
                        entry,
                        ranges: coalesce_ranges(&indices),
                    })
            })
            .collect()
    }

    /// Moves the history cursor by one row, wrapping at both ends.
    pub fn move_history_cursor(&mut self, down: bool) {
        let len = self.filtered_history().len();
        if len == 0 {
            self.history_cursor = 0;
            return;
        }
        self.history_cursor = if down {
            (self.history_cursor + 1) % len
        } else if self.history_cursor == 0 {
            len - 1
        } else {
            self.history_cursor - 1
        };
    }

    /// Moves the banner cursor by one chip, wrapping at both ends.
    pub fn move_top_cursor(&mut self, down: bool) {
        let len = self.top_searches.len();
        if len == 0 {
            return;
        }
        self.top_cursor = if down {
            (self.top_cursor + 1) % len
        } else {
            (self.top_cursor + len - 1) % len
        };
    }

    /// Computes a renderable UI view model for a pane of `rows` by `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        self.compute_viewmodel_at(rows, cols, Utc::now())
    }

    /// [`compute_viewmodel`](Self::compute_viewmodel) with an explicit clock
    /// for history timestamps.
    #[must_use]
    pub fn compute_viewmodel_at(&self, rows: usize, cols: usize, now: DateTime<Utc>) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", rows = rows, cols = cols).entered();

        let screen = match (self.route, &self.gate) {
            (Route::Login, _) => Screen::Login(self.compute_login()),
            (Route::Home, AuthGate::Authenticated(_)) => Screen::Home(self.compute_home(rows, cols, now)),
            (Route::Home, AuthGate::Checking | AuthGate::Unauthenticated) => Screen::Loading(EmptyState {
                message: "Loading...".to_string(),
                subtitle: "Checking your session".to_string(),
            }),
        };

        UIViewModel {
            header: self.compute_header(),
            footer: self.compute_footer(),
            notice: self
                .notice
                .clone()
                .or_else(|| self.search.error().map(ToString::to_string)),
            screen,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            title: " zsplash ".to_string(),
            user: self.gate.user().map(|user| user.display_name().to_string()),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.route, self.focus) {
            (Route::Home, _) if !self.home_ready() => "q: quit",
            (_, Focus::SearchInput) => "Enter: search  Ctrl+n/p: navigate  Tab: focus  Esc: clear",
            (_, Focus::Results) => {
                "j/k: navigate  Space: select  o: open  /: search  b: history  L: logout  q: quit"
            }
            (_, Focus::TopSearches) => "j/k: navigate  Enter: use term  Tab: focus  q: quit",
            (_, Focus::History) => "Type to filter  Ctrl+n/p: navigate  Enter: use term  Esc: clear",
            (_, Focus::Providers) => "j/k: navigate  Enter: sign in  Tab: paste cookie  q: quit",
            (_, Focus::CookieInput) => "Paste session cookie  Enter: verify  Tab: providers  Esc: clear",
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_login(&self) -> LoginView {
        let providers = PROVIDERS
            .iter()
            .enumerate()
            .map(|(idx, (_, label))| ProviderItem {
                label: (*label).to_string(),
                is_selected: idx == self.login.provider,
            })
            .collect();

        LoginView {
            providers,
            providers_focused: self.focus == Focus::Providers,
            cookie_input: "*".repeat(self.login.cookie_input.chars().count()),
            cookie_focused: self.focus == Focus::CookieInput,
            verifying: self.login.verifying,
            error: self.login.error.clone(),
        }
    }

    fn compute_home(&self, rows: usize, cols: usize, now: DateTime<Utc>) -> HomeView {
        let sidebar = self.sidebar_open.then(|| self.compute_sidebar(rows, now));
        let grid_cols = if self.sidebar_open {
            cols.saturating_sub(SIDEBAR_WIDTH)
        } else {
            cols
        };

        let images = self.search.images();
        let (start, end) = visible_window(self.cursor, images.len(), Self::grid_rows(rows));
        let grid = images[start..end]
            .iter()
            .enumerate()
            .map(|(relative_idx, image)| self.compute_grid_item(image, start + relative_idx, grid_cols))
            .collect();

        let summary = self.search.committed().map(|committed| SummaryInfo {
            text: format!(
                "You searched for \"{}\" - {} results",
                committed.term, committed.total
            ),
            selected: match self.search.selection_len() {
                0 => None,
                n => Some(format!("Selected: {n} images")),
            },
        });

        HomeView {
            banner: BannerInfo {
                items: self
                    .top_searches
                    .iter()
                    .enumerate()
                    .map(|(idx, top)| BannerItem {
                        label: format!("{} ({})", top.term, top.count),
                        is_selected: self.focus == Focus::TopSearches && idx == self.top_cursor,
                    })
                    .collect(),
                focused: self.focus == Focus::TopSearches,
            },
            search_bar: SearchBarInfo {
                query: self.search.input.clone(),
                focused: self.focus == Focus::SearchInput,
                searching: self.search.is_searching(),
            },
            summary,
            grid,
            status: self.compute_status().map(ToString::to_string),
            sidebar,
        }
    }

    fn compute_grid_item(&self, image: &Image, absolute_idx: usize, cols: usize) -> GridItem {
        const CHECKBOX_WIDTH: usize = 5;
        const CREDIT_WIDTH: usize = 28;

        let credit = if image.author.trim().is_empty() {
            String::new()
        } else {
            truncate(&format!("Photo by {}", image.author), CREDIT_WIDTH)
        };
        let title_width = cols.saturating_sub(CHECKBOX_WIDTH + CREDIT_WIDTH + 2);

        GridItem {
            title: truncate(image.title(), title_width),
            credit,
            is_checked: self.search.is_selected(&image.id),
            is_cursor: absolute_idx == self.cursor && self.focus == Focus::Results,
        }
    }

    fn compute_status(&self) -> Option<&'static str> {
        let search = &self.search;
        match search.committed() {
            None if search.is_searching() => None,
            None => Some("Start searching for beautiful images"),
            Some(_) if search.images().is_empty() => Some("No images found. Try a different search term."),
            Some(_) if search.is_loading_more() => Some("Loading more images..."),
            Some(_) if !search.has_more() => Some("No more images to load"),
            Some(_) => None,
        }
    }

    fn compute_sidebar(&self, rows: usize, now: DateTime<Utc>) -> SidebarView {
        const ENTRY_WIDTH: usize = SIDEBAR_WIDTH - 14;

        let matches = self.filtered_history();
        let (start, end) = visible_window(self.history_cursor, matches.len(), Self::history_rows(rows));

        let items = matches[start..end]
            .iter()
            .enumerate()
            .map(|(relative_idx, found)| HistoryItem {
                term: truncate(&found.entry.term, ENTRY_WIDTH),
                when: found.entry.relative_time(now),
                is_selected: self.focus == Focus::History && start + relative_idx == self.history_cursor,
                highlight_ranges: found.ranges.clone(),
            })
            .collect();

        let empty_message = if self.history.is_empty() {
            Some("No search history yet".to_string())
        } else if matches.is_empty() {
            Some("No matches found".to_string())
        } else {
            None
        };

        let total_label = match self.history.len() {
            0 => None,
            1 => Some("1 search total".to_string()),
            n => Some(format!("{n} searches total")),
        };

        SidebarView {
            filter: self.history_filter.clone(),
            focused: self.focus == Focus::History,
            items,
            empty_message,
            total_label,
        }
    }
}

/// Computes the `[start, end)` slice of a list of `len` rows to show in
/// `available` rows so that `selected` stays visible.
///
/// The window is centred on `selected` and shifted back near the end of the
/// list so it stays full whenever the list is long enough.
///
/// # Example
///
/// ```rust
/// use zsplash::app::state::visible_window;
///
/// assert_eq!(visible_window(0, 50, 10), (0, 10));
/// assert_eq!(visible_window(25, 50, 10), (20, 30));
/// assert_eq!(visible_window(49, 50, 10), (40, 50));
/// ```
#[must_use]
pub fn visible_window(selected: usize, len: usize, available: usize) -> (usize, usize) {
    if len == 0 || available == 0 {
        return (0, 0);
    }

    let mut start = selected.min(len - 1).saturating_sub(available / 2);
    let end = (start + available).min(len);

    if end - start < available && len >= available {
        start = end.saturating_sub(available);
    }

    (start, end)
}

/// Coalesces sorted match indices into `(start, end)` ranges, end exclusive.
fn coalesce_ranges(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CookieJar;
    use crate::domain::User;
    use chrono::Duration;

    fn state() -> AppState {
        AppState::new(
            ApiClient::new("https://api.test/api", CookieJar::new()),
            Theme::default(),
            "xdg-open".to_string(),
        )
    }

    fn history(terms: &[&str]) -> Vec<HistoryEntry> {
        terms
            .iter()
            .enumerate()
            .map(|(i, term)| HistoryEntry {
                id: format!("h{i}"),
                term: (*term).to_string(),
                timestamp: Some(Utc::now() - Duration::hours(2)),
            })
            .collect()
    }

    #[test]
    fn window_stays_full_and_contains_selection() {
        for len in [1, 5, 10, 37] {
            for selected in 0..len {
                let (start, end) = visible_window(selected, len, 10);
                assert!(start <= selected && selected < end);
                assert_eq!(end - start, len.min(10));
            }
        }
        assert_eq!(visible_window(0, 0, 10), (0, 0));
        assert_eq!(visible_window(3, 10, 0), (0, 0));
    }

    #[test]
    fn sentinel_needs_a_known_viewport() {
        let mut state = state();
        assert!(!state.sentinel_visible());

        state.viewport_rows = 24;
        assert!(state.sentinel_visible());
    }

    #[test]
    fn grid_cursor_clamps() {
        let mut state = state();
        state.move_cursor_up();
        state.move_cursor_down();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn history_filter_is_fuzzy_with_ranges() {
        let mut state = state();
        state.history = history(&["sunset beach", "mountain", "sunflower"]);
        state.history_filter = "sun".to_string();

        let matches = state.filtered_history();
        let terms: Vec<&str> = matches.iter().map(|m| m.entry.term.as_str()).collect();
        assert_eq!(terms, vec!["sunset beach", "sunflower"]);
        assert_eq!(matches[0].ranges, vec![(0, 3)]);
    }

    #[test]
    fn history_cursor_wraps() {
        let mut state = state();
        state.history = history(&["a", "b", "c"]);
        state.move_history_cursor(false);
        assert_eq!(state.history_cursor, 2);
        state.move_history_cursor(true);
        assert_eq!(state.history_cursor, 0);
    }

    #[test]
    fn sidebar_messages() {
        let mut state = state();
        state.gate = AuthGate::Authenticated(User {
            id: "u1".into(),
            name: "Ann".into(),
            email: None,
            avatar: None,
        });

        let Screen::Home(home) = state.compute_viewmodel(24, 100).screen else {
            panic!("expected home screen");
        };
        let sidebar = home.sidebar.unwrap();
        assert_eq!(sidebar.empty_message.as_deref(), Some("No search history yet"));
        assert_eq!(sidebar.total_label, None);
        assert_eq!(home.status.as_deref(), Some("Start searching for beautiful images"));

        state.history = history(&["cats", "dogs"]);
        state.history_filter = "zzz".into();
        let Screen::Home(home) = state.compute_viewmodel(24, 100).screen else {
            panic!("expected home screen");
        };
        let sidebar = home.sidebar.unwrap();
        assert_eq!(sidebar.empty_message.as_deref(), Some("No matches found"));
        assert_eq!(sidebar.total_label.as_deref(), Some("2 searches total"));
    }

    #[test]
    fn checking_gate_renders_loading() {
        let state = state();
        let vm = state.compute_viewmodel(24, 80);
        assert!(matches!(vm.screen, Screen::Loading(_)));
        assert_eq!(vm.footer.keybindings, "q: quit");
        assert!(!state.is_typing());
    }
}
