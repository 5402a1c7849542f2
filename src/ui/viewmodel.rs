//! View model types representing renderable UI state.
//!
//! View models are computed from `AppState` by `compute_viewmodel` and hold
//! display-ready data only: truncated strings, relative timestamps, highlight
//! ranges and cursor flags. Renderers never look at application state.
//!
//! # Example
//!
//! ```rust
//! use zsplash::ui::viewmodel::{EmptyState, FooterInfo, HeaderInfo, Screen, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "zsplash".to_string(), user: None },
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//!     notice: None,
//!     screen: Screen::Loading(EmptyState {
//!         message: "Loading...".to_string(),
//!         subtitle: String::new(),
//!     }),
//! };
//! ```

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Title bar.
    pub header: HeaderInfo,

    /// Keybinding hints for the current focus.
    pub footer: FooterInfo,

    /// Non-blocking message shown above the footer.
    pub notice: Option<String>,

    /// Route-specific body.
    pub screen: Screen,
}

/// Body of the plugin pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the session check.
    Loading(EmptyState),
    Login(LoginView),
    Home(HomeView),
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title text to display in the header.
    pub title: String,

    /// Signed-in user label, right-aligned.
    pub user: Option<String>,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text (e.g., "Tab: focus  /: search  q: quit").
    pub keybindings: String,
}

/// Centered two-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "Loading...").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Pending input text.
    pub query: String,
    pub focused: bool,
    /// A search is pending; the bar shows "Searching...".
    pub searching: bool,
}

/// One chip in the top searches banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerItem {
    /// `term (count)`.
    pub label: String,
    pub is_selected: bool,
}

/// Top searches banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerInfo {
    pub items: Vec<BannerItem>,
    pub focused: bool,
}

/// Results summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryInfo {
    /// `You searched for "term" - N results`.
    pub text: String,
    /// `Selected: N images`, present only with a non-empty selection.
    pub selected: Option<String>,
}

/// One row of the image grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    /// Alt text, or the image id when there is none.
    pub title: String,
    /// `Photo by author`, empty when the author is unknown.
    pub credit: String,
    pub is_checked: bool,
    pub is_cursor: bool,
}

/// One row of the history sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub term: String,
    /// Relative age, e.g. `5m ago`.
    pub when: String,
    pub is_selected: bool,

    /// Character ranges to highlight (for fuzzy filter matches).
    ///
    /// Each tuple is `(start_index, end_index)` in UTF-8 character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// History sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub filter: String,
    pub focused: bool,
    pub items: Vec<HistoryItem>,
    /// `No search history yet` or `No matches found`.
    pub empty_message: Option<String>,
    /// `N searches total`, absent when there is no history.
    pub total_label: Option<String>,
}

/// Home route body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub banner: BannerInfo,
    pub search_bar: SearchBarInfo,
    pub summary: Option<SummaryInfo>,
    /// Visible window of the grid.
    pub grid: Vec<GridItem>,
    /// Line under the grid (loading, end of results, empty states).
    pub status: Option<String>,
    /// Present while the sidebar is open.
    pub sidebar: Option<SidebarView>,
}

/// One provider entry on the login view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderItem {
    pub label: String,
    pub is_selected: bool,
}

/// Login route body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    pub providers: Vec<ProviderItem>,
    pub providers_focused: bool,
    pub cookie_input: String,
    pub cookie_focused: bool,
    pub verifying: bool,
    pub error: Option<String>,
}
