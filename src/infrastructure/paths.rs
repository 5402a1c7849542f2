//! Path utilities for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, so `~`
//! in user-supplied paths has to be rewritten before it can be opened.

use std::path::PathBuf;

/// Returns the data directory for Zsplash storage.
///
/// The directory is `/host/.local/share/zellij/zsplash` in the Zellij
/// sandbox. `/host` points to the cwd of the last focused terminal, or the
/// folder where Zellij was started, which is normally the user's home.
///
/// The stored session (`session.json`) and the trace file live here.
///
/// # Examples
///
/// ```
/// use zsplash::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str(), Some("/host/.local/share/zellij/zsplash"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("zsplash")
}

/// Expands tilde paths to use the `/host` prefix for the Zellij sandbox.
///
/// Used for the `theme_file` option.
///
/// # Examples
///
/// ```
/// use zsplash::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_only_expands_at_the_start() {
        assert_eq!(expand_tilde("~/a"), "/host/a");
        assert_eq!(expand_tilde("a/~/b"), "a/~/b");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
    }
}
