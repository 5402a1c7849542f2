//! Domain layer for the zsplash plugin.
//!
//! Backend data shapes and the error taxonomy, independent of Zellij APIs and
//! of how requests are transported.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`image`]: Images and result pages
//! - [`session`]: The signed-in user
//! - [`history`]: Personal history and global top searches
//!
//! # Examples
//!
//! ```
//! use zsplash::domain::{Result, SearchPage};
//!
//! fn parse_page(body: &str) -> Result<SearchPage> {
//!     serde_json::from_str(body)
//!         .map_err(|e| zsplash::domain::ApiError::failed(None, e.to_string()).into())
//! }
//! ```

pub mod error;
pub mod history;
pub mod image;
pub mod session;

pub use error::{ApiError, Result, ZsplashError};
pub use history::{HistoryEntry, TopSearch};
pub use image::{Image, SearchPage};
pub use session::{Session, User};
