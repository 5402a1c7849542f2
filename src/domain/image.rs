//! Image search result types as delivered by the backend.
//!
//! The backend speaks camelCase JSON. Fields the image provider may leave out
//! (`alt`, `author`) are decoded leniently: a missing or `null` value becomes
//! the empty string so a single sloppy record never fails a whole page.

use serde::{Deserialize, Deserializer, Serialize};

/// A single image. Identity is `id`; records are never mutated after receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub thumb: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
}

impl Image {
    /// Text shown for the image in the grid: the alt text, or the id when the
    /// provider gave no description.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.alt.trim().is_empty() {
            &self.id
        } else {
            &self.alt
        }
    }
}

/// One page of search results, exactly as returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub term: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

const fn first_page() -> u32 {
    1
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
