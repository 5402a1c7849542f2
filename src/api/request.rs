//! Backend calls and the correlation tag that travels with each of them.
//!
//! Zellij delivers web responses as events, detached from the call that
//! caused them. Every request therefore carries a [`RequestTag`] serialized
//! into the request context map; the response hands it back unchanged.

use crate::domain::error::{Result, ZsplashError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which the tag is stored in the Zellij request context.
pub const CONTEXT_KEY: &str = "zsplash";

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// `GET /auth/user`
    CurrentUser,
    /// `GET /auth/refresh`, issued only by the client itself after a 401.
    Refresh,
    /// `POST /auth/logout`
    Logout,
    /// `GET /top-searches`
    TopSearches,
    /// `GET /history`
    History,
    /// `POST /search`
    Search { term: String, page: u32 },
}

#[derive(Serialize)]
struct SearchBody<'a> {
    term: &'a str,
    page: u32,
}

impl ApiRequest {
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::Logout | Self::Search { .. } => HttpMethod::Post,
            Self::CurrentUser | Self::Refresh | Self::TopSearches | Self::History => HttpMethod::Get,
        }
    }

    /// Path relative to the configured API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::CurrentUser => "/auth/user",
            Self::Refresh => "/auth/refresh",
            Self::Logout => "/auth/logout",
            Self::TopSearches => "/top-searches",
            Self::History => "/history",
            Self::Search { .. } => "/search",
        }
    }

    /// JSON request body. Only searches carry one.
    ///
    /// # Errors
    ///
    /// Returns [`ZsplashError::Context`] if the body cannot be serialized.
    pub fn body(&self) -> Result<Vec<u8>> {
        match self {
            Self::Search { term, page } => serde_json::to_vec(&SearchBody { term, page: *page })
                .map_err(|e| ZsplashError::Context(format!("failed to encode search body: {e}"))),
            _ => Ok(Vec::new()),
        }
    }

    /// Short name used in spans and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CurrentUser => "current_user",
            Self::Refresh => "refresh",
            Self::Logout => "logout",
            Self::TopSearches => "top_searches",
            Self::History => "history",
            Self::Search { .. } => "search",
        }
    }
}

/// Correlation data attached to a request and returned with its response.
///
/// `mount` identifies the navigation that issued the request and
/// `generation` the search it belongs to; the application drops responses
/// whose ids no longer match. A refresh call carries the request it was
/// issued for in `resume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTag {
    pub request: ApiRequest,
    pub mount: u64,
    #[serde(default)]
    pub generation: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<Box<RequestTag>>,
    #[serde(default)]
    pub after_refresh: bool,
}

impl RequestTag {
    #[must_use]
    pub const fn new(request: ApiRequest, mount: u64) -> Self {
        Self {
            request,
            mount,
            generation: 0,
            resume: None,
            after_refresh: false,
        }
    }

    #[must_use]
    pub const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Builds the refresh call that stands in for `self` after a 401.
    #[must_use]
    pub fn refresh_for(self) -> Self {
        Self {
            request: ApiRequest::Refresh,
            mount: self.mount,
            generation: self.generation,
            resume: Some(Box::new(self)),
            after_refresh: false,
        }
    }

    /// Serializes the tag into a Zellij request context map.
    ///
    /// # Errors
    ///
    /// Returns [`ZsplashError::Context`] if the tag cannot be encoded.
    pub fn to_context(&self) -> Result<BTreeMap<String, String>> {
        let encoded = serde_json::to_string(self)
            .map_err(|e| ZsplashError::Context(format!("failed to encode request tag: {e}")))?;
        Ok(BTreeMap::from([(CONTEXT_KEY.to_string(), encoded)]))
    }

    /// Recovers the tag from the context map of a web request result.
    ///
    /// # Errors
    ///
    /// Returns [`ZsplashError::Context`] when the map has no tag or the tag
    /// is malformed, which means the response was not issued by this plugin.
    pub fn from_context(context: &BTreeMap<String, String>) -> Result<Self> {
        let encoded = context
            .get(CONTEXT_KEY)
            .ok_or_else(|| ZsplashError::Context("missing request tag".to_string()))?;
        serde_json::from_str(encoded)
            .map_err(|e| ZsplashError::Context(format!("malformed request tag: {e}")))
    }
}

/// A fully-formed request, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_survives_the_context_map() {
        let tag = RequestTag::new(
            ApiRequest::Search {
                term: "cats".into(),
                page: 2,
            },
            7,
        )
        .with_generation(3)
        .refresh_for();

        let context = tag.to_context().unwrap();
        let back = RequestTag::from_context(&context).unwrap();

        assert_eq!(back, tag);
        assert_eq!(back.request, ApiRequest::Refresh);
        assert_eq!(back.resume.unwrap().generation, 3);
    }

    #[test]
    fn foreign_context_is_rejected() {
        let context = BTreeMap::from([("other".to_string(), "x".to_string())]);
        assert!(matches!(
            RequestTag::from_context(&context),
            Err(ZsplashError::Context(_))
        ));
    }

    #[test]
    fn search_body_is_term_and_page() {
        let body = ApiRequest::Search {
            term: "red fox".into(),
            page: 1,
        }
        .body()
        .unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), r#"{"term":"red fox","page":1}"#);
        assert!(ApiRequest::History.body().unwrap().is_empty());
    }
}
