//! Typed outcomes of backend calls.

use super::request::ApiRequest;
use crate::domain::{ApiError, HistoryEntry, SearchPage, Session, TopSearch, User};
use serde::Deserialize;

/// Decoded body of a successful response, one variant per [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// `None` when the backend reports no signed-in user.
    CurrentUser(Option<User>),
    Refreshed,
    LoggedOut,
    TopSearches(Vec<TopSearch>),
    History(Vec<HistoryEntry>),
    Search(SearchPage),
}

impl ApiResponse {
    /// Decodes a 2xx body for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] carrying `status` when the body
    /// does not match the expected shape.
    pub fn decode(request: &ApiRequest, status: u16, body: &[u8]) -> Result<Self, ApiError> {
        let invalid = |e: serde_json::Error| {
            ApiError::failed(Some(status), format!("invalid {} response: {e}", request.label()))
        };

        match request {
            ApiRequest::CurrentUser => {
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::CurrentUser(None));
                }
                let session: Session = serde_json::from_slice(body).map_err(invalid)?;
                Ok(Self::CurrentUser(session.user))
            }
            ApiRequest::Refresh => Ok(Self::Refreshed),
            ApiRequest::Logout => Ok(Self::LoggedOut),
            ApiRequest::TopSearches => serde_json::from_slice(body).map(Self::TopSearches).map_err(invalid),
            ApiRequest::History => serde_json::from_slice(body).map(Self::History).map_err(invalid),
            ApiRequest::Search { .. } => serde_json::from_slice(body).map(Self::Search).map_err(invalid),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Best-effort description of a failed response.
///
/// Prefers a JSON `message` or `error` field, then a short plain-text body,
/// then the bare status.
#[must_use]
pub fn failure_message(status: u16, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.message;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
        return text.to_string();
    }

    format!("HTTP {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_user_body_means_signed_out() {
        assert_eq!(
            ApiResponse::decode(&ApiRequest::CurrentUser, 200, b"").unwrap(),
            ApiResponse::CurrentUser(None)
        );
        assert_eq!(
            ApiResponse::decode(&ApiRequest::CurrentUser, 200, br#"{"user":null}"#).unwrap(),
            ApiResponse::CurrentUser(None)
        );
    }

    #[test]
    fn malformed_search_body_is_a_request_failure() {
        let request = ApiRequest::Search {
            term: "cats".into(),
            page: 1,
        };
        let err = ApiResponse::decode(&request, 200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: Some(200), .. }));
    }

    #[test]
    fn failure_message_prefers_json_fields() {
        assert_eq!(failure_message(500, br#"{"error":"boom"}"#), "boom");
        assert_eq!(failure_message(502, b"<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(failure_message(400, b"connection refused"), "connection refused");
    }
}
