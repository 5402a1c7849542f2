//! HTTP client adapter with the one-shot session refresh protocol.
//!
//! [`ApiClient`] never performs I/O. [`ApiClient::prepare`] turns a tagged
//! request into an [`HttpRequest`] for the host, and [`ApiClient::receive`]
//! turns the host's raw result back into a [`Delivery`]:
//!
//! ```text
//! request ──401──▶ GET /auth/refresh ──2xx──▶ request again (final)
//!                        │                          │
//!                        └──fail──▶ Unauthorized    └──401──▶ Unauthorized
//! ```
//!
//! A 401 on the refresh call itself never triggers another refresh, so the
//! protocol always terminates after at most three round trips.

use super::cookies::CookieJar;
use super::request::{ApiRequest, HttpRequest, RequestTag};
use super::response::{failure_message, ApiResponse};
use crate::domain::error::Result;
use crate::domain::ApiError;
use std::collections::BTreeMap;

/// What the application should do with a raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The protocol needs another round trip; hand this to the host.
    Resend(HttpRequest),

    /// The call identified by `tag` has finished.
    Done {
        tag: RequestTag,
        result: std::result::Result<ApiResponse, ApiError>,
    },
}

/// Outcome of [`ApiClient::receive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub delivery: Delivery,
    /// Whether `Set-Cookie` headers changed the jar and it should be persisted.
    pub cookies_changed: bool,
}

/// Transport adapter bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    jar: CookieJar,
}

impl ApiClient {
    /// Creates a client for `base_url`; a trailing `/` is ignored.
    #[must_use]
    pub fn new(base_url: &str, jar: CookieJar) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            jar,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn replace_jar(&mut self, jar: CookieJar) {
        self.jar = jar;
    }

    pub fn clear_session(&mut self) {
        self.jar.clear();
    }

    /// URL that starts the OAuth flow for `provider` in a browser.
    #[must_use]
    pub fn login_url(&self, provider: &str) -> String {
        format!("{}/auth/{provider}", self.base_url)
    }

    /// Builds the host request for `tag`.
    ///
    /// Every request carries JSON content headers and the current cookies,
    /// mirroring a browser `fetch` with `credentials: "include"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or the correlation tag cannot be encoded.
    pub fn prepare(&self, tag: &RequestTag) -> Result<HttpRequest> {
        let _span = tracing::debug_span!(
            "api_prepare",
            request = tag.request.label(),
            mount = tag.mount,
            generation = tag.generation,
            after_refresh = tag.after_refresh
        )
        .entered();

        let mut headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]);
        if !self.jar.is_empty() {
            headers.insert("Cookie".to_string(), self.jar.header_value());
        }

        let request = HttpRequest {
            url: format!("{}{}", self.base_url, tag.request.path()),
            method: tag.request.method(),
            headers,
            body: tag.request.body()?,
            context: tag.to_context()?,
        };

        tracing::debug!(url = %request.url, method = ?request.method, "request prepared");
        Ok(request)
    }

    /// Interprets a host web request result.
    ///
    /// # Errors
    ///
    /// Returns [`ZsplashError::Context`](crate::domain::ZsplashError::Context)
    /// when `context` carries no tag from this client. All backend failures
    /// are reported inside [`Delivery::Done`] instead.
    pub fn receive(
        &mut self,
        status: u16,
        headers: &BTreeMap<String, String>,
        body: &[u8],
        context: &BTreeMap<String, String>,
    ) -> Result<Received> {
        let tag = RequestTag::from_context(context)?;

        let _span = tracing::debug_span!(
            "api_receive",
            request = tag.request.label(),
            status = status,
            mount = tag.mount,
            body_len = body.len()
        )
        .entered();

        let cookies_changed = header(headers, "set-cookie").is_some_and(|value| self.jar.absorb(value));

        let delivery = match (status, tag.request == ApiRequest::Refresh) {
            (200..=299, true) => self.resume_after_refresh(tag)?,
            (_, true) => {
                tracing::debug!("session refresh failed");
                Self::unauthorized(tag)
            }
            (401, false) if !tag.after_refresh => {
                tracing::debug!("unauthorized, attempting session refresh");
                Delivery::Resend(self.prepare(&tag.refresh_for())?)
            }
            (401, false) => {
                tracing::debug!("still unauthorized after refresh");
                Self::unauthorized(tag)
            }
            (200..=299, false) => {
                let result = ApiResponse::decode(&tag.request, status, body);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "response decode failed");
                }
                Delivery::Done { tag, result }
            }
            (_, false) => {
                let message = failure_message(status, body);
                tracing::debug!(message = %message, "request failed");
                Delivery::Done {
                    tag,
                    result: Err(ApiError::failed(Some(status), message)),
                }
            }
        };

        Ok(Received {
            delivery,
            cookies_changed,
        })
    }

    fn resume_after_refresh(&self, tag: RequestTag) -> Result<Delivery> {
        match tag.resume {
            Some(original) => {
                tracing::debug!(request = original.request.label(), "session refreshed, resending");
                let retry = RequestTag {
                    after_refresh: true,
                    ..*original
                };
                Ok(Delivery::Resend(self.prepare(&retry)?))
            }
            None => Ok(Delivery::Done {
                tag,
                result: Ok(ApiResponse::Refreshed),
            }),
        }
    }

    /// Completes the request a failed refresh was issued for.
    fn unauthorized(tag: RequestTag) -> Delivery {
        let tag = match tag.resume {
            Some(original) => *original,
            None => tag,
        };
        Delivery::Done {
            tag,
            result: Err(ApiError::Unauthorized),
        }
    }
}

fn header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::HttpMethod;

    const BASE: &str = "https://api.test/api/";

    fn client() -> ApiClient {
        ApiClient::new(BASE, CookieJar::from_header("sid=old"))
    }

    fn search_tag() -> RequestTag {
        RequestTag::new(
            ApiRequest::Search {
                term: "cats".into(),
                page: 1,
            },
            1,
        )
        .with_generation(4)
    }

    fn respond(client: &mut ApiClient, request: &HttpRequest, status: u16, body: &str) -> Received {
        client
            .receive(status, &BTreeMap::new(), body.as_bytes(), &request.context)
            .unwrap()
    }

    fn resend(received: Received) -> HttpRequest {
        match received.delivery {
            Delivery::Resend(request) => request,
            done @ Delivery::Done { .. } => panic!("expected a resend, got {done:?}"),
        }
    }

    #[test]
    fn prepare_builds_json_request_with_cookies() {
        let client = client();
        let request = client.prepare(&search_tag()).unwrap();

        assert_eq!(request.url, "https://api.test/api/search");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers["Content-Type"], "application/json");
        assert_eq!(request.headers["Accept"], "application/json");
        assert_eq!(request.headers["Cookie"], "sid=old");
        assert_eq!(client.login_url("github"), "https://api.test/api/auth/github");
    }

    #[test]
    fn unauthorized_triggers_one_refresh_then_resends_original() {
        let mut client = client();
        let original = client.prepare(&search_tag()).unwrap();

        let refresh = resend(respond(&mut client, &original, 401, ""));
        assert_eq!(refresh.url, "https://api.test/api/auth/refresh");
        assert_eq!(refresh.method, HttpMethod::Get);

        let mut headers = BTreeMap::new();
        headers.insert("Set-Cookie".to_string(), "sid=new; Path=/; HttpOnly".to_string());
        let received = client.receive(200, &headers, b"{}", &refresh.context).unwrap();
        assert!(received.cookies_changed);

        let retry = resend(received);
        assert_eq!(retry.url, original.url);
        assert_eq!(retry.body, original.body);
        assert_eq!(retry.headers["Cookie"], "sid=new");

        let page = r#"{"term":"cats","images":[],"total":0,"currentPage":1,"totalPages":0}"#;
        match respond(&mut client, &retry, 200, page).delivery {
            Delivery::Done { tag, result } => {
                assert_eq!(tag.generation, 4);
                assert!(matches!(result, Ok(ApiResponse::Search(_))));
            }
            Delivery::Resend(_) => panic!("expected completion"),
        }
    }

    #[test]
    fn second_unauthorized_after_refresh_is_final() {
        let mut client = client();
        let original = client.prepare(&search_tag()).unwrap();
        let refresh = resend(respond(&mut client, &original, 401, ""));
        let retry = resend(respond(&mut client, &refresh, 200, ""));

        match respond(&mut client, &retry, 401, "").delivery {
            Delivery::Done { tag, result } => {
                assert_eq!(tag.request, search_tag().request);
                assert_eq!(result, Err(ApiError::Unauthorized));
            }
            Delivery::Resend(_) => panic!("refresh must not loop"),
        }
    }

    #[test]
    fn failed_refresh_completes_original_as_unauthorized() {
        let mut client = client();
        let original = client.prepare(&RequestTag::new(ApiRequest::CurrentUser, 2)).unwrap();
        let refresh = resend(respond(&mut client, &original, 401, ""));

        match respond(&mut client, &refresh, 401, "").delivery {
            Delivery::Done { tag, result } => {
                assert_eq!(tag.request, ApiRequest::CurrentUser);
                assert_eq!(tag.mount, 2);
                assert_eq!(result, Err(ApiError::Unauthorized));
            }
            Delivery::Resend(_) => panic!("expected completion"),
        }
    }

    #[test]
    fn server_errors_are_request_failures() {
        let mut client = client();
        let request = client.prepare(&RequestTag::new(ApiRequest::History, 1)).unwrap();

        match respond(&mut client, &request, 503, r#"{"message":"down"}"#).delivery {
            Delivery::Done { result, .. } => {
                assert_eq!(result, Err(ApiError::failed(Some(503), "down")));
            }
            Delivery::Resend(_) => panic!("only 401 triggers a refresh"),
        }
    }

    #[test]
    fn expired_cookie_header_clears_session() {
        let mut client = client();
        let request = client.prepare(&RequestTag::new(ApiRequest::Logout, 1)).unwrap();
        let headers = BTreeMap::from([("set-cookie".to_string(), "sid=; Max-Age=0".to_string())]);

        let received = client.receive(200, &headers, b"{}", &request.context).unwrap();
        assert!(received.cookies_changed);
        assert!(client.jar().is_empty());
    }
}
