//! Session cookie jar.
//!
//! Zellij's `web_request` has no cookie store, so the client keeps the
//! backend's cookies itself: `Set-Cookie` headers are absorbed after every
//! response and replayed as a single `Cookie` header on every request.
//!
//! The host flattens response headers into a map, so several cookies may
//! arrive comma-joined in one `Set-Cookie` value. Commas also appear inside
//! `Expires` dates; [`split_set_cookie`] stitches those back together.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Name/value pairs sent back to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie` header value (`a=1; b=2`).
    ///
    /// Also accepts a single pasted `Set-Cookie` line: attribute segments
    /// such as `Path=/` or `HttpOnly` are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use zsplash::api::CookieJar;
    ///
    /// let jar = CookieJar::from_header("connect.sid=s%3Aabc; theme=dark");
    /// assert_eq!(jar.get("connect.sid"), Some("s%3Aabc"));
    /// assert_eq!(jar.header_value(), "connect.sid=s%3Aabc; theme=dark");
    /// ```
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(parse_pair)
            .filter(|(name, value)| !is_attribute(name) && !value.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { cookies }
    }

    /// Value for the `Cookie` request header, empty when the jar is empty.
    #[must_use]
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Applies a `Set-Cookie` header value. Returns whether the jar changed.
    pub fn absorb(&mut self, set_cookie: &str) -> bool {
        self.absorb_at(set_cookie, Utc::now())
    }

    /// [`absorb`](Self::absorb) with an explicit clock for expiry checks.
    ///
    /// A cookie is removed when its value is empty, `Max-Age` is zero or
    /// negative, or `Expires` lies before `now`.
    pub fn absorb_at(&mut self, set_cookie: &str, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        for cookie in split_set_cookie(set_cookie) {
            let mut segments = cookie.split(';');
            let Some((name, value)) = segments.next().and_then(parse_pair) else {
                continue;
            };

            let expired = value.is_empty()
                || segments.filter_map(parse_pair).any(|(attr, attr_value)| {
                    if attr.eq_ignore_ascii_case("max-age") {
                        attr_value.parse::<i64>().is_ok_and(|secs| secs <= 0)
                    } else if attr.eq_ignore_ascii_case("expires") {
                        DateTime::parse_from_rfc2822(attr_value).is_ok_and(|at| at < now)
                    } else {
                        false
                    }
                });

            if expired {
                changed |= self.cookies.remove(name).is_some();
                tracing::debug!(cookie = %name, "cookie expired");
            } else if self.cookies.get(name).map(String::as_str) != Some(value) {
                self.cookies.insert(name.to_string(), value.to_string());
                changed = true;
                tracing::debug!(cookie = %name, "cookie stored");
            }
        }

        changed
    }
}

/// Splits a possibly comma-joined `Set-Cookie` value into single cookies.
///
/// A comma-separated fragment whose leading segment has no `=` is the tail of
/// an `Expires` date and belongs to the previous cookie.
#[must_use]
pub fn split_set_cookie(header: &str) -> Vec<String> {
    let mut cookies: Vec<String> = Vec::new();

    for fragment in header.split(',') {
        let head = fragment.split(';').next().unwrap_or_default();
        match cookies.last_mut() {
            Some(previous) if !head.contains('=') => {
                previous.push(',');
                previous.push_str(fragment);
            }
            _ if fragment.trim().is_empty() => {}
            _ => cookies.push(fragment.trim_start().to_string()),
        }
    }

    cookies
}

fn parse_pair(segment: &str) -> Option<(&str, &str)> {
    let (name, value) = segment.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim().trim_matches('"')))
}

fn is_attribute(name: &str) -> bool {
    ["path", "domain", "expires", "max-age", "samesite", "secure", "httponly"]
        .iter()
        .any(|attr| name.eq_ignore_ascii_case(attr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn absorbs_and_replays_cookies() {
        let mut jar = CookieJar::new();
        assert!(jar.absorb_at("connect.sid=abc; Path=/; HttpOnly", now()));
        assert_eq!(jar.header_value(), "connect.sid=abc");

        assert!(!jar.absorb_at("connect.sid=abc; Path=/", now()));
        assert!(jar.absorb_at("connect.sid=def; Path=/", now()));
        assert_eq!(jar.get("connect.sid"), Some("def"));
    }

    #[test]
    fn comma_joined_headers_keep_expires_dates_intact() {
        let header = "a=1; Expires=Wed, 21 Oct 2099 07:28:00 GMT; Path=/, b=2; HttpOnly";
        let parts = split_set_cookie(header);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("21 Oct 2099"));

        let mut jar = CookieJar::new();
        jar.absorb_at(header, now());
        assert_eq!(jar.header_value(), "a=1; b=2");
    }

    #[test]
    fn expired_cookies_are_removed() {
        let mut jar = CookieJar::from_header("a=1; b=2; c=3");

        assert!(jar.absorb_at("a=; Path=/", now()));
        assert!(jar.absorb_at("b=2; Max-Age=0", now()));
        assert!(jar.absorb_at("c=3; Expires=Thu, 01 Jan 1970 00:00:00 GMT", now()));
        assert!(jar.is_empty());

        assert!(!jar.absorb_at("missing=; Max-Age=0", now()));
    }

    #[test]
    fn pasted_set_cookie_line_drops_attributes() {
        let jar = CookieJar::from_header("connect.sid=s%3Axyz; Path=/; HttpOnly; SameSite=None");
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.header_value(), "connect.sid=s%3Axyz");
    }
}
