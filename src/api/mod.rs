//! Backend access: request building, cookies and the 401 refresh protocol.
//!
//! The module is transport-agnostic. It produces [`HttpRequest`] values and
//! consumes raw status/header/body triples; the plugin shim hands them to
//! Zellij's `web_request` host call and feeds the results back.
//!
//! # Modules
//!
//! - [`request`]: Backend operations and correlation tags
//! - [`response`]: Typed response bodies
//! - [`cookies`]: Session cookie jar
//! - [`client`]: The adapter tying them together

pub mod client;
pub mod cookies;
pub mod request;
pub mod response;

pub use client::{ApiClient, Delivery, Received};
pub use cookies::CookieJar;
pub use request::{ApiRequest, HttpMethod, HttpRequest, RequestTag};
pub use response::ApiResponse;
