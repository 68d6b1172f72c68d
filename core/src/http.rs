//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds a
//! `FetchOptions` descriptor, hands it to the transport together with the
//! endpoint, and receives an `HttpResponse` back. Status triage lives here as
//! well so the policy can be tested without any transport at all.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{HeaderSet, ParamSet};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transport needs to perform one request besides the URL.
///
/// Borrows the dispatcher's headers and, when non-empty, the caller's
/// params. `mute_http_exceptions` tells the transport to hand back 4xx/5xx
/// responses as data instead of failing. The dispatcher always sets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions<'a> {
    pub method: HttpMethod,
    pub headers: &'a HeaderSet,
    pub payload: Cow<'a, ParamSet>,
    pub mute_http_exceptions: bool,
}

/// A response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Coarse classification of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    /// Exactly 200.
    Success,
    /// 400 through 499.
    ClientError,
    /// 500 and above.
    ServerError,
    /// Anything else, including 201, 204 and redirects.
    Unknown,
}

/// Classify a status code. Only 200 counts as success.
pub fn classify(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        400..=499 => StatusClass::ClientError,
        500..=u16::MAX => StatusClass::ServerError,
        _ => StatusClass::Unknown,
    }
}

/// `true` only when `status` classifies as `StatusClass::Success`.
pub fn is_successful(status: u16) -> bool {
    classify(status) == StatusClass::Success
}
