//! Sends GET/POST/PUT requests with a fixed header set and classifies the
//! responses.
//!
//! # Design
//! `RequestDispatcher` owns its headers, a `Transport` and a `DiagnosticSink`
//! and carries no other state, so repeated calls with identical inputs are
//! independent of one another. All three public operations go through
//! `send_request`, which normalizes the payload, performs the exchange and
//! turns the status code into either parsed JSON or `None`.

use log::debug;
use serde_json::Value;

use crate::error::DispatchError;
use crate::http::{classify, FetchOptions, HttpMethod, StatusClass};
use crate::sink::DiagnosticSink;
use crate::transport::Transport;
use crate::types::{normalize_params, HeaderSet, ParamSet};

/// Blocking REST dispatcher.
///
/// Each operation returns `Ok(Some(json))` for a 200 response,
/// `Ok(None)` for any other status, and `Err` when the exchange itself fails
/// or a 200 body is not JSON.
#[derive(Debug, Clone)]
pub struct RequestDispatcher<T, S> {
    headers: HeaderSet,
    transport: T,
    sink: S,
}

impl<T, S> RequestDispatcher<T, S>
where
    T: Transport,
    S: DiagnosticSink,
{
    pub fn new(headers: HeaderSet, transport: T, sink: S) -> Self {
        Self {
            headers,
            transport,
            sink,
        }
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn get(&self, endpoint: &str) -> Result<Option<Value>, DispatchError> {
        self.send_request(endpoint, HttpMethod::Get, None)
    }

    pub fn post(&self, endpoint: &str, params: Option<&ParamSet>) -> Result<Option<Value>, DispatchError> {
        self.send_request(endpoint, HttpMethod::Post, params)
    }

    pub fn put(&self, endpoint: &str, params: Option<&ParamSet>) -> Result<Option<Value>, DispatchError> {
        self.send_request(endpoint, HttpMethod::Put, params)
    }

    fn send_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: Option<&ParamSet>,
    ) -> Result<Option<Value>, DispatchError> {
        let options = FetchOptions {
            method,
            headers: &self.headers,
            payload: normalize_params(params),
            mute_http_exceptions: true,
        };
        debug!("dispatching {method} {endpoint}");

        let response = self.transport.fetch(endpoint, &options)?;

        let message = match classify(response.status) {
            StatusClass::Success => return Ok(Some(serde_json::from_str(&response.body)?)),
            StatusClass::ClientError => "request looks malformed",
            StatusClass::ServerError => "remote server looks unhealthy",
            StatusClass::Unknown => "request failed",
        };
        self.sink
            .emit(&format!("{message}: {method} {endpoint} returned {}", response.status));
        Ok(None)
    }
}
