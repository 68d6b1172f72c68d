//! Blocking REST request dispatcher.
//!
//! # Overview
//! `RequestDispatcher` attaches a fixed header set to GET/POST/PUT requests,
//! hands them to a `Transport`, and turns the response into parsed JSON
//! (status 200) or `None` (anything else). Failed requests are reported once
//! to a `DiagnosticSink`.
//!
//! # Design
//! - The transport and the sink are injected, so the dispatcher can be
//!   exercised without a network or a global logger.
//! - Empty or absent payloads are replaced by the one-entry map `{"": ""}`.
//! - Only status 200 counts as success. 201, 204 and every other code outside
//!   4xx/5xx are reported as generic failures.
//! - `load` builds a dispatcher on top of `ureq` that logs through `log`.

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod sink;
pub mod transport;
pub mod types;

pub use dispatcher::RequestDispatcher;
pub use error::{DispatchError, TransportError};
pub use http::{classify, is_successful, FetchOptions, HttpMethod, HttpResponse, StatusClass};
pub use sink::{DiagnosticSink, LogSink};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{HeaderSet, ParamSet};

/// Dispatcher over the default `ureq` transport, logging through `log`.
#[cfg(feature = "ureq")]
pub fn load(headers: HeaderSet) -> RequestDispatcher<UreqTransport, LogSink> {
    RequestDispatcher::new(headers, UreqTransport::new(), LogSink)
}
