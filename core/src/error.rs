//! Error types for the request dispatcher.
//!
//! # Design
//! HTTP error statuses are not errors here: the dispatcher turns them into a
//! `None` result. What remains are faults the caller has to treat as bugs or
//! broken infrastructure: the transport could not complete the exchange, or
//! a 200 response carried a body that is not JSON.

use thiserror::Error;

/// Failure to complete a request/response exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// A response arrived but its body could not be read as text.
    #[error("could not read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Errors returned by `RequestDispatcher` operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 200 response whose body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
