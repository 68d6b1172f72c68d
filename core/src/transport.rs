//! The network boundary of the dispatcher.
//!
//! # Design
//! `Transport` performs exactly one blocking exchange. Implementations must
//! return error statuses as ordinary `HttpResponse` values; only failures to
//! complete the exchange at all become `TransportError`. Timeouts, proxies
//! and connection reuse are the implementation's business.

use crate::error::TransportError;
use crate::http::{FetchOptions, HttpResponse};

/// Performs one synchronous request/response exchange.
pub trait Transport {
    fn fetch(&self, url: &str, options: &FetchOptions<'_>) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use log::debug;
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{is_successful, FetchOptions, HttpMethod, HttpResponse};

    /// `Transport` backed by a `ureq` agent.
    ///
    /// POST and PUT payloads are sent as an `application/x-www-form-urlencoded`
    /// body. GET requests carry no body. Whether an error status fails the
    /// request follows `FetchOptions::mute_http_exceptions`, whatever the
    /// agent's own setting.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self {
                agent: Agent::new_with_defaults(),
            }
        }

        /// Use a caller-configured agent (timeouts, proxy, TLS).
        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn fetch(&self, url: &str, options: &FetchOptions<'_>) -> Result<HttpResponse, TransportError> {
            let request_failed = |e: ureq::Error| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            };

            let mut response = match options.method {
                HttpMethod::Get => prepare(self.agent.get(url), options).call(),
                HttpMethod::Post => prepare(self.agent.post(url), options).send_form(options.payload.iter()),
                HttpMethod::Put => prepare(self.agent.put(url), options).send_form(options.payload.iter()),
            }
            .map_err(request_failed)?;

            let status = response.status().as_u16();
            debug!("{} {url} -> {status}", options.method);

            // Only a 200 body is ever parsed. Elsewhere an unreadable body is dropped.
            let body = match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) if is_successful(status) => {
                    return Err(TransportError::Body {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
                }
                Err(e) => {
                    debug!("discarding unreadable body from {url}: {e}");
                    String::new()
                }
            };

            Ok(HttpResponse { status, body })
        }
    }

    /// Attach the descriptor's headers and its error-status policy.
    fn prepare<B>(mut builder: RequestBuilder<B>, options: &FetchOptions<'_>) -> RequestBuilder<B> {
        for (name, value) in options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .config()
            .http_status_as_error(!options.mute_http_exceptions)
            .build()
    }
}
