//! C-ABI wrapper around `dispatch-core`.
//!
//! # Overview
//! Exposes `load` and the GET/POST/PUT operations through `extern "C"`
//! functions so any language with a C FFI can use the dispatcher as a shared
//! library. Headers and params cross the boundary as JSON objects of strings;
//! successful responses come back as JSON text.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiDispatchResult` envelope conveys parsed JSON, the `false`
//!   sentinel (`Failed`) and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `dispatch_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use dispatch_core::{HeaderSet, HttpMethod, ParamSet};
use log::debug;

use types::*;

/// Borrow a C string as UTF-8. `None` for null; invalid UTF-8 reads as empty.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or(""))
}

// ---------------------------------------------------------------------------
// Dispatcher lifecycle
// ---------------------------------------------------------------------------

/// Create a dispatcher that sends the headers in `headers_json` with every
/// request.
///
/// `headers_json` must be a JSON object whose values are all strings, e.g.
/// `{"X-ChatWorkToken":"..."}`. Returns null if it is null, not such an
/// object, or if an internal panic occurs. The caller must free the returned
/// pointer with `dispatch_free`.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_load(headers_json: *const c_char) -> *mut FfiDispatcher {
    catch_unwind(|| {
        let Some(raw) = c_str(headers_json) else {
            return std::ptr::null_mut();
        };
        let headers: HeaderSet = match serde_json::from_str(raw) {
            Ok(headers) => headers,
            Err(e) => {
                debug!("rejected headers: {e}");
                return std::ptr::null_mut();
            }
        };
        let inner = dispatch_core::load(headers);
        Box::into_raw(Box::new(FfiDispatcher { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a dispatcher created by `dispatch_load`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free(dispatcher: *mut FfiDispatcher) {
    if !dispatcher.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(dispatcher) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a GET request to `endpoint`.
///
/// The caller must free the returned pointer with `dispatch_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_get(
    dispatcher: *const FfiDispatcher,
    endpoint: *const c_char,
) -> *mut FfiDispatchResult {
    send(dispatcher, endpoint, std::ptr::null(), HttpMethod::Get)
}

/// Send a POST request to `endpoint`.
///
/// `params_json` is a JSON object of strings, or null for no params.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_post(
    dispatcher: *const FfiDispatcher,
    endpoint: *const c_char,
    params_json: *const c_char,
) -> *mut FfiDispatchResult {
    send(dispatcher, endpoint, params_json, HttpMethod::Post)
}

/// Send a PUT request to `endpoint`.
///
/// `params_json` is a JSON object of strings, or null for no params.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_put(
    dispatcher: *const FfiDispatcher,
    endpoint: *const c_char,
    params_json: *const c_char,
) -> *mut FfiDispatchResult {
    send(dispatcher, endpoint, params_json, HttpMethod::Put)
}

fn send(
    dispatcher: *const FfiDispatcher,
    endpoint: *const c_char,
    params_json: *const c_char,
    method: HttpMethod,
) -> *mut FfiDispatchResult {
    catch_unwind(AssertUnwindSafe(|| {
        if dispatcher.is_null() {
            return FfiDispatchResult::null_arg("dispatcher");
        }
        let Some(endpoint) = c_str(endpoint) else {
            return FfiDispatchResult::null_arg("endpoint");
        };
        let params = c_str(params_json).map(serde_json::from_str::<ParamSet>).transpose();
        let params = match params {
            Ok(params) => params,
            Err(e) => return FfiDispatchResult::invalid_params(e),
        };

        let dispatcher = unsafe { &(*dispatcher).inner };
        let outcome = match method {
            HttpMethod::Get => dispatcher.get(endpoint),
            HttpMethod::Post => dispatcher.post(endpoint, params.as_ref()),
            HttpMethod::Put => dispatcher.put(endpoint, params.as_ref()),
        };
        FfiDispatchResult::from_outcome(outcome)
    }))
    .unwrap_or_else(|_| FfiDispatchResult::panic(&format!("panic in dispatch {method}")))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiDispatchResult` returned by any `dispatch_get`/`_post`/`_put`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free_result(result: *mut FfiDispatchResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn start_server() -> SocketAddr {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        addr
    }

    fn load() -> *mut FfiDispatcher {
        let headers = CString::new(r#"{"x-api-token":"secret"}"#).unwrap();
        let dispatcher = dispatch_load(headers.as_ptr());
        assert!(!dispatcher.is_null());
        dispatcher
    }

    fn json_of(result: *mut FfiDispatchResult) -> serde_json::Value {
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.code, FfiResultCode::Ok);
        let text = unsafe { CStr::from_ptr(result_ref.json) }.to_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn load_and_free() {
        dispatch_free(load());
    }

    #[test]
    fn load_accepts_empty_headers() {
        let headers = CString::new("{}").unwrap();
        let dispatcher = dispatch_load(headers.as_ptr());
        assert!(!dispatcher.is_null());
        dispatch_free(dispatcher);
    }

    #[test]
    fn load_null_returns_null() {
        assert!(dispatch_load(std::ptr::null()).is_null());
    }

    #[test]
    fn load_rejects_non_string_header_values() {
        let headers = CString::new(r#"{"x-retry":1}"#).unwrap();
        assert!(dispatch_load(headers.as_ptr()).is_null());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let headers = CString::new("not json").unwrap();
        assert!(dispatch_load(headers.as_ptr()).is_null());
    }

    #[test]
    fn free_null_is_safe() {
        dispatch_free(std::ptr::null_mut());
        dispatch_free_result(std::ptr::null_mut());
        dispatch_free_string(std::ptr::null_mut());
    }

    #[test]
    fn get_null_dispatcher_returns_null_arg() {
        let endpoint = CString::new("http://localhost:3000/echo").unwrap();
        let result = dispatch_get(std::ptr::null(), endpoint.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.code, FfiResultCode::NullArg);
        let msg = unsafe { CStr::from_ptr(result_ref.error_message) }.to_str().unwrap();
        assert!(msg.contains("dispatcher"));
        dispatch_free_result(result);
    }

    #[test]
    fn get_null_endpoint_returns_null_arg() {
        let dispatcher = load();
        let result = dispatch_get(dispatcher, std::ptr::null());
        assert_eq!(unsafe { &*result }.code, FfiResultCode::NullArg);
        dispatch_free_result(result);
        dispatch_free(dispatcher);
    }

    #[test]
    fn post_with_invalid_params_is_rejected_before_sending() {
        let dispatcher = load();
        let endpoint = CString::new("http://127.0.0.1:1/echo").unwrap();
        let params = CString::new(r#"["not","an","object"]"#).unwrap();
        let result = dispatch_post(dispatcher, endpoint.as_ptr(), params.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.code, FfiResultCode::InvalidParams);
        assert!(result_ref.json.is_null());
        assert!(!result_ref.error_message.is_null());
        dispatch_free_result(result);
        dispatch_free(dispatcher);
    }

    #[test]
    fn get_echo_returns_json() {
        let addr = start_server();
        let dispatcher = load();
        let endpoint = CString::new(format!("http://{addr}/echo")).unwrap();

        let result = dispatch_get(dispatcher, endpoint.as_ptr());
        let echo = json_of(result);
        assert_eq!(echo["method"], "GET");
        assert_eq!(echo["headers"]["x-api-token"], "secret");

        dispatch_free_result(result);
        dispatch_free(dispatcher);
    }

    #[test]
    fn post_and_put_forward_params() {
        let addr = start_server();
        let dispatcher = load();
        let endpoint = CString::new(format!("http://{addr}/echo")).unwrap();

        let result = dispatch_post(dispatcher, endpoint.as_ptr(), std::ptr::null());
        let echo = json_of(result);
        assert_eq!(echo["method"], "POST");
        assert_eq!(echo["form"], serde_json::json!({"": ""}));
        dispatch_free_result(result);

        let params = CString::new(r#"{"name":"lobby"}"#).unwrap();
        let result = dispatch_put(dispatcher, endpoint.as_ptr(), params.as_ptr());
        let echo = json_of(result);
        assert_eq!(echo["method"], "PUT");
        assert_eq!(echo["form"], serde_json::json!({"name": "lobby"}));
        dispatch_free_result(result);

        dispatch_free(dispatcher);
    }

    #[test]
    fn error_status_returns_failed() {
        let addr = start_server();
        let dispatcher = load();

        for code in [201, 404, 503] {
            let endpoint = CString::new(format!("http://{addr}/status/{code}")).unwrap();
            let result = dispatch_get(dispatcher, endpoint.as_ptr());
            let result_ref = unsafe { &*result };
            assert_eq!(result_ref.code, FfiResultCode::Failed, "{code}");
            assert!(result_ref.json.is_null());
            assert!(result_ref.error_message.is_null());
            dispatch_free_result(result);
        }

        dispatch_free(dispatcher);
    }

    #[test]
    fn malformed_body_returns_parse() {
        let addr = start_server();
        let dispatcher = load();
        let endpoint = CString::new(format!("http://{addr}/malformed")).unwrap();

        let result = dispatch_get(dispatcher, endpoint.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.code, FfiResultCode::Parse);
        assert!(!result_ref.error_message.is_null());

        dispatch_free_result(result);
        dispatch_free(dispatcher);
    }

    #[test]
    fn unreachable_host_returns_transport() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let dispatcher = load();
        let endpoint = CString::new(format!("http://{addr}/echo")).unwrap();

        let result = dispatch_get(dispatcher, endpoint.as_ptr());
        assert_eq!(unsafe { &*result }.code, FfiResultCode::Transport);

        dispatch_free_result(result);
        dispatch_free(dispatcher);
    }
}
