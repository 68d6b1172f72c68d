//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Results cross the boundary as one envelope: a result code, the JSON
//! response serialized back to a C string, and an error message. Conversion
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use dispatch_core::{DispatchError, LogSink, RequestDispatcher, UreqTransport};
use serde_json::Value;

/// Opaque handle to a `RequestDispatcher`. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiDispatcher {
    pub(crate) inner: RequestDispatcher<UreqTransport, LogSink>,
}

/// Outcome codes returned in `FfiDispatchResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResultCode {
    /// Status 200; `json` holds the parsed body.
    Ok = 0,
    /// Any other status. The C-side equivalent of `false`.
    Failed = 1,
    Transport = 2,
    Parse = 3,
    InvalidParams = 4,
    NullArg = 5,
    Panic = 6,
}

/// Result envelope for `dispatch_get`, `dispatch_post` and `dispatch_put`.
///
/// `json` is non-null only for `Ok`. `error_message` is non-null for every
/// code except `Ok` and `Failed`.
#[repr(C)]
pub struct FfiDispatchResult {
    pub code: FfiResultCode,
    pub json: *mut c_char,
    pub error_message: *mut c_char,
}

impl FfiDispatchResult {
    /// Convert a dispatcher outcome into a heap-allocated result.
    pub(crate) fn from_outcome(outcome: Result<Option<Value>, DispatchError>) -> *mut Self {
        match outcome {
            Ok(Some(value)) => Self::build(FfiResultCode::Ok, Some(value.to_string()), None),
            Ok(None) => Self::build(FfiResultCode::Failed, None, None),
            Err(err) => {
                let code = match &err {
                    DispatchError::Transport(_) => FfiResultCode::Transport,
                    DispatchError::Parse(_) => FfiResultCode::Parse,
                };
                Self::build(code, None, Some(err.to_string()))
            }
        }
    }

    pub(crate) fn invalid_params(err: serde_json::Error) -> *mut Self {
        Self::build(
            FfiResultCode::InvalidParams,
            None,
            Some(format!("params must be a JSON object of strings: {err}")),
        )
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::build(FfiResultCode::NullArg, None, Some(format!("null argument: {name}")))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::build(FfiResultCode::Panic, None, Some(msg.to_string()))
    }

    fn build(code: FfiResultCode, json: Option<String>, error_message: Option<String>) -> *mut Self {
        Box::into_raw(Box::new(FfiDispatchResult {
            code,
            json: json.map_or(std::ptr::null_mut(), into_c_string),
            error_message: error_message.map_or(std::ptr::null_mut(), into_c_string),
        }))
    }
}

/// Interior NUL bytes cannot occur in serialized JSON; an error message
/// containing one degrades to an empty string.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}
