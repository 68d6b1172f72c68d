//! Header and parameter mappings passed through the dispatcher.
//!
//! # Design
//! Both are plain string-to-string maps. `BTreeMap` keeps iteration order
//! stable, so requests built from the same mapping always serialize the same
//! way and tests can compare payloads directly.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Headers attached to every request a dispatcher sends.
pub type HeaderSet = BTreeMap<String, String>;

/// Per-call parameters sent as the request payload.
pub type ParamSet = BTreeMap<String, String>;

/// The one-entry mapping `{"": ""}` sent in place of an empty payload.
pub fn sentinel_params() -> ParamSet {
    ParamSet::from([(String::new(), String::new())])
}

/// Return `params` unchanged when it has entries, otherwise the sentinel.
///
/// The caller's mapping is only borrowed; a fresh sentinel is allocated when
/// substitution is needed.
pub fn normalize_params(params: Option<&ParamSet>) -> Cow<'_, ParamSet> {
    match params {
        Some(params) if !params.is_empty() => Cow::Borrowed(params),
        _ => Cow::Owned(sentinel_params()),
    }
}
