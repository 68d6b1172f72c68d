use std::collections::BTreeMap;

use axum::{
    extract::{Path, Request},
    http::{HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Form, Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the server saw of an `/echo` request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub form: BTreeMap<String, String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo_query).post(echo_form).put(echo_form))
        .route("/status/{code}", any(status_reply))
        .route("/malformed", any(malformed))
        .layer(middleware::from_fn(log_request))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    debug!("{method} {uri} -> {}", response.status());
    response
}

async fn echo_query(method: Method, headers: HeaderMap) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        headers: header_map(&headers),
        form: BTreeMap::new(),
    })
}

async fn echo_form(
    method: Method,
    headers: HeaderMap,
    Form(form): Form<BTreeMap<String, String>>,
) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        headers: header_map(&headers),
        form,
    })
}

async fn status_reply(Path(code): Path<u16>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({ "status": code }))))
}

async fn malformed() -> &'static str {
    "not json"
}

/// Header names arrive lowercased; values that are not visible ASCII are dropped.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}
