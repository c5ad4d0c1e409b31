//! Axum server that the client's integration tests talk to.
//!
//! Routes:
//! - `ANY /echo`: 200 with the request's method, headers and body as JSON.
//! - `ANY /status/{code}`: answers `code` with the lowercase reason phrase.
//! - `POST /items`: 200 `{"id":1}` for a JSON body with a `name` field.
//! - `ANY /auth`: 200 echoing `Authorization`, or 401 when it is missing.
//! - `GET /slow/{millis}`: sleeps, then 200 `done`.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` saw. Headers keep wire order and repeated keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// Every value of `name`, compared case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: u64,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/items", post(create_item))
        .route("/auth", any(auth))
        .route("/slow/{millis}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            (status, reason.to_lowercase())
        }
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

async fn create_item(Json(item): Json<NewItem>) -> Json<Created> {
    tracing::debug!(name = %item.name, "creating item");
    Json(Created { id: 1 })
}

async fn auth(headers: HeaderMap) -> (StatusCode, String) {
    match headers.get(header::AUTHORIZATION) {
        Some(value) => (
            StatusCode::OK,
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        ),
        None => (StatusCode::UNAUTHORIZED, "missing authorization".to_string()),
    }
}

async fn slow(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}
