use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

pub const FRONT_PAGE: &str = "<!doctype html><html><body><h1>Better Getter test site</h1></body></html>";

pub fn app() -> Router {
    Router::new()
        .route("/", get(front_page))
        .route("/teapot", get(teapot))
        .route("/cookies", get(cookies))
        .route("/redirect", get(redirect))
        .route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn front_page() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], FRONT_PAGE)
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "short and stout")
}

async fn cookies() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, "first=1"), (header::SET_COOKIE, "second=2")]),
        "two cookies",
    )
}

async fn redirect() -> Redirect {
    Redirect::to("/")
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        seen.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(Echo {
        method: method.to_string(),
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
