//! Plain HTTP listener that sends every request to the HTTPS port

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header, uri::Authority};
use axum::response::{IntoResponse, Redirect, Response};

/// Router answering every request with a redirect to `https_port`
pub fn redirect_router(https_port: u16) -> Router {
    Router::new().fallback(redirect).with_state(https_port)
}

async fn redirect(State(https_port): State<u16>, headers: HeaderMap, uri: Uri) -> Response {
    let Some(host) = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.parse::<Authority>().ok())
    else {
        return (StatusCode::BAD_REQUEST, "Missing or invalid Host header").into_response();
    };

    let authority = match https_port {
        443 => host.host().to_string(),
        port => format!("{}:{}", host.host(), port),
    };
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    Redirect::temporary(&format!("https://{}{}", authority, path)).into_response()
}
