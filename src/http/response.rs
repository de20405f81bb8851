//! Fixed responses and response headers.
//!
//! # Responsibilities
//! - Identify the server on every response (`Server` header)
//! - Produce the host-mismatch rejection

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Product token sent in the `Server` header.
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Body written when no site claims the request's host.
pub const REJECTION_BODY: &str = "Bad Request.";

pub fn server_header_value() -> HeaderValue {
    HeaderValue::from_static(SERVER_NAME)
}

/// Put our `Server` value first, keeping any values already present after it.
pub fn stamp_server(headers: &mut HeaderMap) {
    let existing: Vec<HeaderValue> = headers.get_all(header::SERVER).iter().cloned().collect();
    headers.insert(header::SERVER, server_header_value());
    for value in existing {
        headers.append(header::SERVER, value);
    }
}

/// Response for a request whose host matches no site on the listener.
pub fn host_mismatch() -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        REJECTION_BODY,
    )
        .into_response()
}
