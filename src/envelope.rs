use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Encodes a response envelope as indented JSON with a trailing newline.
///
/// The envelope is a struct with exactly one serialized field (`book`,
/// `books`, `message`), so the single-key contract holds by construction.
/// Serialization is fully buffered: on failure nothing has been written yet
/// and a bare 500 goes out instead.
pub fn encode<T: Serialize>(status: StatusCode, envelope: &T, headers: HeaderMap) -> Response {
    let mut body = match serde_json::to_vec_pretty(envelope) {
        Ok(body) => body,
        Err(err) => {
            tracing::error!(%err, "Failed to encode response envelope");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    body.push(b'\n');

    let mut response = (status, body).into_response();

    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in headers.iter() {
        response.headers_mut().insert(name, value.clone());
    }

    response
}
