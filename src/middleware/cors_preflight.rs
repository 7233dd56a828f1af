use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Short-circuits every `OPTIONS` request with an empty 200.
///
/// Browser preflights carrying `Origin` are already answered by the CORS
/// layer further out; this catches the rest so no `OPTIONS` request ever
/// reaches the method routers.
pub async fn cors_preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    next.run(req).await
}
