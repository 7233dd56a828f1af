use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::ApiState;

const VERSION: &str = "2.0.0";

/// Liveness response. Not an envelope: three fields, plain JSON.
#[derive(Debug, Serialize)]
pub struct HealthcheckResponse {
    status: &'static str,
    environment: String,
    version: &'static str,
}

impl IntoResponse for HealthcheckResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn healthcheck(State(state): State<ApiState>) -> HealthcheckResponse {
    HealthcheckResponse {
        status: "available",
        environment: state.environment().to_string(),
        version: VERSION,
    }
}
