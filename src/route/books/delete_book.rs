use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    envelope,
    error::{ApiError, ErrorVerbosityProvider},
    extractor::path::ApiPath,
    state::ApiState,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteBookResponse {
    pub message: String,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        envelope::encode(StatusCode::OK, &self, HeaderMap::new())
    }
}

pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<DeleteBookResponse, ApiError> {
    state
        .store()
        .delete(id)
        .await
        .map_err(|err| ApiError::from_store(state.error_verbosity(), err))?;

    Ok(DeleteBookResponse {
        message: "book successfully deleted".to_string(),
    })
}
