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
    store::Book,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        envelope::encode(StatusCode::OK, &self, HeaderMap::new())
    }
}

pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<GetBookResponse, ApiError> {
    let book = state
        .store()
        .get(id)
        .await
        .map_err(|err| ApiError::from_store(state.error_verbosity(), err))?;

    Ok(GetBookResponse { book })
}
