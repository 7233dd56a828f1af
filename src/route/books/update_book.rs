use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    envelope,
    error::{ApiError, ErrorVerbosityProvider, InternalServerError},
    extractor::{json, path::ApiPath},
    state::ApiState,
    store::Book,
};

use super::{apply_update, UpdateBook};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        envelope::encode(StatusCode::OK, &self, HeaderMap::new())
    }
}

/// Load, merge, write back. The record is looked up before the body is
/// decoded, so a missing id answers 404 even when the body is bad; the merge
/// itself is pure and two concurrent updates race at last-writer-wins.
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
    req: Request,
) -> Result<UpdateBookResponse, ApiError> {
    let book = state
        .store()
        .get(id)
        .await
        .map_err(|err| ApiError::from_store(state.error_verbosity(), err))?;

    let input: UpdateBook = json::from_body(req.into_body(), state.error_verbosity()).await?;

    let book = apply_update(book, &input);

    state
        .store()
        .update(&book)
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?;

    Ok(UpdateBookResponse { book })
}
