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
    state::ApiState,
    store::Book,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        envelope::encode(StatusCode::OK, &self, HeaderMap::new())
    }
}

pub async fn list_books(State(state): State<ApiState>) -> Result<ListBooksResponse, ApiError> {
    let books = state
        .store()
        .get_all()
        .await
        .map_err(|err| ApiError::from_store(state.error_verbosity(), err))?;

    Ok(ListBooksResponse { books })
}
