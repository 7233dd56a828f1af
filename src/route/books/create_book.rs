use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    envelope,
    error::{ApiError, ErrorVerbosityProvider, InternalServerError},
    extractor::json::ApiJson,
    state::ApiState,
    store::Book,
};

use super::CreateBook;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateBookResponse {
    pub book: Book,
}

impl CreateBookResponse {
    fn location(&self) -> String {
        format!("/v1/books/{}", self.book.id)
    }
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        match HeaderValue::from_str(&self.location()) {
            Ok(location) => {
                headers.insert(header::LOCATION, location);
            }
            Err(err) => {
                // Unreachable for integer ids; the envelope still goes out.
                tracing::error!(%err, "Invalid location header");
            }
        }

        envelope::encode(StatusCode::CREATED, &self, headers)
    }
}

pub async fn create_book(
    State(state): State<ApiState>,
    ApiJson(input): ApiJson<CreateBook>,
) -> Result<CreateBookResponse, ApiError> {
    let mut book = input.into_book();

    state
        .store()
        .insert(&mut book)
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?;

    Ok(CreateBookResponse { book })
}
