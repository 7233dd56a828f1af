use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path as AxumPath},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{ApiError, ErrorVerbosity, ErrorVerbosityProvider, PathError};

/// A wrapper around [`axum::extract::Path`] that rejects with an [`ApiError`].
///
/// The item routes use `ApiPath<i64>`, so a non-numeric identifier segment is
/// rejected here, before any handler or store call runs.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "path_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = AxumPath::<T>::from_request_parts(parts, state).await;

        match path {
            Ok(path) => {
                tracing::trace!(path=?path.0, "Extracted");

                Ok(ApiPath(path.0))
            }
            Err(path_rejection) => {
                tracing::warn!(rejection=?path_rejection, "Rejection");

                Err(from_path_rejection(state.error_verbosity(), path_rejection))
            }
        }
    }
}

fn from_path_rejection(verbosity: ErrorVerbosity, path_rejection: PathRejection) -> ApiError {
    PathError::new(verbosity, path_rejection.body_text()).into()
}
