use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{
    ApiError, BodyError, BodyErrorType, ErrorVerbosity, ErrorVerbosityProvider,
    InternalServerError,
};

/// Hard upper bound on request body size, enforced before decoding starts.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Strict JSON body extractor that rejects with an [`ApiError`].
///
/// The contract is deliberately tighter than a plain deserialize: the body is
/// capped at [`MAX_BODY_BYTES`], unknown object members are rejected (input
/// shapes carry `deny_unknown_fields`), and the body must hold exactly one
/// JSON value. Trailing non-whitespace bytes, a concatenated second value
/// included, invalidate the request.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = from_body(req.into_body(), state.error_verbosity()).await?;

        Ok(ApiJson(value))
    }
}

/// Runs the strict decode contract against an already-detached body.
///
/// For handlers that must do other work before touching the body (update
/// loads the record first, so a missing id answers 404 even when the body is
/// bad). [`ApiJson`] goes through here too.
pub async fn from_body<T>(body: axum::body::Body, verbosity: ErrorVerbosity) -> Result<T, ApiError>
where
    T: DeserializeOwned + JsonSchema + Debug,
{
    let bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                tracing::warn!("Body over size cap");

                return Err(body_error::<T>(verbosity, BodyErrorType::TooLarge));
            }

            return Err(
                InternalServerError::from_generic_error(verbosity, anyhow::anyhow!(err)).into(),
            );
        }
    };

    match decode_single::<T>(&bytes) {
        Ok(value) => {
            tracing::trace!(json=?value, "Extracted");

            Ok(value)
        }
        Err(body_error_type) => {
            tracing::warn!(rejection=?body_error_type, "Rejection");

            Err(body_error::<T>(verbosity, body_error_type))
        }
    }
}

fn body_error<T: JsonSchema>(verbosity: ErrorVerbosity, body_error_type: BodyErrorType) -> ApiError {
    match serde_yaml::to_string(&schema_for!(T)) {
        Ok(body_expected_schema) => {
            BodyError::new(verbosity, body_error_type, body_expected_schema).into()
        }
        Err(err) => InternalServerError::from_generic_error(verbosity, err).into(),
    }
}

/// Decodes exactly one JSON value of shape `T` from `bytes`.
///
/// `Deserializer::end` fails on anything but whitespace after the first
/// value, which is what turns `{"a":1}{"a":2}` into a rejection even though
/// each value alone is valid.
pub fn decode_single<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BodyErrorType> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    let value = T::deserialize(&mut deserializer).map_err(classify)?;

    deserializer
        .end()
        .map_err(|_| BodyErrorType::TrailingData)?;

    Ok(value)
}

// serde folds `deny_unknown_fields` violations into its data-error category,
// so the split is recovered from the message prefix.
fn classify(err: serde_json::Error) -> BodyErrorType {
    let reason = err.to_string();

    if err.is_data() && reason.starts_with("unknown field") {
        return BodyErrorType::UnknownField { reason };
    }

    BodyErrorType::Malformed { reason }
}
