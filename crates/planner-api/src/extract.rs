//! `Json` and `Query` wrappers whose rejections use the API error body.

use axum::{
  extract::{FromRequest, FromRequestParts, Query, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body; a malformed body is a 400 with `{"error": ...}`.
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let axum::Json(value) = axum::Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Body(value))
  }
}

/// Query string; an unparseable value is a 400 with `{"error": ...}`.
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Params(value))
  }
}
