//! Path parameter extractors
//!
//! Usernames arrive as raw path segments; parsing into `Username` happens in
//! the services so every endpoint reports malformed names the same way.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::response::ApiError;

/// Path extractor that rejects with an `ApiError` body
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ApiPath(inner))
    }
}

/// `/user/:username/...`
#[derive(Debug, Deserialize)]
pub struct UserPath {
    pub username: String,
}

/// `/user/:username/<action>/:other`
///
/// `other` is the requester for accept/decline and the target for a request.
#[derive(Debug, Deserialize)]
pub struct UserPairPath {
    pub username: String,
    pub other: String,
}
