//! Session handlers
//!
//! Login, logout, signup and guest entry. Each returns the path the client
//! should navigate to as a bare JSON string.

use axum::{extract::State, Json};
use weview_service::dto::{LoginRequest, LogoutQuery, SessionTarget, SignupRequest};
use weview_service::SessionService;

use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Log in with username and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<SessionTarget>> {
    let service = SessionService::new(state.service_context());
    let target = service.login(request).await?;
    Ok(Json(target))
}

/// Log out
///
/// POST /logout?username=
pub async fn logout(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<LogoutQuery>,
) -> ApiResult<Json<SessionTarget>> {
    let service = SessionService::new(state.service_context());
    let target = service.logout(&query.username).await?;
    Ok(Json(target))
}

/// Register a new user and log them in
///
/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<SessionTarget>> {
    let service = SessionService::new(state.service_context());
    let target = service.signup(request).await?;
    Ok(Json(target))
}

/// Enter as a guest
///
/// GET /guest
pub async fn guest(State(state): State<AppState>) -> ApiResult<Json<SessionTarget>> {
    let service = SessionService::new(state.service_context());
    let target = service.guest().await?;
    Ok(Json(target))
}
