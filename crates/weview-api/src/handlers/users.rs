//! User and friend handlers
//!
//! Endpoints under `/user/:username`. The path user is the subject: the
//! accepter for make-friend and decline-friend, the sender for
//! friend-request.

use axum::{extract::State, Json};
use weview_core::FriendRequestNotification;
use weview_service::dto::{FriendsResponse, SearchFriendQuery, UserSummary};
use weview_service::{FriendService, SessionService};

use crate::extractors::{ApiPath, UserPairPath, UserPath, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Own profile of a logged-in user
///
/// GET /user/:username/user-data
pub async fn user_data(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPath>,
) -> ApiResult<Json<UserSummary>> {
    let service = SessionService::new(state.service_context());
    let summary = service.get_user_data(&path.username).await?;
    Ok(Json(summary))
}

/// Friends with their presence
///
/// GET /user/:username/friends
pub async fn friends(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPath>,
) -> ApiResult<Json<FriendsResponse>> {
    let service = FriendService::new(state.service_context());
    let friends = service.list_friends(&path.username).await?;
    Ok(Json(FriendsResponse { friends }))
}

/// Accept a friend request from `requester`
///
/// POST /user/:username/make-friend/:requester
pub async fn make_friend(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPairPath>,
) -> ApiResult<NoContent> {
    let service = FriendService::new(state.service_context());
    service.accept_friend(&path.other, &path.username).await?;
    Ok(NoContent)
}

/// Decline a friend request from `requester`
///
/// POST /user/:username/decline-friend/:requester
pub async fn decline_friend(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPairPath>,
) -> ApiResult<NoContent> {
    let service = FriendService::new(state.service_context());
    service.decline_friend(&path.other, &path.username).await?;
    Ok(NoContent)
}

/// Send a friend request to `target`
///
/// POST /user/:username/friend-request/:target
pub async fn friend_request(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPairPath>,
) -> ApiResult<NoContent> {
    let service = FriendService::new(state.service_context());
    service.request_friend(&path.username, &path.other).await?;
    Ok(NoContent)
}

/// Look up a user by username or email
///
/// GET /user/:username/search-friend?query=
pub async fn search_friend(
    State(state): State<AppState>,
    ApiPath(_path): ApiPath<UserPath>,
    ValidatedQuery(query): ValidatedQuery<SearchFriendQuery>,
) -> ApiResult<Json<UserSummary>> {
    let service = FriendService::new(state.service_context());
    let summary = service.search_user(&query.query).await?;
    Ok(Json(summary))
}

/// Pending friend requests addressed to the user
///
/// GET /user/:username/friend-requests-notifications
pub async fn friend_requests_notifications(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserPath>,
) -> ApiResult<Json<Vec<FriendRequestNotification>>> {
    let service = FriendService::new(state.service_context());
    let pending = service.list_pending_requests(&path.username).await?;
    Ok(Json(pending))
}
