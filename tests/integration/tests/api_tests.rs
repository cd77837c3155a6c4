//! API Integration Tests
//!
//! Run against in-memory backends; no external services are needed.
//! `test_backed_*` tests additionally run against PostgreSQL and Redis when
//! `DATABASE_URL` and `REDIS_URL` are set.
//!
//! Run with: cargo test -p weview-integration-tests --test api_tests

use reqwest::StatusCode;
use serde_json::Value;
use weview_integration_tests::{
    assert_json, assert_status, backed_config, fixtures::*, TestServer,
};

async fn signup(server: &TestServer, name: &str) -> SignupRequest {
    let request = SignupRequest::named(name);
    let response = server.post("/signup", &request).await.unwrap();
    let target: String = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(target, format!("/user/{name}"));
    request
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_login_logout_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let alice = signup(&server, "alice").await;

    // signup logs in
    let response = server.get("/user/alice/user-data").await.unwrap();
    let me: UserSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.email, alice.email);
    assert_eq!(me.is_logged_in, Some(true));

    let response = server.post_empty("/logout?username=alice").await.unwrap();
    let target: String = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(target, "/");

    // second logout fails
    let response = server.post_empty("/logout?username=alice").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "USER_NOT_LOGGED_IN");

    let response = server.get("/user/alice/user-data").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post("/login", &LoginRequest::from_signup(&alice))
        .await
        .unwrap();
    let target: String = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(target, "/user/alice");
}

#[tokio::test]
async fn test_login_errors() {
    let server = TestServer::start().await.unwrap();
    let alice = signup(&server, "alice").await;

    let response = server
        .post(
            "/login",
            &LoginRequest {
                username: "nobody".to_string(),
                password: "whatever".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "USER_NOT_FOUND");

    let response = server
        .post(
            "/login",
            &LoginRequest {
                username: alice.username,
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "INVALID_PASSWORD");
}

#[tokio::test]
async fn test_duplicate_signup_reports_field() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "carol").await;

    let response = server.post("/signup", &SignupRequest::named("carol")).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "FIELD_CONSTRAINT_VIOLATION");

    let details = err.error.details.expect("violation details");
    assert_eq!(details["violatingField"], "username");
    assert_eq!(details["violatingUser"]["username"], "carol");

    // same email, new username
    let mut request = SignupRequest::named("carol2");
    request.email = "carol@example.com".to_string();
    let response = server.post("/signup", &request).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.details.unwrap()["violatingField"], "email");
}

#[tokio::test]
async fn test_guest_ids() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/guest").await.unwrap();
    let first: String = assert_json(response, StatusCode::OK).await.unwrap();
    let response = server.get("/guest").await.unwrap();
    let second: String = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(first, "/1/player");
    assert_eq!(second, "/2/player");
}

// ============================================================================
// Friend Tests
// ============================================================================

#[tokio::test]
async fn test_alice_bob_friendship() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "alice").await;
    signup(&server, "bob").await;

    let response = server.post_empty("/user/alice/friend-request/bob").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get("/user/bob/friend-requests-notifications")
        .await
        .unwrap();
    let pending: Vec<FriendRequestNotification> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].requester_username, "alice");

    let response = server.post_empty("/user/bob/make-friend/alice").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    for (user, friend) in [("alice", "bob"), ("bob", "alice")] {
        let response = server.get(&format!("/user/{user}/friends")).await.unwrap();
        let list: FriendsResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(list.friends.len(), 1);
        assert_eq!(list.friends[0].username, friend);
        assert_eq!(list.friends[0].is_logged_in, Some(true));
    }

    let response = server
        .get("/user/bob/friend-requests-notifications")
        .await
        .unwrap();
    let pending: Vec<FriendRequestNotification> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pending.is_empty());

    // presence shows through the friend list
    server.post_empty("/logout?username=bob").await.unwrap();
    let response = server.get("/user/alice/friends").await.unwrap();
    let list: FriendsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.friends[0].is_logged_in, Some(false));
}

#[tokio::test]
async fn test_decline_friend() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "alice").await;
    signup(&server, "bob").await;

    // nothing pending is not an error
    let response = server.post_empty("/user/bob/decline-friend/alice").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    server.post_empty("/user/alice/friend-request/bob").await.unwrap();
    let response = server.post_empty("/user/bob/decline-friend/alice").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get("/user/bob/friend-requests-notifications")
        .await
        .unwrap();
    let pending: Vec<FriendRequestNotification> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pending.is_empty());

    let response = server.get("/user/bob/friends").await.unwrap();
    let list: FriendsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.friends.is_empty());
}

#[tokio::test]
async fn test_friend_request_errors() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "alice").await;

    let response = server.post_empty("/user/alice/friend-request/ghost").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "USER_NOT_FOUND");

    let response = server.post_empty("/user/alice/friend-request/alice").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "INVALID_OPERATION");

    let response = server.get("/user/ghost/friends").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_search_friend() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "alice").await;
    signup(&server, "bob").await;

    let response = server.get("/user/alice/search-friend?query=bob").await.unwrap();
    let found: UserSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(found.username, "bob");
    assert_eq!(found.is_logged_in, None);

    let response = server
        .get("/user/alice/search-friend?searchParam=bob@example.com")
        .await
        .unwrap();
    let found: UserSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(found.username, "bob");

    let response = server.get("/user/alice/search-friend?query=nobody").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "USER_NOT_FOUND");
}

// ============================================================================
// Backed Tests
// ============================================================================

#[tokio::test]
async fn test_backed_friendship() {
    let Some(config) = backed_config() else {
        return;
    };

    let server = TestServer::start_with_config(config).await.unwrap();
    let alice = unique_name("alice");
    let bob = unique_name("bob");
    signup(&server, &alice).await;
    signup(&server, &bob).await;

    let response = server
        .post_empty(&format!("/user/{alice}/friend-request/{bob}"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post_empty(&format!("/user/{bob}/make-friend/{alice}"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/user/{alice}/friends")).await.unwrap();
    let list: FriendsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.friends[0].username, bob);

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
