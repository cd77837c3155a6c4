//! PostgreSQL implementation of FriendGraphStore
//!
//! Every mutation is a single `INSERT .. ON CONFLICT` or `DELETE`, so
//! concurrent requests on the same pair never observe a partial write.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use weview_core::entities::FriendRequestNotification;
use weview_core::traits::{FriendGraphStore, RepoResult};
use weview_core::value_objects::Username;

use crate::mappers::parse_username;
use crate::models::FriendRequestModel;

use super::error::{
    map_db_error, map_graph_error, FRIENDSHIP_FRIEND_FK, FRIENDSHIP_OWNER_FK, REQUEST_REQUESTER_FK,
    REQUEST_TARGET_FK,
};

/// PostgreSQL implementation of FriendGraphStore
#[derive(Clone)]
pub struct PgFriendGraphStore {
    pool: PgPool,
}

impl PgFriendGraphStore {
    /// Create a new PgFriendGraphStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendGraphStore for PgFriendGraphStore {
    #[instrument(skip(self, request), fields(requester = %request.requester_username))]
    async fn upsert_request(
        &self,
        target: &Username,
        request: &FriendRequestNotification,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO friend_requests (target_username, requester_username, message, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (target_username, requester_username)
            DO UPDATE SET message = EXCLUDED.message, created_at = EXCLUDED.created_at
            ",
        )
        .bind(target.as_str())
        .bind(request.requester_username.as_str())
        .bind(&request.message)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_graph_error(
                e,
                &[
                    (REQUEST_TARGET_FK, target.as_str()),
                    (REQUEST_REQUESTER_FK, request.requester_username.as_str()),
                ],
            )
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_request(&self, target: &Username, requester: &Username) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM friend_requests
            WHERE target_username = $1 AND requester_username = $2
            ",
        )
        .bind(target.as_str())
        .bind(requester.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn add_friend(&self, owner: &Username, friend: &Username) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO friendships (owner_username, friend_username)
            VALUES ($1, $2)
            ON CONFLICT (owner_username, friend_username) DO NOTHING
            ",
        )
        .bind(owner.as_str())
        .bind(friend.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_graph_error(
                e,
                &[
                    (FRIENDSHIP_OWNER_FK, owner.as_str()),
                    (FRIENDSHIP_FRIEND_FK, friend.as_str()),
                ],
            )
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn friends(&self, owner: &Username) -> RepoResult<BTreeSet<Username>> {
        let rows = sqlx::query_scalar::<_, String>(
            r"
            SELECT friend_username
            FROM friendships
            WHERE owner_username = $1
            ",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(parse_username).collect()
    }

    #[instrument(skip(self))]
    async fn pending_requests(
        &self,
        target: &Username,
    ) -> RepoResult<Vec<FriendRequestNotification>> {
        let rows = sqlx::query_as::<_, FriendRequestModel>(
            r"
            SELECT target_username, requester_username, message, created_at
            FROM friend_requests
            WHERE target_username = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(target.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter()
            .map(FriendRequestNotification::try_from)
            .collect()
    }
}
