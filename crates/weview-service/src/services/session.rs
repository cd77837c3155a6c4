//! Session service - login, logout, signup and guest entry

use tracing::{info, instrument, warn};
use weview_core::{DomainError, NewUser, User, Username};

use crate::dto::{LoginRequest, SessionTarget, SignupRequest, UserSummary};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Verify credentials and mark the user present
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<SessionTarget> {
        let user = self.find_user(&request.username).await?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &user.password_hash)
            .inspect_err(|_| warn!("Login rejected: invalid password"))?;

        self.ctx.presence_store().login(&user.username).await?;

        info!("User logged in");
        Ok(SessionTarget::user_page(&user.username))
    }

    /// Remove the user's presence record
    #[instrument(skip(self))]
    pub async fn logout(&self, username: &str) -> ServiceResult<SessionTarget> {
        let username = Username::parse(username)
            .map_err(|e| DomainError::InvalidUsername(e.to_string()))?;

        self.ctx.presence_store().logout(&username).await?;

        info!("User logged out");
        Ok(SessionTarget::home())
    }

    /// Create an account and log it in
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<SessionTarget> {
        let username = Username::parse(request.username)
            .map_err(|e| DomainError::InvalidUsername(e.to_string()))?;
        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = User::from_new(
            NewUser {
                username,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                icon: request.icon,
            },
            password_hash,
        );

        if let Err(e) = self.ctx.user_repo().create(&user).await {
            if let DomainError::FieldConstraintViolation { field, .. } = &e {
                warn!(%field, "Signup rejected: field already taken");
            }
            return Err(e.into());
        }

        self.ctx.presence_store().login(&user.username).await?;

        info!("User signed up");
        Ok(SessionTarget::user_page(&user.username))
    }

    /// Allocate a guest id and point at the guest player
    #[instrument(skip(self))]
    pub async fn guest(&self) -> ServiceResult<SessionTarget> {
        let guest_id = self.ctx.guest_counter().next_guest_id().await?;

        info!(guest_id, "Guest session started");
        Ok(SessionTarget::guest_player(guest_id))
    }

    /// Own profile of a logged-in user
    #[instrument(skip(self))]
    pub async fn get_user_data(&self, username: &str) -> ServiceResult<UserSummary> {
        let user = self.logged_in_user(username).await?;
        Ok(UserSummary::with_status(&user, true))
    }

    // ========================================================================
    // Lookups shared with the friend service
    // ========================================================================

    /// Existing user by raw username
    ///
    /// A malformed name cannot belong to anyone and is reported as not found.
    pub(crate) async fn find_user(&self, username: &str) -> ServiceResult<User> {
        let Ok(parsed) = Username::parse(username) else {
            return Err(ServiceError::user_not_found(username));
        };

        self.ctx
            .user_repo()
            .find_by_username(&parsed)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(username))
    }

    /// Existing user that also holds a presence record
    pub(crate) async fn logged_in_user(&self, username: &str) -> ServiceResult<User> {
        let user = self.find_user(username).await?;

        if !self.ctx.presence_store().is_logged_in(&user.username).await? {
            return Err(DomainError::UserNotLoggedIn(user.username).into());
        }

        Ok(user)
    }
}
