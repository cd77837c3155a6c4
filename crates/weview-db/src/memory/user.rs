//! In-memory implementation of UserRepository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use weview_core::entities::User;
use weview_core::error::{DomainError, UserField};
use weview_core::traits::{RepoResult, UserRepository};
use weview_core::value_objects::Username;

/// In-memory user repository
///
/// Usernames and emails are both unique. The username entry is claimed first
/// so a signup clashing on both fields reports `username`.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: DashMap<Username, User>,
    emails: DashMap<String, Username>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> RepoResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        // release the email shard before touching the users map
        let username = match self.emails.get(email) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        Ok(self.users.get(&username).map(|u| u.value().clone()))
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let violation = |field| DomainError::FieldConstraintViolation {
            field,
            user: Box::new(user.clone()),
        };

        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(violation(UserField::Username)),
            Entry::Vacant(user_slot) => match self.emails.entry(user.email.clone()) {
                Entry::Occupied(_) => Err(violation(UserField::Email)),
                Entry::Vacant(email_slot) => {
                    email_slot.insert(user.username.clone());
                    user_slot.insert(user.clone());
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weview_core::entities::NewUser;

    fn user(username: &str, email: &str) -> User {
        User::from_new(
            NewUser {
                username: Username::parse(username).unwrap(),
                email: email.to_string(),
                first_name: "First".to_string(),
                last_name: "Last".to_string(),
                icon: None,
            },
            "hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryUserRepository::new();
        let alice = user("alice", "alice@example.com");
        repo.create(&alice).await.unwrap();

        assert_eq!(repo.find_by_username(&alice.username).await.unwrap(), Some(alice.clone()));
        assert_eq!(repo.find_by_email("alice@example.com").await.unwrap(), Some(alice.clone()));
        assert_eq!(repo.find_by_email("nobody@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = MemoryUserRepository::new();
        repo.create(&user("carol", "carol@example.com")).await.unwrap();

        let err = repo
            .create(&user("carol", "carol@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::FieldConstraintViolation { field: UserField::Username, .. }
        ));
        let stored = repo.find_by_username(&Username::parse("carol").unwrap()).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = MemoryUserRepository::new();
        repo.create(&user("carol", "shared@example.com")).await.unwrap();

        let err = repo
            .create(&user("dave", "shared@example.com"))
            .await
            .unwrap_err();
        match err {
            DomainError::FieldConstraintViolation { field, user } => {
                assert_eq!(field, UserField::Email);
                assert_eq!(user.username.as_str(), "dave");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let dave = Username::parse("dave").unwrap();
        assert!(repo.find_by_username(&dave).await.unwrap().is_none());
    }
}
