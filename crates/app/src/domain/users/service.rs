//! Users service.

use async_trait::async_trait;
use mockall::automock;
use sha2::{Digest, Sha256};

use crate::{
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, User},
        repository::PgUsersRepository,
    },
};

/// Hash a raw API token for storage and lookup.
///
/// Tokens are opaque bearer secrets; only this digest is ever persisted.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, &user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn authenticate_bearer(&self, token: &str) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_token_hash(&mut tx, &hash_token(token))
            .await?;

        tx.commit().await?;

        user.ok_or(UsersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a new user with the given details.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Resolve a raw bearer token to an active user.
    async fn authenticate_bearer(&self, token: &str) -> Result<User, UsersServiceError>;
}
