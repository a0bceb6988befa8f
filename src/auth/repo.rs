use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::{Token, User};
use crate::db::{PgStore, RepoError};

/// Users and their bearer tokens.
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Insert a user. A taken email surfaces as `RepoError::Duplicate`.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, RepoError>;

    /// Exact, case-sensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn create_token(&self, user_id: Uuid, token: &str) -> Result<Token, RepoError>;

    /// Resolve a bearer token to the user that owns it.
    async fn find_user_by_token(&self, token: &str) -> anyhow::Result<Option<User>>;
}

#[async_trait]
impl AccountRepo for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_token(&self, user_id: Uuid, token: &str) -> Result<Token, RepoError> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (user_id, token)
            VALUES ($1, $2)
            RETURNING user_id, token, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(token)
    }

    async fn find_user_by_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at
            FROM tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
