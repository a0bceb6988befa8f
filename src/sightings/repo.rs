use async_trait::async_trait;
use uuid::Uuid;

use crate::birds::Bird;
use crate::db::{PgStore, RepoError};
use crate::sightings::repo_types::{Sighting, SightingBirdRow};

#[async_trait]
pub trait SightingRepo: Send + Sync {
    /// Insert relying on the `(user_id, bird_id)` unique index. A repeat pair
    /// is `RepoError::Duplicate`, an unknown bird `RepoError::MissingReference`.
    async fn insert_sighting(&self, user_id: Uuid, bird_id: Uuid) -> Result<Sighting, RepoError>;

    async fn find_sighting(&self, id: Uuid) -> anyhow::Result<Option<Sighting>>;

    /// Delete only if `user_id` still owns the row. Returns whether a row went.
    async fn delete_sighting(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<(Sighting, Bird)>>;
}

#[async_trait]
impl SightingRepo for PgStore {
    async fn insert_sighting(&self, user_id: Uuid, bird_id: Uuid) -> Result<Sighting, RepoError> {
        let sighting = sqlx::query_as::<_, Sighting>(
            r#"
            INSERT INTO sightings (user_id, bird_id)
            VALUES ($1, $2)
            RETURNING id, user_id, bird_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(bird_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(sighting)
    }

    async fn find_sighting(&self, id: Uuid) -> anyhow::Result<Option<Sighting>> {
        let sighting = sqlx::query_as::<_, Sighting>(
            r#"
            SELECT id, user_id, bird_id, created_at
            FROM sightings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sighting)
    }

    async fn delete_sighting(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM sightings
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<(Sighting, Bird)>> {
        let rows = sqlx::query_as::<_, SightingBirdRow>(
            r#"
            SELECT s.id, s.user_id, s.created_at,
                   b.id AS bird_id, b.name AS bird_name, b.species AS bird_species,
                   b.created_at AS bird_created_at
            FROM sightings s
            JOIN birds b ON b.id = s.bird_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC, s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
