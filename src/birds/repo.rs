use async_trait::async_trait;
use uuid::Uuid;

use crate::birds::repo_types::Bird;
use crate::db::PgStore;

#[async_trait]
pub trait BirdRepo: Send + Sync {
    async fn find_bird(&self, id: Uuid) -> anyhow::Result<Option<Bird>>;
    async fn list_birds(&self) -> anyhow::Result<Vec<Bird>>;
}

#[async_trait]
impl BirdRepo for PgStore {
    async fn find_bird(&self, id: Uuid) -> anyhow::Result<Option<Bird>> {
        let bird = sqlx::query_as::<_, Bird>(
            r#"
            SELECT id, name, species, created_at
            FROM birds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bird)
    }

    async fn list_birds(&self) -> anyhow::Result<Vec<Bird>> {
        let rows = sqlx::query_as::<_, Bird>(
            r#"
            SELECT id, name, species, created_at
            FROM birds
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
