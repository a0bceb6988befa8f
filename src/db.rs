use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        info!("migrations applied");
        Ok(())
    }
}

/// Failure of a write that can trip a table constraint.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated")]
    Duplicate,
    #[error("referenced row does not exist")]
    MissingReference,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match sqlstate(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => RepoError::Duplicate,
            Some(FOREIGN_KEY_VIOLATION) => RepoError::MissingReference,
            _ => RepoError::Other(err.into()),
        }
    }
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}
