//! PostgreSQL-backed remember-me token repository
//!
//! Records live in the `rememberme` table created by the migrations shipped
//! with this crate. Replacing a user's tokens runs in one transaction.

use crate::{
    error::Result,
    models::RememberMeRecord,
    repository::RememberMeRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{debug, info};

/// PostgreSQL-backed token repository
#[derive(Debug, Clone)]
pub struct PostgresRememberMeRepository {
    pool: PgPool,
}

impl PostgresRememberMeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create with connection string
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        info!("Remember-me database pool created");
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const INSERT: &str = r#"
    INSERT INTO rememberme (username, private_key, public_key, ctime, mtime)
    VALUES ($1, $2, $3, $4, $5)
"#;

const DELETE_BY_USERNAME: &str = "DELETE FROM rememberme WHERE username = $1";

#[async_trait]
impl RememberMeRepository for PostgresRememberMeRepository {
    async fn insert(&self, record: &RememberMeRecord) -> Result<()> {
        sqlx::query(INSERT)
            .bind(&record.username)
            .bind(&record.private_key)
            .bind(&record.public_key)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await?;

        debug!(username = %record.username, "Remember-me token stored");
        Ok(())
    }

    async fn find_by_public_key(&self, public_key: &str) -> Result<Option<RememberMeRecord>> {
        let record = sqlx::query_as::<_, RememberMeRecord>(
            r#"
            SELECT username, private_key, public_key, ctime, mtime
            FROM rememberme
            WHERE public_key = $1
            "#,
        )
        .bind(public_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64> {
        let result = sqlx::query(DELETE_BY_USERNAME)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn replace_for_user(&self, record: &RememberMeRecord) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(DELETE_BY_USERNAME)
            .bind(&record.username)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query(INSERT)
            .bind(&record.username)
            .bind(&record.private_key)
            .bind(&record.public_key)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(username = %record.username, removed, "Remember-me tokens replaced");
        Ok(removed)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM rememberme WHERE ctime < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
