use crate::errors::AppError;
use crate::webhook_models::PropertyRow;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Row-store boundary for property listings.
///
/// The ingestion path only ever appends rows; reads belong to the site,
/// not to this service. Tests substitute an in-memory implementation.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Append one listing row to the named table.
    async fn insert(&self, table: &str, row: &PropertyRow) -> Result<(), AppError>;
}

/// PostgreSQL-backed listing store.
pub struct PgPropertyStore {
    pool: PgPool,
}

impl PgPropertyStore {
    /// Connect a pool and verify the database answers.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn insert(&self, table: &str, row: &PropertyRow) -> Result<(), AppError> {
        // `table` comes from Config, which restricts it to identifier
        // characters; all field values are bound parameters.
        let statement = format!(
            r#"
            INSERT INTO {table}
                (title, address, "type", size, price, image_url, description, featured, mls, received_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#
        );

        sqlx::query(&statement)
            .bind(&row.title)
            .bind(&row.address)
            .bind(&row.property_type)
            .bind(&row.size)
            .bind(&row.price)
            .bind(&row.image_url)
            .bind(&row.description)
            .bind(row.featured)
            .bind(&row.mls)
            .bind(row.received_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored property row: {}", row.title);
        Ok(())
    }
}
