use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{apply_update, ResearchStore};
use crate::error::ResearchError;
use crate::models::{CreateResearchInput, ResearchRecord, UpdateResearchInput};

/// Postgres-backed store. List fields live in JSONB columns; see
/// [`crate::db::ensure_schema`] for the table definition.
#[derive(Debug, Clone)]
pub struct PgResearchStore {
    pool: PgPool,
}

impl PgResearchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ResearchRow {
    id: i32,
    product_name: String,
    description: Option<String>,
    advantages: Json<Vec<String>>,
    disadvantages: Json<Vec<String>>,
    market_analysis: Option<String>,
    sources: Json<Vec<String>>,
    research_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResearchRow> for ResearchRecord {
    fn from(row: ResearchRow) -> Self {
        Self {
            id: row.id,
            product_name: row.product_name,
            description: row.description,
            advantages: row.advantages.0,
            disadvantages: row.disadvantages.0,
            market_analysis: row.market_analysis,
            sources: row.sources.0,
            research_date: row.research_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, product_name, description, advantages, disadvantages, \
                       market_analysis, sources, research_date, created_at, updated_at";

#[async_trait]
impl ResearchStore for PgResearchStore {
    async fn create(&self, input: CreateResearchInput) -> Result<ResearchRecord, ResearchError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO product_research \
             (product_name, description, advantages, disadvantages, market_analysis, \
              sources, research_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $7) \
             RETURNING {COLUMNS}"
        );
        let row: ResearchRow = sqlx::query_as(&sql)
            .bind(&input.product_name)
            .bind(&input.description)
            .bind(Json(&input.advantages))
            .bind(Json(&input.disadvantages))
            .bind(&input.market_analysis)
            .bind(Json(&input.sources))
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(id = row.id, product = %row.product_name, "created research record");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<ResearchRecord>, ResearchError> {
        let sql = format!("SELECT {COLUMNS} FROM product_research WHERE id = $1");
        let row: Option<ResearchRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<ResearchRecord>, ResearchError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM product_research ORDER BY created_at DESC, id ASC"
        );
        let rows: Vec<ResearchRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateResearchInput,
    ) -> Result<Option<ResearchRecord>, ResearchError> {
        // Read-modify-write under a row lock so a partial update is
        // all-or-nothing.
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {COLUMNS} FROM product_research WHERE id = $1 FOR UPDATE");
        let row: Option<ResearchRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let mut record: ResearchRecord = match row {
            Some(row) => row.into(),
            None => return Ok(None),
        };

        apply_update(&mut record, input, Utc::now());

        sqlx::query(
            "UPDATE product_research \
             SET product_name = $2, description = $3, advantages = $4, \
                 disadvantages = $5, market_analysis = $6, sources = $7, \
                 updated_at = $8 \
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(&record.product_name)
        .bind(&record.description)
        .bind(Json(&record.advantages))
        .bind(Json(&record.disadvantages))
        .bind(&record.market_analysis)
        .bind(Json(&record.sources))
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(id, "updated research record");
        Ok(Some(record))
    }

    async fn delete(&self, id: i32) -> Result<bool, ResearchError> {
        let result = sqlx::query("DELETE FROM product_research WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(id, "deleted research record");
        }
        Ok(deleted)
    }
}
