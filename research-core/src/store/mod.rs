//! Record storage: the `ResearchStore` trait plus the Postgres and
//! in-memory implementations.

mod memory;
mod pg;

pub use memory::MemoryResearchStore;
pub use pg::PgResearchStore;

use async_trait::async_trait;

use crate::error::ResearchError;
use crate::models::{CreateResearchInput, ResearchRecord, UpdateResearchInput};

/// Durable CRUD over research records, keyed by integer id.
///
/// Not-found is a value (`None` / `false`), never an error: every call site
/// can tell an absent record from an empty one. Each operation is atomic —
/// an update applies all requested changes plus the `updated_at` refresh, or
/// nothing.
#[async_trait]
pub trait ResearchStore: Send + Sync {
    /// Assign a fresh id, stamp `research_date`/`created_at`/`updated_at`
    /// with the current time, and persist.
    async fn create(&self, input: CreateResearchInput) -> Result<ResearchRecord, ResearchError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<ResearchRecord>, ResearchError>;

    /// All records, most recently created first; ties in insertion order.
    async fn list(&self) -> Result<Vec<ResearchRecord>, ResearchError>;

    /// Apply exactly the fields present in `input` and refresh `updated_at`
    /// (even when `input` is empty). `None` for an unknown id.
    async fn update(
        &self,
        id: i32,
        input: UpdateResearchInput,
    ) -> Result<Option<ResearchRecord>, ResearchError>;

    /// True iff a record existed and was removed. Deleting twice yields
    /// true then false.
    async fn delete(&self, id: i32) -> Result<bool, ResearchError>;
}

/// Apply a partial update to a record in place and refresh `updated_at`.
/// Shared by both store implementations so patch semantics cannot drift.
pub(crate) fn apply_update(
    record: &mut ResearchRecord,
    input: UpdateResearchInput,
    now: chrono::DateTime<chrono::Utc>,
) {
    if let Some(product_name) = input.product_name {
        record.product_name = product_name;
    }
    if let Some(description) = input.description {
        record.description = description;
    }
    if let Some(advantages) = input.advantages {
        record.advantages = advantages;
    }
    if let Some(disadvantages) = input.disadvantages {
        record.disadvantages = disadvantages;
    }
    if let Some(market_analysis) = input.market_analysis {
        record.market_analysis = market_analysis;
    }
    if let Some(sources) = input.sources {
        record.sources = sources;
    }
    record.updated_at = now;
}
