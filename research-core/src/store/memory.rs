use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{apply_update, ResearchStore};
use crate::error::ResearchError;
use crate::models::{CreateResearchInput, ResearchRecord, UpdateResearchInput};

/// In-memory store. Backs the test suites and embedded use; ids are a
/// monotonic counter, so iteration order of the map is insertion order.
#[derive(Debug, Default)]
pub struct MemoryResearchStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    records: BTreeMap<i32, ResearchRecord>,
}

impl MemoryResearchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResearchStore for MemoryResearchStore {
    async fn create(&self, input: CreateResearchInput) -> Result<ResearchRecord, ResearchError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.next_id += 1;
        let now = Utc::now();

        let record = ResearchRecord {
            id: inner.next_id,
            product_name: input.product_name,
            description: input.description,
            advantages: input.advantages,
            disadvantages: input.disadvantages,
            market_analysis: input.market_analysis,
            sources: input.sources,
            research_date: now,
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<ResearchRecord>, ResearchError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ResearchRecord>, ResearchError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut records: Vec<ResearchRecord> = inner.records.values().cloned().collect();
        // Stable sort keeps insertion (id) order within equal timestamps.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateResearchInput,
    ) -> Result<Option<ResearchRecord>, ResearchError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        match inner.records.get_mut(&id) {
            Some(record) => {
                apply_update(record, input, Utc::now());
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ResearchError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.records.remove(&id).is_some())
    }
}
