pub mod catalog;
pub mod confidence;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ipc;
pub mod models;
pub mod store;

pub use catalog::{Catalog, CatalogEntry};
pub use confidence::ConfidenceModel;
pub use config::ResearchConfig;
pub use error::ResearchError;
pub use export::{render, render_at, ExportFile};
pub use models::{
    CreateResearchInput, ExportFormat, ResearchAnalysis, ResearchRecord, UpdateResearchInput,
};
pub use store::{MemoryResearchStore, PgResearchStore, ResearchStore};
