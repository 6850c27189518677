pub mod analysis;
pub mod record;

pub use analysis::ResearchAnalysis;
pub use record::{
    CreateResearchInput, ExportFormat, ResearchRecord, UpdateResearchInput,
};
