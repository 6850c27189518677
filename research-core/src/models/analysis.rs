use serde::{Deserialize, Serialize};

use super::record::CreateResearchInput;

/// An ephemeral search result. Never persisted directly: callers convert it
/// into a [`CreateResearchInput`] when they want to keep it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchAnalysis {
    pub product_name: String,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub market_analysis: Option<String>,
    pub sources: Vec<String>,
    /// Self-reported reliability in [0.0, 1.0]; higher is more reliable.
    pub confidence_score: f64,
}

impl ResearchAnalysis {
    /// Convert into a create request, dropping the confidence score.
    pub fn into_create_input(self) -> CreateResearchInput {
        CreateResearchInput {
            product_name: self.product_name,
            description: None,
            advantages: self.advantages,
            disadvantages: self.disadvantages,
            market_analysis: self.market_analysis,
            sources: self.sources,
        }
    }
}
