use std::collections::HashMap;

use crate::confidence::ConfidenceModel;
use crate::models::ResearchAnalysis;

/// A curated, hand-authored analysis for a known product. Curated scores are
/// fixed and sit above the generic band on purpose; they share no clamp with
/// the heuristic.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub market_analysis: String,
    pub sources: Vec<String>,
    pub confidence_score: f64,
}

/// Immutable lookup table from normalized product name to curated analysis,
/// with a heuristic-scored generic fallback for everything else. Constructed
/// once and passed in as a dependency; holds no process-wide state.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<&'static str, CatalogEntry>,
    confidence: ConfidenceModel,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in catalog of curated product analyses.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();

        entries.insert(
            "react",
            CatalogEntry {
                advantages: strings(&[
                    "Large ecosystem and community support",
                    "Component-based architecture for reusability",
                    "Virtual DOM for efficient rendering",
                    "Strong corporate backing from Meta",
                    "Excellent developer tools and debugging support",
                ]),
                disadvantages: strings(&[
                    "Steep learning curve for beginners",
                    "Frequent updates can break compatibility",
                    "JSX syntax requires additional build step",
                    "Large bundle size for simple applications",
                    "Complex state management in large apps",
                ]),
                market_analysis: "React dominates the frontend framework market with over \
                    40% adoption rate among developers. It has strong enterprise adoption \
                    and continues to grow in popularity. The framework is particularly \
                    strong in single-page applications and has excellent job market demand."
                    .to_string(),
                sources: strings(&[
                    "https://github.com/facebook/react",
                    "https://stackoverflow.com/questions/tagged/reactjs",
                    "https://www.reddit.com/r/reactjs",
                    "https://npm-stat.com/charts.html?package=react",
                ]),
                confidence_score: 0.92,
            },
        );

        entries.insert(
            "vue",
            CatalogEntry {
                advantages: strings(&[
                    "Gentle learning curve and beginner-friendly",
                    "Excellent documentation and guides",
                    "Progressive framework - can be adopted incrementally",
                    "Lightweight and fast performance",
                    "Built-in state management and routing solutions",
                ]),
                disadvantages: strings(&[
                    "Smaller ecosystem compared to React",
                    "Less job market demand",
                    "Fewer third-party components available",
                    "Limited corporate backing",
                    "Smaller community size",
                ]),
                market_analysis: "Vue.js has carved out a solid niche in the frontend \
                    ecosystem, particularly popular among developers who want simplicity \
                    without sacrificing power. It has strong adoption in Asia and among \
                    smaller to medium-sized projects."
                    .to_string(),
                sources: strings(&[
                    "https://github.com/vuejs/vue",
                    "https://stackoverflow.com/questions/tagged/vue.js",
                    "https://www.reddit.com/r/vuejs",
                    "https://www.npmjs.com/package/vue",
                ]),
                confidence_score: 0.89,
            },
        );

        entries.insert(
            "angular",
            CatalogEntry {
                advantages: strings(&[
                    "Full-featured framework with everything included",
                    "Strong TypeScript support out of the box",
                    "Excellent for large enterprise applications",
                    "Powerful CLI and development tools",
                    "Google backing and long-term support",
                ]),
                disadvantages: strings(&[
                    "Very steep learning curve",
                    "Heavyweight for simple applications",
                    "Complex architecture can be overkill",
                    "Frequent major version changes",
                    "Verbose syntax and boilerplate code",
                ]),
                market_analysis: "Angular is the enterprise choice for large-scale \
                    applications. While it has lower overall adoption than React, it \
                    maintains strong presence in enterprise environments and has stable \
                    corporate backing from Google."
                    .to_string(),
                sources: strings(&[
                    "https://github.com/angular/angular",
                    "https://stackoverflow.com/questions/tagged/angular",
                    "https://www.reddit.com/r/angular",
                    "https://angular.io/guide/releases",
                ]),
                confidence_score: 0.87,
            },
        );

        Self {
            entries,
            confidence: ConfidenceModel::new(),
        }
    }

    /// Analyze a product name. Lookup is by trimmed, lowercased name; the
    /// returned `product_name` always echoes the original input unmodified.
    /// Pure: never fails, never blocks (the facade adds the simulated
    /// lookup latency).
    pub fn analyze(&self, product_name: &str) -> ResearchAnalysis {
        let normalized = product_name.trim().to_lowercase();

        if let Some(entry) = self.entries.get(normalized.as_str()) {
            return ResearchAnalysis {
                product_name: product_name.to_string(),
                advantages: entry.advantages.clone(),
                disadvantages: entry.disadvantages.clone(),
                market_analysis: Some(entry.market_analysis.clone()),
                sources: entry.sources.clone(),
                confidence_score: entry.confidence_score,
            };
        }

        self.generic_analysis(product_name, &normalized)
    }

    fn generic_analysis(&self, original: &str, normalized: &str) -> ResearchAnalysis {
        let encoded = urlencoding::encode(normalized);

        ResearchAnalysis {
            product_name: original.to_string(),
            advantages: strings(&[
                "Active development and updates",
                "Community support available",
                "Documentation exists",
                "Open source or commercial backing",
            ]),
            disadvantages: strings(&[
                "Limited information available",
                "Smaller community compared to major tools",
                "Potential learning curve",
                "May have compatibility limitations",
            ]),
            market_analysis: Some(format!(
                "Limited market analysis available for {}. This appears to be a less \
                 commonly discussed product in major developer communities. Further \
                 research would be needed to provide detailed market insights.",
                original
            )),
            sources: vec![
                format!("https://github.com/search?q={}", encoded),
                format!("https://stackoverflow.com/search?q={}", encoded),
                format!("https://www.reddit.com/search/?q={}", encoded),
            ],
            confidence_score: self.confidence.score_normalized(normalized),
        }
    }
}
