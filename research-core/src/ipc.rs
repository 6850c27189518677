use serde::{Deserialize, Serialize};

use crate::models::{CreateResearchInput, ExportFormat, UpdateResearchInput};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResearchRequest {
    Ping,
    Health,
    Search {
        product_name: String,
    },
    // Inputs stay nested: rmp-serde cannot frame the unknown-length maps
    // that `#[serde(flatten)]` produces.
    Create {
        input: CreateResearchInput,
    },
    Get {
        id: i32,
    },
    List,
    Update {
        id: i32,
        input: UpdateResearchInput,
    },
    Delete {
        id: i32,
    },
    Export {
        id: i32,
        format: ExportFormat,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResearchResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub version: String,
}

impl ResearchResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::err(format!("{} not found", what))
    }

    pub fn pong() -> Self {
        Self::ok(serde_json::json!({"pong": true}))
    }
}
