use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ResearchError;

/// A persisted product-research record.
///
/// The list fields are always materialized (possibly empty), never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub id: i32,
    pub product_name: String,
    pub description: Option<String>,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub market_analysis: Option<String>,
    pub sources: Vec<String>,
    pub research_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a record. Timestamps and the id are
/// assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResearchInput {
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub advantages: Vec<String>,
    #[serde(default)]
    pub disadvantages: Vec<String>,
    #[serde(default)]
    pub market_analysis: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Partial update. A `None` outer value means "leave unchanged". For the
/// nullable scalars the inner `Option` distinguishes an explicit JSON null
/// ("set to NULL") from a value, so `description: null` clears the field
/// while omitting `description` keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResearchInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disadvantages: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_analysis: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl UpdateResearchInput {
    /// True when no field is present. The store still refreshes
    /// `updated_at` for such an update.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && self.advantages.is_none()
            && self.disadvantages.is_none()
            && self.market_analysis.is_none()
            && self.sources.is_none()
    }
}

/// Wraps a deserialized value in `Some` so that, combined with
/// `#[serde(default)]`, a present-but-null field becomes `Some(None)`
/// while an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Supported export formats. Anything else is an invalid-input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            // Nominal label kept for compatibility: the content is a plain
            // text report, not binary PDF.
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ResearchError::InvalidInput(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_input_distinguishes_absent_null_and_value() {
        let absent: UpdateResearchInput = serde_json::from_str("{}").unwrap();
        assert!(absent.description.is_none());
        assert!(absent.is_empty());

        let null: UpdateResearchInput =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));
        assert!(!null.is_empty());

        let value: UpdateResearchInput =
            serde_json::from_str(r#"{"description": "a tool"}"#).unwrap();
        assert_eq!(value.description, Some(Some("a tool".to_string())));
    }

    #[test]
    fn create_input_defaults_lists_to_empty() {
        let input: CreateResearchInput =
            serde_json::from_str(r#"{"product_name": "redis"}"#).unwrap();
        assert_eq!(input.product_name, "redis");
        assert!(input.advantages.is_empty());
        assert!(input.disadvantages.is_empty());
        assert!(input.sources.is_empty());
        assert!(input.description.is_none());
    }

    #[test]
    fn export_format_parses_lowercase_names_only() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert!("JSON".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn export_format_mime_types() {
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
    }
}
