//! Export renderer: pure functions turning a [`ResearchRecord`] into JSON,
//! CSV, or a plain-text report.
//!
//! The "pdf" format is deliberately a human-readable text report carrying the
//! nominal `application/pdf` mime label; consumers depend on that label, so it
//! is preserved rather than replaced with real PDF bytes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::models::{ExportFormat, ResearchRecord};

/// A rendered export artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
    pub mime_type: String,
}

/// Render a record in the given format, stamping filenames and the report
/// footer with the current time.
pub fn render(record: &ResearchRecord, format: ExportFormat) -> ExportFile {
    render_at(record, format, Utc::now())
}

/// Clock-injected form of [`render`]. Pure: same record, format, and `now`
/// always produce the same artifact.
pub fn render_at(record: &ResearchRecord, format: ExportFormat, now: DateTime<Utc>) -> ExportFile {
    let content = match format {
        ExportFormat::Json => render_json(record),
        ExportFormat::Csv => render_csv(record),
        ExportFormat::Pdf => render_report(record, now),
    };

    ExportFile {
        filename: export_filename(&record.product_name, format, now),
        content,
        mime_type: format.mime_type().to_string(),
    }
}

/// `productName` with every character outside `[A-Za-z0-9]` replaced by `_`,
/// then `_research_YYYY-MM-DD` and the format extension.
pub fn export_filename(product_name: &str, format: ExportFormat, now: DateTime<Utc>) -> String {
    let sanitized: String = product_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!(
        "{}_research_{}.{}",
        sanitized,
        now.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Human-facing timestamp form used by the CSV rows. The JSON export does
/// not go through this: it keeps chrono's full precision so re-parsing the
/// document reproduces the record exactly.
fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn render_json(record: &ResearchRecord) -> String {
    let value = json!({
        "id": record.id,
        "product_name": record.product_name,
        "description": record.description,
        "advantages": record.advantages,
        "disadvantages": record.disadvantages,
        "market_analysis": record.market_analysis,
        "sources": record.sources,
        "research_date": record.research_date,
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    });
    // Object construction above cannot produce non-serializable values.
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Quote a CSV value: double embedded quotes, flatten newlines to a space,
/// drop carriage returns.
fn csv_quote(value: &str) -> String {
    let escaped = value.replace('"', "\"\"").replace('\n', " ").replace('\r', "");
    format!("\"{}\"", escaped)
}

fn render_csv(record: &ResearchRecord) -> String {
    let mut rows = Vec::new();
    rows.push("Field,Value".to_string());

    rows.push(format!("Product Name,{}", csv_quote(&record.product_name)));
    rows.push(format!(
        "Description,{}",
        csv_quote(record.description.as_deref().unwrap_or(""))
    ));
    rows.push(format!(
        "Market Analysis,{}",
        csv_quote(record.market_analysis.as_deref().unwrap_or(""))
    ));
    rows.push(format!("Research Date,{}", csv_quote(&rfc3339(record.research_date))));
    rows.push(format!("Created At,{}", csv_quote(&rfc3339(record.created_at))));
    rows.push(format!("Updated At,{}", csv_quote(&rfc3339(record.updated_at))));

    for (i, advantage) in record.advantages.iter().enumerate() {
        rows.push(format!("Advantage {},{}", i + 1, csv_quote(advantage)));
    }
    for (i, disadvantage) in record.disadvantages.iter().enumerate() {
        rows.push(format!("Disadvantage {},{}", i + 1, csv_quote(disadvantage)));
    }
    for (i, source) in record.sources.iter().enumerate() {
        rows.push(format!("Source {},{}", i + 1, csv_quote(source)));
    }

    rows.join("\n")
}

/// Plain-text report. Sections backed by a null or empty field are omitted
/// entirely, header included.
fn render_report(record: &ResearchRecord, now: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("PRODUCT RESEARCH REPORT".to_string());
    lines.push("========================".to_string());
    lines.push(String::new());

    lines.push(format!("Product Name: {}", record.product_name));
    lines.push(format!(
        "Research Date: {}",
        record.research_date.format("%Y-%m-%d")
    ));
    lines.push(String::new());

    if let Some(description) = &record.description {
        lines.push("DESCRIPTION".to_string());
        lines.push("-----------".to_string());
        lines.push(description.clone());
        lines.push(String::new());
    }

    if !record.advantages.is_empty() {
        lines.push("ADVANTAGES".to_string());
        lines.push("----------".to_string());
        for (i, advantage) in record.advantages.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, advantage));
        }
        lines.push(String::new());
    }

    if !record.disadvantages.is_empty() {
        lines.push("DISADVANTAGES".to_string());
        lines.push("-------------".to_string());
        for (i, disadvantage) in record.disadvantages.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, disadvantage));
        }
        lines.push(String::new());
    }

    if let Some(analysis) = &record.market_analysis {
        lines.push("MARKET ANALYSIS".to_string());
        lines.push("---------------".to_string());
        lines.push(analysis.clone());
        lines.push(String::new());
    }

    if !record.sources.is_empty() {
        lines.push("SOURCES".to_string());
        lines.push("-------".to_string());
        for (i, source) in record.sources.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, source));
        }
        lines.push(String::new());
    }

    lines.push(format!("Generated on: {}", now.format("%Y-%m-%d %H:%M:%S UTC")));

    lines.join("\n")
}
