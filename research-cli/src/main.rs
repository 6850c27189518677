//! research-cli — command-line frontend for the product-research HTTP API
//!
//! # Subcommands
//! - `search <name> [--json] [--save]` — analyze a product, optionally persist
//! - `list [--json]`                   — saved records, newest first
//! - `show <id>`                       — one record
//! - `update <id> [--name ..] [--description ..] [--clear-description]` — edit fields
//! - `delete <id>`                     — remove a record
//! - `export <id> --format <fmt> [-o <path>]` — write json/csv/pdf export
//! - `status`                          — server health

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8790";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "research-cli",
    version,
    about = "Product research records — search, persist, export"
)]
struct Cli {
    /// Research HTTP server URL (overrides RESEARCH_HTTP_URL env var)
    #[arg(long, env = "RESEARCH_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a product name
    Search {
        /// Product name to analyze
        name: String,

        /// Output the raw analysis as JSON
        #[arg(long)]
        json: bool,

        /// Persist the analysis as a research record
        #[arg(long)]
        save: bool,
    },

    /// List saved research records, newest first
    List {
        /// Output the raw record list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one saved record
    Show {
        /// Record id
        id: i32,
    },

    /// Update fields of a saved record; omitted fields are left unchanged
    Update {
        /// Record id
        id: i32,

        /// New product name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Clear the description (sends an explicit null)
        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a saved record
    Delete {
        /// Record id
        id: i32,
    },

    /// Export a saved record to a file
    Export {
        /// Record id
        id: i32,

        /// Export format: json, csv, or pdf
        #[arg(short, long)]
        format: String,

        /// Output path (defaults to the server-generated filename)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show research server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Analysis {
    product_name: String,
    advantages: Vec<String>,
    disadvantages: Vec<String>,
    market_analysis: Option<String>,
    sources: Vec<String>,
    confidence_score: f64,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: i32,
    product_name: String,
    description: Option<String>,
    advantages: Vec<String>,
    disadvantages: Vec<String>,
    market_analysis: Option<String>,
    sources: Vec<String>,
    research_date: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<Record>,
    count: usize,
}

// ============================================================================
// Output Formatting
// ============================================================================

/// One-line summary used by `list` output.
fn record_summary(record: &Record) -> String {
    format!(
        "#{:<4} {:<30} updated {}",
        record.id, record.product_name, record.updated_at
    )
}

fn print_analysis(analysis: &Analysis) {
    println!("Product:    {}", analysis.product_name);
    println!("Confidence: {:.0}%", analysis.confidence_score * 100.0);
    if let Some(text) = &analysis.market_analysis {
        println!("\n{}", text);
    }
    println!("\nAdvantages:");
    for (i, item) in analysis.advantages.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
    println!("\nDisadvantages:");
    for (i, item) in analysis.disadvantages.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
    println!("\nSources:");
    for (i, item) in analysis.sources.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
}

fn print_record(record: &Record) {
    println!("Id:          {}", record.id);
    println!("Product:     {}", record.product_name);
    if let Some(description) = &record.description {
        println!("Description: {}", description);
    }
    println!("Researched:  {}", record.research_date);
    if let Some(text) = &record.market_analysis {
        println!("\n{}", text);
    }
    if !record.advantages.is_empty() {
        println!("\nAdvantages:");
        for (i, item) in record.advantages.iter().enumerate() {
            println!("  {}. {}", i + 1, item);
        }
    }
    if !record.disadvantages.is_empty() {
        println!("\nDisadvantages:");
        for (i, item) in record.disadvantages.iter().enumerate() {
            println!("  {}. {}", i + 1, item);
        }
    }
    if !record.sources.is_empty() {
        println!("\nSources:");
        for (i, item) in record.sources.iter().enumerate() {
            println!("  {}. {}", i + 1, item);
        }
    }
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

fn fail_on_http_error(resp: reqwest::blocking::Response) -> reqwest::blocking::Response {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("research-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }
    resp
}

fn do_search(server: &str, name: &str, json_output: bool, save: bool) -> anyhow::Result<()> {
    let client = client()?;
    let url = format!("{}/search", server);
    let body = serde_json::json!({ "product_name": name });

    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("research-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };
    let resp = fail_on_http_error(resp);

    let raw: serde_json::Value = resp.json()?;
    let analysis: Analysis = serde_json::from_value(raw.clone())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&raw)?);
    } else {
        print_analysis(&analysis);
    }

    if save {
        let mut create = raw;
        // confidence is not a record field
        if let Some(obj) = create.as_object_mut() {
            obj.remove("confidence_score");
        }
        let resp = client
            .post(format!("{}/research", server))
            .json(&create)
            .send()?;
        let resp = fail_on_http_error(resp);
        let record: Record = resp.json()?;
        eprintln!("\nSaved as record #{}", record.id);
    }

    Ok(())
}

fn do_list(server: &str, json_output: bool) -> anyhow::Result<()> {
    let client = client()?;
    let resp = client.get(format!("{}/research", server)).send()?;
    let resp = fail_on_http_error(resp);

    if json_output {
        let raw: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let list: ListResponse = resp.json()?;
    if list.records.is_empty() {
        eprintln!("No saved research records");
        return Ok(());
    }
    for record in &list.records {
        println!("{}", record_summary(record));
    }
    eprintln!("\n{} record(s)", list.count);
    Ok(())
}

fn do_show(server: &str, id: i32) -> anyhow::Result<()> {
    let client = client()?;
    let resp = client.get(format!("{}/research/{}", server, id)).send()?;
    let resp = fail_on_http_error(resp);
    let record: Record = resp.json()?;
    print_record(&record);
    Ok(())
}

/// Build the PATCH body. Only named fields appear; clearing the description
/// sends an explicit null so the server sets NULL rather than skipping the
/// field.
fn update_body(
    name: Option<&str>,
    description: Option<&str>,
    clear_description: bool,
) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    if let Some(name) = name {
        body.insert("product_name".to_string(), serde_json::json!(name));
    }
    if clear_description {
        body.insert("description".to_string(), serde_json::Value::Null);
    } else if let Some(description) = description {
        body.insert("description".to_string(), serde_json::json!(description));
    }
    serde_json::Value::Object(body)
}

fn do_update(
    server: &str,
    id: i32,
    name: Option<String>,
    description: Option<String>,
    clear_description: bool,
) -> anyhow::Result<()> {
    let body = update_body(name.as_deref(), description.as_deref(), clear_description);
    if body.as_object().map_or(true, |o| o.is_empty()) {
        eprintln!("research-cli: nothing to update (pass --name, --description, or --clear-description)");
        std::process::exit(1);
    }

    let client = client()?;
    let resp = client
        .patch(format!("{}/research/{}", server, id))
        .json(&body)
        .send()?;
    let resp = fail_on_http_error(resp);
    let record: Record = resp.json()?;
    println!("Updated record #{}", record.id);
    print_record(&record);
    Ok(())
}

fn do_delete(server: &str, id: i32) -> anyhow::Result<()> {
    let client = client()?;
    let resp = client
        .delete(format!("{}/research/{}", server, id))
        .send()?;
    let resp = fail_on_http_error(resp);
    let body: serde_json::Value = resp.json()?;
    if body["deleted"].as_bool().unwrap_or(false) {
        println!("Deleted record #{}", id);
    } else {
        eprintln!("research-cli: no record #{} to delete", id);
        std::process::exit(1);
    }
    Ok(())
}

fn do_export(server: &str, id: i32, format: &str, output: Option<String>) -> anyhow::Result<()> {
    let client = client()?;
    let resp = client
        .get(format!("{}/research/{}/export", server, id))
        .query(&[("format", format)])
        .send()?;
    let resp = fail_on_http_error(resp);

    // Server names the file via Content-Disposition
    let server_filename = resp
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split("filename=\"").nth(1))
        .and_then(|v| v.strip_suffix('"'))
        .map(str::to_string);

    let path = output
        .or(server_filename)
        .unwrap_or_else(|| format!("research_{}.{}", id, format));

    let content = resp.text()?;
    let mut file = std::fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    println!("Wrote {}", path);
    Ok(())
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let client = client()?;
    let url = format!("{}/health", server);

    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Research server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:         {}", body["version"].as_str().unwrap_or("?"));
            println!(
                "PostgreSQL:      {}",
                body["postgresql"].as_str().unwrap_or("n/a")
            );
        }
        Ok(r) => {
            eprintln!("research-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("research-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Search { name, json, save } => do_search(&server, &name, json, save),
        Commands::List { json } => do_list(&server, json),
        Commands::Show { id } => do_show(&server, id),
        Commands::Update {
            id,
            name,
            description,
            clear_description,
        } => do_update(&server, id, name, description, clear_description),
        Commands::Delete { id } => do_delete(&server, id),
        Commands::Export { id, format, output } => do_export(&server, id, &format, output),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("research-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_record(id: i32, name: &str) -> Record {
        Record {
            id,
            product_name: name.to_string(),
            description: None,
            advantages: vec![],
            disadvantages: vec![],
            market_analysis: None,
            sources: vec![],
            research_date: "2026-08-01T00:00:00Z".to_string(),
            updated_at: "2026-08-02T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn summary_line_includes_id_name_and_update_time() {
        let line = record_summary(&mock_record(7, "react"));
        assert!(line.starts_with("#7"));
        assert!(line.contains("react"));
        assert!(line.contains("2026-08-02T00:00:00Z"));
    }

    #[test]
    fn update_body_includes_only_named_fields() {
        let body = update_body(Some("valkey"), None, false);
        assert_eq!(body, serde_json::json!({"product_name": "valkey"}));

        let body = update_body(None, Some("a cache"), false);
        assert_eq!(body, serde_json::json!({"description": "a cache"}));

        // untouched fields are absent, not null
        assert!(body.get("product_name").is_none());
    }

    #[test]
    fn update_body_clear_sends_explicit_null() {
        let body = update_body(None, None, true);
        assert_eq!(body, serde_json::json!({"description": null}));
        assert!(body["description"].is_null());
    }

    #[test]
    fn update_body_with_no_flags_is_empty() {
        let body = update_body(None, None, false);
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn analysis_parses_from_api_shape() {
        let json = serde_json::json!({
            "product_name": "react",
            "advantages": ["a"],
            "disadvantages": ["d"],
            "market_analysis": null,
            "sources": ["https://example.com"],
            "confidence_score": 0.92,
        });
        let analysis: Analysis = serde_json::from_value(json).unwrap();
        assert_eq!(analysis.product_name, "react");
        assert!(analysis.market_analysis.is_none());
        assert_eq!(analysis.confidence_score, 0.92);
    }
}
