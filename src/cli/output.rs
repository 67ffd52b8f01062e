//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{NearwordArgs, OutputFormat};
use crate::error::Result;

/// Outcome of matching one word.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordMatch {
    pub word: String,
    pub value: Option<String>,
    pub lexical: Option<String>,
}

/// Result structure for the query command.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResults {
    pub matches: Vec<WordMatch>,
    pub duration_ms: u64,
}

/// Result structure for the insert command.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertResult {
    pub inserted: usize,
    pub duration_ms: u64,
}

/// Result structure for a raw fingerprint lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearestResult {
    pub index: String,
    pub key: serde_json::Value,
    pub word: Option<String>,
}

/// Result structure for the stats command.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResult {
    pub log_path: String,
    pub log_size: String,
    pub value_keys: usize,
    pub lexical_keys: usize,
    pub records_replayed: usize,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &NearwordArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &NearwordArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value.get("matches").and_then(|m| m.as_array()) {
        Some(matches) => output_matches_human(matches),
        None => output_generic_human(&value),
    }
    Ok(())
}

/// One line per matched word.
fn output_matches_human(matches: &[serde_json::Value]) {
    for item in matches {
        let word = item.get("word").and_then(|w| w.as_str()).unwrap_or("");
        let value = item.get("value").and_then(|v| v.as_str()).unwrap_or("-");
        let lexical = item.get("lexical").and_then(|l| l.as_str()).unwrap_or("-");
        println!("{word}: value={value} lexical={lexical}");
    }
}

fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &NearwordArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        serde_json::Value::Object(_) => value.to_string(),
    }
}

/// Format bytes in human-readable format.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
