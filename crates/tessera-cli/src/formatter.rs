//! Output formatters for demo results.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tessera::LifecycleEvent;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// One line of a pub-sub session log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    /// Log entry for a lifecycle event.
    pub fn from_event(event: &LifecycleEvent) -> Self {
        let detail = match event {
            LifecycleEvent::Published { message, .. } | LifecycleEvent::Message { message, .. } => {
                Some(String::from_utf8_lossy(message).into_owned())
            }
            _ => None,
        };

        Self {
            event: event.kind().to_string(),
            channel: event.channel().map(str::to_string),
            detail,
        }
    }

    /// Log entry for an operation the handler refused.
    pub fn rejected(operation: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            event: "rejected".to_string(),
            channel: None,
            detail: Some(format!("{}: {}", operation, reason)),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a list of stored records under a heading.
    fn format_records(&self, heading: &str, records: &[Value]) -> String;

    /// Format a pub-sub session log.
    fn format_log(&self, heading: &str, entries: &[LogEntry]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Plain text formatter.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_records(&self, heading: &str, records: &[Value]) -> String {
        let mut output = heading.to_string();
        for record in records {
            output.push_str("\n  ");
            output.push_str(&record.to_string());
        }
        output
    }

    fn format_log(&self, heading: &str, entries: &[LogEntry]) -> String {
        let mut output = heading.to_string();
        for entry in entries {
            output.push_str("\n  ");
            output.push_str(&entry.event);
            if let Some(channel) = &entry.channel {
                output.push_str(&format!(" [{}]", channel));
            }
            if let Some(detail) = &entry.detail {
                output.push_str(&format!(" {}", detail));
            }
        }
        output
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_records(&self, heading: &str, records: &[Value]) -> String {
        let doc = serde_json::json!({ "summary": heading, "records": records });
        serde_json::to_string_pretty(&doc).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_log(&self, heading: &str, entries: &[LogEntry]) -> String {
        let doc = serde_json::json!({ "summary": heading, "events": entries });
        serde_json::to_string_pretty(&doc).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
