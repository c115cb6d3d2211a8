//! Demo subcommands.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tessera::pubsub::EventKind;
use tessera::{
    Catalog, ConfigManager, ConfigStatus, Entity, MemoryBroker, Mode, PubSubHandler, Versioned,
};

use crate::error::CliError;
use crate::formatter::{create_formatter, LogEntry, OutputFormat};

/// A catalog entity with arbitrary extra fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogItem {
    id: i64,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Entity for CatalogItem {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A config record with arbitrary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigRecord {
    version: i64,
    #[serde(default)]
    status: ConfigStatus,
    #[serde(flatten)]
    settings: Map<String, Value>,
}

impl Versioned for ConfigRecord {
    fn version(&self) -> i64 {
        self.version
    }

    fn status(&self) -> ConfigStatus {
        self.status
    }

    fn set_status(&mut self, status: ConfigStatus) {
        self.status = status;
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn to_values<'a, T, I>(records: I) -> Result<Vec<Value>, CliError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .map(|record| serde_json::to_value(record).map_err(CliError::from))
        .collect()
}

/// Load entities into a catalog and list them in identity order.
pub fn run_catalog(path: &Path, format: OutputFormat) -> Result<String, CliError> {
    let items: Vec<CatalogItem> = load(path)?;
    let catalog = Catalog::from_items(&items)?;
    tracing::info!(entities = catalog.len(), "catalog loaded");

    let records = to_values(catalog.iter())?;
    let heading = format!("{} entities", catalog.len());
    Ok(create_formatter(format).format_records(&heading, &records))
}

/// Load config records, optionally activate one, and list them.
pub fn run_config(
    path: &Path,
    activate: Option<i64>,
    format: OutputFormat,
) -> Result<String, CliError> {
    let records: Vec<ConfigRecord> = load(path)?;
    let mut manager = ConfigManager::new();
    for record in &records {
        manager.add(record)?;
    }

    if let Some(version) = activate {
        manager.activate(version)?;
    }
    tracing::info!(
        records = manager.len(),
        active = ?manager.active_version(),
        "config loaded"
    );

    let heading = match manager.active_version() {
        Some(version) => format!("{} records, active version {}", manager.len(), version),
        None => format!("{} records, no active version", manager.len()),
    };
    let values = to_values(manager.get_all().iter())?;
    Ok(create_formatter(format).format_records(&heading, &values))
}

/// Drive a loopback handler through a full session and report what happened.
///
/// Operations the mode forbids are attempted anyway and logged as rejected.
pub async fn run_pubsub(
    mode: Mode,
    channel: &str,
    messages: &[String],
    format: OutputFormat,
) -> Result<String, CliError> {
    let broker = MemoryBroker::new();
    let handler = PubSubHandler::builder()
        .mode(mode)
        .transport(broker.transport())
        .build()?;

    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        EventKind::Connected,
        EventKind::Subscribed,
        EventKind::Published,
        EventKind::Message,
        EventKind::Unsubscribed,
        EventKind::Disconnected,
    ] {
        let log = Arc::clone(&log);
        handler.on(kind, move |event| log.lock().push(LogEntry::from_event(event)));
    }

    let record = |operation: &str, result: tessera::pubsub::Result<()>| {
        if let Err(e) = result {
            tracing::info!(operation, error = %e, "operation rejected");
            log.lock().push(LogEntry::rejected(operation, e));
        }
    };

    record("connect", handler.connect().await);
    record("subscribe", handler.subscribe(channel).await);
    for message in messages {
        record("publish", handler.publish(channel, message.clone()).await);
    }
    record("disconnect", handler.disconnect().await);

    let heading = format!("{} handler on '{}'", mode, channel);
    let entries = log.lock().clone();
    Ok(create_formatter(format).format_log(&heading, &entries))
}
