//! Protocol table access.
//!
//! The engine only needs the rows, in table order. Implementations:
//! - `FileProtocolSource`: CSV, JSON or YAML file (chosen by extension)
//! - `InMemoryProtocolSource`: rows built in code (tests, embedding)

use painrx_common::{PainRxError, ProtocolRow, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub trait ProtocolSource: Send + Sync {
    /// Every protocol row, in source order.
    fn rows(&self) -> Result<Vec<ProtocolRow>>;
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InMemoryProtocolSource {
    rows: Vec<ProtocolRow>,
}

impl InMemoryProtocolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn with(mut self, row: ProtocolRow) -> Self {
        self.rows.push(row);
        self
    }
}

impl From<Vec<ProtocolRow>> for InMemoryProtocolSource {
    fn from(rows: Vec<ProtocolRow>) -> Self {
        Self { rows }
    }
}

impl ProtocolSource for InMemoryProtocolSource {
    fn rows(&self) -> Result<Vec<ProtocolRow>> {
        Ok(self.rows.clone())
    }
}

// ── File-backed ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Csv,
    Json,
    Yaml,
}

impl TableFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(PainRxError::ProtocolSource(format!(
                "unsupported protocol table format '{}' ({})",
                other,
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileProtocolSource {
    path: PathBuf,
}

impl FileProtocolSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_csv(content: &str) -> Result<Vec<ProtocolRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut rows = Vec::new();
        for record in reader.deserialize::<ProtocolRow>() {
            rows.push(record?);
        }
        Ok(rows)
    }
}

impl ProtocolSource for FileProtocolSource {
    fn rows(&self) -> Result<Vec<ProtocolRow>> {
        let format = TableFormat::from_path(&self.path)?;
        let content = std::fs::read_to_string(&self.path)?;
        debug!("Reading protocol table {} as {:?}", self.path.display(), format);

        let rows = match format {
            TableFormat::Csv => Self::parse_csv(&content)?,
            TableFormat::Json => serde_json::from_str(&content)?,
            TableFormat::Yaml => serde_yaml::from_str(&content)?,
        };

        info!("Loaded {} protocol rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
