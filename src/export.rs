//! Export artifact: a pretty-printed JSON file of the extraction batch.
//!
//! Which shape is being exported is carried as an explicit tagged variant
//! decided at the point of creation — not inferred later by sniffing for a
//! field unique to one record type. The variant also disambiguates the
//! default file name.
//!
//! Writes are atomic (temp file + rename) so an interrupted export never
//! leaves a truncated file behind.

use crate::error::CatalogError;
use crate::record::{ApiExtractionRecord, RawExtractionRecord};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

/// One exportable batch, tagged with which record shape it holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportBatch {
    /// Raw records from the extraction step.
    Raw(Vec<RawExtractionRecord>),
    /// Records from the enrichment API.
    Enriched(Vec<ApiExtractionRecord>),
}

impl ExportBatch {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        match self {
            ExportBatch::Raw(records) => records.len(),
            ExportBatch::Enriched(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Date-stamped default file name, disambiguated by batch kind.
    pub fn file_name(&self, date: NaiveDate) -> String {
        let stem = match self {
            ExportBatch::Raw(_) => "extracted_products",
            ExportBatch::Enriched(_) => "api_products",
        };
        format!("{stem}_{}.json", date.format("%Y-%m-%d"))
    }

    /// Pretty-printed UTF-8 JSON of the record array (the array only — the
    /// tag exists in memory, not in the artifact).
    pub fn to_pretty_json(&self) -> Result<String, CatalogError> {
        let json = match self {
            ExportBatch::Raw(records) => serde_json::to_string_pretty(records),
            ExportBatch::Enriched(records) => serde_json::to_string_pretty(records),
        };
        json.map_err(|e| CatalogError::Internal(e.to_string()))
    }

    /// Write the batch to `path` atomically (temp file + rename).
    pub async fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let json = self.to_pretty_json()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    CatalogError::OutputWriteFailed {
                        path: path.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|e| CatalogError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| CatalogError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        info!("Exported {} records to {}", self.len(), path.display());
        Ok(())
    }
}
