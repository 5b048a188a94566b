//! Extraction entry point: PDF in, normalized product records out.
//!
//! [`extract`] drives the full sequence: read the PDF, call the model,
//! parse its reply, normalize every record, then (when an enrichment URL
//! is configured) submit the PDF plus the raw records to the enrichment
//! API. The two network calls are strictly sequential — the enrichment
//! submission never starts before normalization of the extraction reply
//! completes.
//!
//! ## Fatal vs. non-fatal
//!
//! A missing file, an unusable credential, or an unparseable model reply
//! is fatal: `extract` returns `Err` and there is nothing to show. An
//! enrichment failure is different — the normalized products from the
//! successful extraction step are already useful, so the error is stored
//! inside [`ExtractionOutput::enrich_error`] and the call still returns
//! `Ok`. Callers decide their own tolerance.

use crate::config::ExtractionConfig;
use crate::error::CatalogError;
use crate::normalize::{self, FALLBACK_CATEGORY};
use crate::pipeline::{enrich, input, llm, parse};
use crate::prompts;
use crate::record::{ApiExtractionRecord, Product, RawExtractionRecord};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Which record sequence the caller should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySource {
    /// The normalized products from the extraction step.
    Products,
    /// The enrichment API's records (non-empty, so they take precedence).
    Enriched,
}

/// Wall-clock timing for one extraction run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionStats {
    /// Records parsed from the model reply.
    pub record_count: usize,
    /// Records returned by the enrichment API (0 when skipped or failed).
    pub enriched_count: usize,
    pub model_duration_ms: u64,
    pub enrich_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The result of one extraction run.
///
/// `records` and `products` are index-aligned: `products[i]` is the
/// normalization of `records[i]`, in file order.
#[derive(Debug)]
pub struct ExtractionOutput {
    /// Raw records exactly as parsed from the model reply.
    pub records: Vec<RawExtractionRecord>,
    /// Normalized, catalog-ready products.
    pub products: Vec<Product>,
    /// Enrichment results; empty when skipped, failed, or none returned.
    pub enriched: Vec<ApiExtractionRecord>,
    /// The enrichment failure, when one occurred. Non-destructive: the
    /// products above are still valid.
    pub enrich_error: Option<CatalogError>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// Preferred render source: enriched records win when non-empty.
    pub fn display_source(&self) -> DisplaySource {
        if self.enriched.is_empty() {
            DisplaySource::Products
        } else {
            DisplaySource::Enriched
        }
    }
}

/// Extract product records from a local PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `pdf_path` — local PDF file
/// * `category` — user-supplied category label; `None` uses the fallback
/// * `config`   — extraction configuration
///
/// # Errors
/// Returns `Err(CatalogError)` for fatal failures only: bad input file,
/// model request failure, or an unparseable reply. A failed enrichment
/// call is reported through [`ExtractionOutput::enrich_error`] instead.
pub async fn extract(
    pdf_path: impl AsRef<Path>,
    category: Option<&str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, CatalogError> {
    let total_start = Instant::now();
    let pdf_path = pdf_path.as_ref();
    info!("Starting extraction: {}", pdf_path.display());

    // ── Step 1: Read and validate the PDF ────────────────────────────────
    let pdf_bytes = input::read_pdf(pdf_path)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(pdf_bytes.len());
    }

    // ── Step 2: Model call ───────────────────────────────────────────────
    let prompt = config
        .prompt
        .clone()
        .unwrap_or_else(|| prompts::extraction_prompt(category.unwrap_or(FALLBACK_CATEGORY)));
    let pdf_base64 = input::encode_pdf(&pdf_bytes);

    let model_start = Instant::now();
    let reply = llm::request_extraction(config, &prompt, &pdf_base64).await?;
    let model_duration_ms = model_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_response_received(reply.len());
    }

    // ── Step 3: Parse ────────────────────────────────────────────────────
    let records = parse::extract_record_array(&reply)?;
    info!("Extracted {} records in {}ms", records.len(), model_duration_ms);

    // ── Step 4: Normalize, preserving file order ─────────────────────────
    let products: Vec<Product> = records.iter().map(|r| normalize::normalize(r, category)).collect();
    if let Some(ref cb) = config.progress_callback {
        cb.on_records_extracted(records.len());
    }

    // ── Step 5: Enrichment (optional, non-destructive on failure) ────────
    let mut enriched = Vec::new();
    let mut enrich_error = None;
    let mut enrich_duration_ms = 0;

    if let Some(ref url) = config.enrich_url {
        if let Some(ref cb) = config.progress_callback {
            cb.on_enrich_start(records.len());
        }
        let enrich_start = Instant::now();
        match enrich::submit(url, pdf_bytes, &input::file_name(pdf_path), &records).await {
            Ok(results) => {
                enrich_duration_ms = enrich_start.elapsed().as_millis() as u64;
                info!("Enrichment returned {} records in {}ms", results.len(), enrich_duration_ms);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_enrich_complete(results.len());
                }
                enriched = results;
            }
            Err(e) => {
                enrich_duration_ms = enrich_start.elapsed().as_millis() as u64;
                warn!("Enrichment failed (keeping extracted products): {e}");
                if let Some(ref cb) = config.progress_callback {
                    cb.on_enrich_error(&e.to_string());
                }
                enrich_error = Some(e);
            }
        }
    }

    let stats = ExtractionStats {
        record_count: records.len(),
        enriched_count: enriched.len(),
        model_duration_ms,
        enrich_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ExtractionOutput {
        records,
        products,
        enriched,
        enrich_error,
        stats,
    })
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    pdf_path: impl AsRef<Path>,
    category: Option<&str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, CatalogError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CatalogError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(pdf_path, category, config))
}
