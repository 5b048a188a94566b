//! Error types for the pdf2catalog library.
//!
//! A single [`CatalogError`] enum covers the whole pipeline. Three variants
//! carry the load:
//!
//! * [`CatalogError::Configuration`] — the extraction service is unusable
//!   (missing or placeholder credential). Surfaced at config build time,
//!   before any user action is possible.
//! * [`CatalogError::ExtractionParse`] — the model reply contained no JSON
//!   array, or the array was malformed.
//! * [`CatalogError::ApiRequest`] — the enrichment call returned a non-2xx
//!   status or failed at the network level. This one is *non-destructive*:
//!   the orchestrator keeps the already-normalized products visible.
//!
//! The normalizer itself has no error type — it is total by design, so the
//! catalog is always renderable.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2catalog library.
#[derive(Debug, Error)]
pub enum CatalogError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The extraction service credential is absent or a placeholder.
    #[error("Extraction service is not configured: {hint}")]
    Configuration { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The extraction request itself failed (network, auth, HTTP error).
    #[error("Extraction service request failed: {detail}")]
    ModelRequest { detail: String },

    /// No JSON array was found in the model reply, or it was malformed.
    #[error("Could not parse product records from the model response: {detail}")]
    ExtractionParse { detail: String },

    // ── Enrichment errors ─────────────────────────────────────────────────
    /// The enrichment API returned a non-2xx status or a network failure.
    #[error("Enrichment API request failed{}: {detail}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    ApiRequest {
        /// HTTP status when the server answered; `None` on network failure.
        status: Option<u16>,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an export file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// True for failures the orchestrator treats as non-destructive: the
    /// products from a preceding successful extraction remain visible.
    pub fn is_enrichment_failure(&self) -> bool {
        matches!(self, CatalogError::ApiRequest { .. })
    }
}
