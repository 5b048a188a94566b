//! # pdf2catalog
//!
//! Extract structured product records from PDF catalogues using Gemini.
//!
//! ## Why this crate?
//!
//! Product catalogues are layout-heavy PDFs: specification tables, price
//! blocks, photos. Instead of template-based scraping, this crate sends
//! the document to a generative model with a schema-pinned prompt and then
//! does the part a model cannot be trusted with deterministically — the
//! **normalization pipeline** that turns loosely structured model output
//! into validated, display-ready product records (price/currency split,
//! image URI canonicalization, sentinel handling).
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate magic bytes, read, base64-encode
//!  ├─ 2. Model      one generateContent call with the extraction prompt
//!  ├─ 3. Parse      locate the JSON array in the reply (bracket matching)
//!  ├─ 4. Normalize  price/currency split, image canonicalization, sentinels
//!  ├─ 5. Enrich     optional multipart re-submission to a remote API
//!  └─ 6. Output     products + raw/enriched records + per-step stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2catalog::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY (and PDF2CATALOG_ENRICH_URL, if set)
//!     let config = ExtractionConfig::from_env()?;
//!     let output = extract("catalogue.pdf", Some("Lighting"), &config).await?;
//!     for product in &output.products {
//!         println!("{}: {} {}", product.name, product.currency, product.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Library vs. session use
//!
//! [`extract`] is the one-shot entry point. For an interactive session —
//! field-level edits, per-record edit mode, export — wrap the result in
//! the [`orchestrator::ExtractionOrchestrator`], which owns a
//! [`catalog::Catalog`] and recovers all pipeline errors into a
//! user-visible status.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::{Catalog, ProductField};
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::CatalogError;
pub use export::ExportBatch;
pub use extract::{extract, extract_sync, DisplaySource, ExtractionOutput, ExtractionStats};
pub use normalize::normalize;
pub use orchestrator::{ExtractionOrchestrator, Phase};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{
    ApiExtractionRecord, Currency, Product, RawExtractionRecord, RawSpecification,
    SpecificationMap,
};
