//! Session orchestrator: the two-step upload wizard as a state machine.
//!
//! Phases: `Idle → Extracting → Extracted → ApiSubmitting → Done`, with
//! `Failed` reachable from `Extracting` and `ApiSubmitting`. The
//! orchestrator owns the [`Catalog`] plus both record sequences and
//! recovers every pipeline error at this boundary into a user-visible
//! status string — nothing here is fatal to the process.
//!
//! Partial success is explicit: a successful extraction followed by a
//! failed enrichment leaves the normalized products in the catalog and
//! visible, with the failure reported alongside.
//!
//! ## Concurrent re-upload
//!
//! [`ExtractionOrchestrator::upload`] takes `&mut self`, so a second
//! upload cannot start while one is in flight — overlapping completions
//! mutating the catalog are ruled out by construction, and callers queue
//! naturally by awaiting.

use crate::catalog::Catalog;
use crate::config::ExtractionConfig;
use crate::error::CatalogError;
use crate::export::ExportBatch;
use crate::extract::{extract, DisplaySource};
use crate::pipeline::input;
use crate::record::{ApiExtractionRecord, RawExtractionRecord};
use std::path::Path;
use tracing::{debug, info};

/// Where the upload wizard currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing submitted yet, or the last input was ignored.
    #[default]
    Idle,
    /// The model call is outstanding.
    Extracting,
    /// Records parsed and normalized; catalog populated.
    Extracted,
    /// The enrichment submission is outstanding.
    ApiSubmitting,
    /// The full cycle completed (with or without enrichment results).
    Done,
    /// A step failed; see [`ExtractionOrchestrator::error`].
    Failed,
}

/// Drives one extraction session and owns its state.
pub struct ExtractionOrchestrator {
    config: ExtractionConfig,
    catalog: Catalog,
    records: Vec<RawExtractionRecord>,
    enriched: Vec<ApiExtractionRecord>,
    phase: Phase,
    status: String,
    error: Option<CatalogError>,
}

impl ExtractionOrchestrator {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            catalog: Catalog::new(),
            records: Vec::new(),
            enriched: Vec::new(),
            phase: Phase::Idle,
            status: String::new(),
            error: None,
        }
    }

    /// Submit a PDF with the given category label and run the full cycle.
    ///
    /// A file that does not carry the PDF magic is silently ignored: the
    /// phase stays [`Phase::Idle`] and existing state is untouched. Any
    /// other input clears prior records first, then runs extraction and
    /// enrichment; failures are recovered into [`Phase::Failed`] with a
    /// user-visible status rather than returned.
    pub async fn upload(&mut self, pdf_path: impl AsRef<Path>, category: Option<&str>) {
        let pdf_path = pdf_path.as_ref();

        // Non-PDF inputs are ignored without surfacing an error.
        match std::fs::read(pdf_path) {
            Ok(bytes) if input::is_pdf(&bytes) => {}
            _ => {
                debug!("Ignoring non-PDF input: {}", pdf_path.display());
                return;
            }
        }

        // A new upload clears all prior state before anything else runs.
        self.catalog.clear();
        self.records.clear();
        self.enriched.clear();
        self.error = None;

        self.phase = Phase::Extracting;
        self.status = "Extracting products from PDF…".to_string();

        match extract(pdf_path, category, &self.config).await {
            Ok(output) => {
                self.phase = Phase::Extracted;
                self.status = format!("Extracted {} products", output.products.len());
                self.records = output.records;
                self.catalog.set_all(output.products);

                if self.config.enrich_url.is_some() {
                    // extract() already ran the submission. Like Extracting
                    // above, this transitional phase is not observable while
                    // upload holds &mut self; it is assigned so the
                    // transition sequence stays explicit in the code.
                    self.phase = Phase::ApiSubmitting;
                    match output.enrich_error {
                        None => {
                            self.enriched = output.enriched;
                            self.phase = Phase::Done;
                            self.status = format!(
                                "Done — {} products, {} enriched",
                                self.catalog.len(),
                                self.enriched.len()
                            );
                        }
                        Some(e) => {
                            // Non-destructive: normalized products stay visible.
                            self.status = format!("Enrichment failed: {e}");
                            self.error = Some(e);
                            self.phase = Phase::Failed;
                        }
                    }
                } else {
                    self.phase = Phase::Done;
                    self.status = format!("Done — {} products", self.catalog.len());
                }
                info!("{}", self.status);
            }
            Err(e) => {
                self.status = format!("Extraction failed: {e}");
                self.error = Some(e);
                self.phase = Phase::Failed;
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Progress/status text for the UI.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The recovered error from the last failed step, if any.
    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    /// The editable catalog of normalized products.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Raw records from the last successful extraction.
    pub fn records(&self) -> &[RawExtractionRecord] {
        &self.records
    }

    /// Enriched records from the last successful enrichment.
    pub fn enriched(&self) -> &[ApiExtractionRecord] {
        &self.enriched
    }

    /// Which sequence to render: enriched records win when non-empty.
    pub fn display_source(&self) -> DisplaySource {
        if self.enriched.is_empty() {
            DisplaySource::Products
        } else {
            DisplaySource::Enriched
        }
    }

    /// Build the export batch for the currently preferred shape.
    pub fn export_batch(&self) -> ExportBatch {
        match self.display_source() {
            DisplaySource::Products => ExportBatch::Raw(self.records.clone()),
            DisplaySource::Enriched => ExportBatch::Enriched(self.enriched.clone()),
        }
    }
}
