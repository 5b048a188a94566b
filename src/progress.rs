//! Progress-callback trait for extraction phase events.
//!
//! Inject an `Arc<dyn ExtractionProgressCallback>` via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its phases.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal spinner, a UI status line, or a log —
//! without the library knowing anything about how the host application
//! communicates. All methods have default no-op implementations so callers
//! only override what they care about.

use std::sync::Arc;

/// Called by the extraction pipeline as it moves through its phases.
///
/// The pipeline is a single sequential timeline, so events arrive in
/// order and never concurrently; `Send + Sync` is still required so the
/// callback can live inside a shareable config.
pub trait ExtractionProgressCallback: Send + Sync {
    /// The PDF has been read and the model request is about to be sent.
    fn on_extraction_start(&self, pdf_bytes: usize) {
        let _ = pdf_bytes;
    }

    /// The model replied; `reply_chars` is the length of the raw text.
    fn on_response_received(&self, reply_chars: usize) {
        let _ = reply_chars;
    }

    /// The reply parsed into `count` raw records, now normalized.
    fn on_records_extracted(&self, count: usize) {
        let _ = count;
    }

    /// The enrichment submission is starting for `count` records.
    fn on_enrich_start(&self, count: usize) {
        let _ = count;
    }

    /// Enrichment succeeded with `count` returned records.
    fn on_enrich_complete(&self, count: usize) {
        let _ = count;
    }

    /// Enrichment failed; the normalized products remain usable.
    fn on_enrich_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        extracted: AtomicUsize,
        enrich_errors: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_records_extracted(&self, count: usize) {
            self.extracted.store(count, Ordering::SeqCst);
        }

        fn on_enrich_error(&self, _error: &str) {
            self.enrich_errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(1024);
        cb.on_response_received(2048);
        cb.on_records_extracted(3);
        cb.on_enrich_start(3);
        cb.on_enrich_complete(3);
        cb.on_enrich_error("HTTP 500");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            extracted: AtomicUsize::new(0),
            enrich_errors: AtomicUsize::new(0),
        };
        tracker.on_records_extracted(3);
        tracker.on_enrich_error("boom");
        assert_eq!(tracker.extracted.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.enrich_errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_records_extracted(2);
    }
}
