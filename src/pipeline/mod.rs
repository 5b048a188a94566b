//! Pipeline stages for PDF-to-catalog extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. point `llm` at a different model endpoint) without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ llm ──▶ parse ──▶ normalize ──▶ enrich
//! (PDF)   (Gemini)  (JSON     (Product     (multipart
//!                    array)    records)     POST)
//! ```
//!
//! 1. [`input`]  — validate the PDF on disk and read its bytes
//! 2. [`llm`]    — one `generateContent` call carrying the prompt plus the
//!    PDF as inline base64; returns the reply text
//! 3. [`parse`]  — locate the first top-level JSON array in the reply and
//!    deserialize it as raw extraction records
//! 4. [`enrich`] — re-submit the PDF and the raw records to the remote
//!    enrichment API; the only other stage with network I/O
//!
//! Normalization lives outside the pipeline in [`crate::normalize`]
//! because it is pure and shared with the session orchestrator.

pub mod enrich;
pub mod input;
pub mod llm;
pub mod parse;
