//! Reply parsing: locate and deserialize the product array in model output.
//!
//! ## Why bracket matching?
//!
//! The prompt asks for "only valid JSON", but models routinely wrap the
//! array in prose or a ```json fence. Instead of trusting the whole reply
//! to be JSON, we scan for the first top-level `[ … ]` span — tracking
//! string literals and escapes so brackets inside values don't confuse the
//! depth count — and hand only that span to serde. Everything around it is
//! discarded.
//!
//! Absence of an array, or a malformed one, is an
//! [`CatalogError::ExtractionParse`] with the underlying message attached.

use crate::error::CatalogError;
use crate::record::RawExtractionRecord;
use tracing::debug;

/// Parse the model reply into an ordered sequence of raw records.
pub fn extract_record_array(text: &str) -> Result<Vec<RawExtractionRecord>, CatalogError> {
    let span = locate_json_array(text).ok_or_else(|| CatalogError::ExtractionParse {
        detail: "no JSON array found in response".to_string(),
    })?;

    let records: Vec<RawExtractionRecord> =
        serde_json::from_str(span).map_err(|e| CatalogError::ExtractionParse {
            detail: e.to_string(),
        })?;

    debug!("Parsed {} extraction records", records.len());
    Ok(records)
}

/// Find the first balanced top-level JSON array in `text`.
///
/// Starts at the first `[` and walks forward counting bracket depth,
/// skipping over string literals (and escape sequences within them).
/// Returns the span including both brackets, or `None` when no `[` exists
/// or the array never closes.
pub fn locate_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
