//! Model interaction: one `generateContent` call against the Gemini REST API.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so it can change without touching the request or
//! error-handling logic here. The reply is returned as raw text;
//! [`crate::pipeline::parse`] owns the job of finding the JSON array
//! inside it.
//!
//! No local timeout is applied: the visible workflow suspends while the
//! call is outstanding, and the service's own timeout governs.

use crate::config::ExtractionConfig;
use crate::error::CatalogError;
use serde_json::{json, Value};
use tracing::debug;

/// Submit the PDF and the extraction prompt; return the model's reply text.
///
/// The request carries two parts in one user turn: the natural-language
/// instruction string, then the PDF as `inline_data`
/// (`application/pdf`, base64). The reply text is expected to contain
/// exactly one JSON array of raw extraction records — "expected", not
/// enforced: schema validation happens downstream in `parse`.
pub async fn request_extraction(
    config: &ExtractionConfig,
    prompt: &str,
    pdf_base64: &str,
) -> Result<String, CatalogError> {
    let endpoint = format!(
        "{}/models/{}:generateContent?key={}",
        config.endpoint.trim_end_matches('/'),
        config.model,
        config.api_key,
    );

    let payload = json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": "application/pdf",
                            "data": pdf_base64,
                        }
                    }
                ]
            }
        ],
        "generationConfig": {
            "temperature": config.temperature,
        }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(&endpoint)
        .json(&payload)
        .send()
        .await
        .map_err(|e| CatalogError::ModelRequest {
            detail: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::ModelRequest {
            detail: format!("HTTP {status}: {body}"),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| CatalogError::ModelRequest {
            detail: format!("invalid response body: {e}"),
        })?;

    let text = candidate_text(&body).ok_or_else(|| CatalogError::ModelRequest {
        detail: "response contained no text candidate".to_string(),
    })?;

    debug!("Model reply: {} chars", text.len());
    Ok(text.to_string())
}

/// Pull the first candidate's text out of a `generateContent` reply.
fn candidate_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}
