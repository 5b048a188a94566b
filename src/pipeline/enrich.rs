//! Enrichment: re-submit the PDF plus raw records to the remote API.
//!
//! One `POST {enrich_url}` with multipart form data: field `pdf` carries
//! the original file bytes, field `products` the raw extraction records as
//! JSON text. The service replies `{ "results": [ApiExtractionRecord] }` —
//! an image-enriched alternative product list rendered from its own shape.
//!
//! A failure here is reported as [`CatalogError::ApiRequest`] and is
//! non-destructive by contract: callers keep the normalized products from
//! the extraction step.

use crate::error::CatalogError;
use crate::record::{ApiExtractionRecord, RawExtractionRecord};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

/// Wire shape of the enrichment API's reply body.
#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    results: Vec<ApiExtractionRecord>,
}

/// Submit the PDF and records; return the enriched record sequence.
pub async fn submit(
    enrich_url: &str,
    pdf_bytes: Vec<u8>,
    pdf_file_name: &str,
    records: &[RawExtractionRecord],
) -> Result<Vec<ApiExtractionRecord>, CatalogError> {
    let products_json =
        serde_json::to_string(records).map_err(|e| CatalogError::Internal(e.to_string()))?;

    let pdf_part = Part::bytes(pdf_bytes)
        .file_name(pdf_file_name.to_string())
        .mime_str("application/pdf")
        .map_err(|e| CatalogError::Internal(e.to_string()))?;

    let form = Form::new()
        .part("pdf", pdf_part)
        .text("products", products_json);

    info!("Submitting PDF + {} records to {}", records.len(), enrich_url);

    let client = reqwest::Client::new();
    let response = client
        .post(enrich_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .multipart(form)
        .send()
        .await
        .map_err(|e| CatalogError::ApiRequest {
            status: None,
            detail: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::ApiRequest {
            status: Some(status.as_u16()),
            detail: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        });
    }

    let body: EnrichResponse = response.json().await.map_err(|e| CatalogError::ApiRequest {
        status: Some(status.as_u16()),
        detail: format!("invalid response body: {e}"),
    })?;

    debug!("Enrichment returned {} records", body.results.len());
    Ok(body.results)
}
