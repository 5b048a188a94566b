//! Offline integration tests for the extraction workflow.
//!
//! Everything here runs without network access: a canned model reply is
//! parsed, normalized, loaded into a catalog, edited, and exported — the
//! full post-model pipeline end to end.

use chrono::NaiveDate;
use pdf2catalog::pipeline::parse::extract_record_array;
use pdf2catalog::{
    normalize, Catalog, CatalogError, Currency, ExportBatch, ExtractionConfig,
    ExtractionOrchestrator, Phase, Product, ProductField, RawExtractionRecord,
};
use std::io::Write as _;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A reply in the shape Gemini actually returns: prose, a fenced JSON
/// array, trailing commentary.
const MODEL_REPLY: &str = r#"Here are the products I found in the catalogue:

```json
[
  {
    "product_id": 1,
    "product_name": "Aurora Desk Lamp",
    "specifications": [
      {"spec_name": "Wattage", "spec_value": "9W"},
      {"spec_name": "Colour", "spec_value": "Matte Black"},
      {"spec_name": "Wattage", "spec_value": "12W"}
    ],
    "images": ["/9j/4AAQSkZJRgABAQ", "Not Present"],
    "price": "₹1,499",
    "Description": "A dimmable LED desk lamp with a weighted base.",
    "page_number": 3
  },
  {
    "product_id": 2,
    "product_name": "unclear",
    "specifications": [],
    "images": [],
    "price": "Not Present",
    "Description": "extraction_failed"
  }
]
```

Let me know if you need anything else."#;

fn parse_and_normalize(category: Option<&str>) -> (Vec<RawExtractionRecord>, Vec<Product>) {
    let records = extract_record_array(MODEL_REPLY).unwrap();
    let products = records.iter().map(|r| normalize(r, category)).collect();
    (records, products)
}

#[test]
fn reply_parses_into_records_in_file_order() {
    let (records, _) = parse_and_normalize(None);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].product_name, "Aurora Desk Lamp");
    assert_eq!(records[1].product_id, 2);
    // Raw records preserve the model's output verbatim, sentinels included.
    assert_eq!(records[1].price, "Not Present");
    assert_eq!(records[1].description, "extraction_failed");
}

#[test]
fn normalization_produces_display_ready_products() {
    let (_, products) = parse_and_normalize(Some("Lighting"));
    let lamp = &products[0];

    assert_eq!(lamp.id, "1");
    assert_eq!(lamp.price, "1,499");
    assert_eq!(lamp.currency, Currency::Inr);
    assert_eq!(lamp.category, "Lighting");
    assert_eq!(lamp.page_number, Some(3));

    // Duplicate spec name: last value wins, first position kept.
    assert_eq!(lamp.specifications.get("Wattage"), Some("12W"));
    let order: Vec<&str> = lamp.specifications.iter().map(|(n, _)| n).collect();
    assert_eq!(order, vec!["Wattage", "Colour"]);

    // Bare base64 wrapped into a data URI, sentinel entry dropped.
    assert_eq!(lamp.images.len(), 1);
    assert!(lamp.images[0].starts_with("data:image/jpeg;base64,"));
}

#[test]
fn sentinel_record_degrades_to_safe_defaults() {
    let (_, products) = parse_and_normalize(None);
    let ghost = &products[1];

    assert_eq!(ghost.name, "unclear"); // name passes through unchanged
    assert_eq!(ghost.price, "");
    assert_eq!(ghost.currency, Currency::Inr);
    // Only "Not Present" blanks the description; any other text, the
    // image sentinels included, passes through untouched.
    assert_eq!(ghost.description, "extraction_failed");
    assert!(ghost.images.is_empty());
    assert_eq!(ghost.category, "Extracted Product");
    assert_eq!(ghost.page_number, None);
}

#[test]
fn catalog_edit_then_export_round_trip() {
    let (records, products) = parse_and_normalize(Some("Lighting"));

    let mut catalog = Catalog::new();
    catalog.set_all(products);

    // Review edits as the UI would issue them.
    catalog.set_field("1", ProductField::Price("1,299".into()));
    catalog.set_specification("1", "Warranty", "2 years");
    catalog.toggle_edit("2");

    let lamp = catalog.get("1").unwrap();
    assert_eq!(lamp.price, "1,299");
    assert_eq!(lamp.specifications.get("Warranty"), Some("2 years"));
    assert!(catalog.get("2").unwrap().is_editing);

    // The export batch carries the raw records untouched by catalog edits.
    let batch = ExportBatch::Raw(records);
    let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
    assert_eq!(batch.file_name(date), "extracted_products_2026-08-27.json");

    let json = batch.to_pretty_json().unwrap();
    let reparsed: Vec<RawExtractionRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed.len(), 2);
    assert_eq!(reparsed[0].price, "₹1,499");
}

#[tokio::test]
async fn export_writes_a_parseable_file() {
    let (records, _) = parse_and_normalize(None);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("products.json");

    ExportBatch::Raw(records).write_to_file(&path).await.unwrap();

    let written = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: Vec<RawExtractionRecord> = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn reply_without_array_is_a_parse_error() {
    let err = extract_record_array("I could not find any products in this document.").unwrap_err();
    assert!(matches!(err, CatalogError::ExtractionParse { .. }));
}

/// Serve exactly one HTTP exchange on a random local port: drain the full
/// request (headers plus content-length body), write `response`, close.
async fn respond_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&chunk[..n]),
            }
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]);
                let body_len: usize = headers
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });
    url
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn enrichment_http_500_is_an_api_request_error() {
    let url = respond_once(http_response("500 Internal Server Error", "")).await;

    let err = pdf2catalog::pipeline::enrich::submit(&url, b"%PDF-1.4".to_vec(), "a.pdf", &[])
        .await
        .unwrap_err();

    match err {
        CatalogError::ApiRequest { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected ApiRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn orchestrator_keeps_products_when_enrichment_returns_500() {
    let reply = serde_json::json!({
        "candidates": [{"content": {"parts": [{
            "text": "[{\"product_id\": 1, \"product_name\": \"Lamp\", \"price\": \"₹500\"}]"
        }]}}]
    })
    .to_string();
    let model_url = respond_once(http_response("200 OK", &reply)).await;
    let enrich_url = respond_once(http_response("500 Internal Server Error", "")).await;

    let mut pdf = tempfile::NamedTempFile::new().unwrap();
    pdf.write_all(b"%PDF-1.4 minimal").unwrap();

    let config = ExtractionConfig::builder()
        .api_key("AIza-test")
        .endpoint(model_url)
        .enrich_url(enrich_url)
        .build()
        .unwrap();

    let mut orch = ExtractionOrchestrator::new(config);
    orch.upload(pdf.path(), Some("Lighting")).await;

    // Extraction succeeded, enrichment got a 500: the normalized products
    // stay in the catalog and the failure is reported alongside.
    assert_eq!(orch.phase(), Phase::Failed);
    assert!(!orch.catalog().is_empty(), "products must stay visible");
    assert_eq!(orch.catalog().get("1").unwrap().price, "500");
    assert!(matches!(
        orch.error(),
        Some(CatalogError::ApiRequest { status: Some(500), .. })
    ));
}
