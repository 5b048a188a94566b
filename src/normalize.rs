//! Normalization: raw extraction records → catalog-ready [`Product`]s.
//!
//! ## Why a total function?
//!
//! The model's output is only *mostly* well-formed. Rather than propagate
//! per-field errors into the catalog (and leave the user staring at a
//! broken list), every unexpected value degrades to a safe default: a
//! sentinel price becomes "not set", an unreadable image entry is dropped,
//! a sentinel description becomes empty. [`normalize`] accepts any value
//! matching the [`RawExtractionRecord`] shape and always returns a
//! renderable [`Product`] — it never fails and never panics.
//!
//! The one deliberate pass-through: a `("Not Present", "Not Present")`
//! specification pair is retained as a literal map entry, because "no
//! specifications available" is information the catalog displays.

use crate::record::{
    Currency, Product, RawExtractionRecord, SpecificationMap, EXTRACTION_FAILED, NOT_PRESENT,
    UNCLEAR,
};

/// Category label applied when the caller supplies none.
pub const FALLBACK_CATEGORY: &str = "Extracted Product";

/// Convert one raw extraction record into a catalog [`Product`].
///
/// `category` is the user-supplied category label; `None` falls back to
/// [`FALLBACK_CATEGORY`]. The record's `product_id` becomes the product id
/// in decimal string form — ids are unique within one batch only, and a
/// re-extraction replaces the whole collection rather than merging by id.
pub fn normalize(record: &RawExtractionRecord, category: Option<&str>) -> Product {
    let (price, currency) = split_price(&record.price);

    let description = if record.description == NOT_PRESENT {
        String::new()
    } else {
        record.description.clone()
    };

    let images: Vec<String> = record
        .images
        .iter()
        .filter_map(|entry| canonicalize_image(entry))
        .collect();

    let specifications: SpecificationMap = record
        .specifications
        .iter()
        .map(|s| (s.spec_name.as_str(), s.spec_value.as_str()))
        .collect();

    Product {
        id: record.product_id.to_string(),
        name: record.product_name.clone(),
        price,
        currency,
        category: category.unwrap_or(FALLBACK_CATEGORY).to_string(),
        description,
        specifications,
        images,
        is_editing: false,
        page_number: record.page_number,
    }
}

/// Split an extracted price string into a glyph-free amount and a currency.
///
/// The sentinel and the empty string both mean "not set": empty amount,
/// INR default. Otherwise the currency is detected by glyph presence in
/// priority order (₹, $, €, £ — first match wins), every glyph occurrence
/// is stripped, and the remainder is trimmed. No numeric validation: a
/// unit suffix like `500/kg` passes through untouched.
pub fn split_price(raw: &str) -> (String, Currency) {
    if raw.is_empty() || raw == NOT_PRESENT {
        return (String::new(), Currency::default());
    }

    let currency = Currency::DETECTION_ORDER
        .into_iter()
        .find(|c| raw.contains(c.glyph()))
        .unwrap_or_default();

    let mut amount = raw.to_string();
    for c in Currency::DETECTION_ORDER {
        amount = amount.replace(c.glyph(), "");
    }

    (amount.trim().to_string(), currency)
}

/// Canonicalize one image entry into a renderable source, or drop it.
///
/// * Empty strings and the image sentinels map to `None`.
/// * `data:` URIs and HTTP(S) URLs are kept verbatim.
/// * Anything else is treated as bare base64 and wrapped as a `data:` URI
///   with the MIME type sniffed from the payload prefix.
pub fn canonicalize_image(entry: &str) -> Option<String> {
    if entry.trim().is_empty()
        || entry == UNCLEAR
        || entry == NOT_PRESENT
        || entry == EXTRACTION_FAILED
    {
        return None;
    }
    if entry.starts_with("data:") || entry.starts_with("http") {
        return Some(entry.to_string());
    }
    Some(format!("data:{};base64,{entry}", sniff_mime(entry)))
}

/// Guess the MIME type of a bare base64 payload from its first characters.
///
/// Base64 prefixes are stable per format: JPEG files start with `0xFFD8`
/// (`/9j/`), PNG with its 8-byte signature (`iVBORw0KGgo`), GIF with
/// `GIF89a`/`GIF87a` (`R0lGODlh`). Unrecognised payloads default to JPEG,
/// the dominant format in scanned catalogues.
fn sniff_mime(payload: &str) -> &'static str {
    if payload.starts_with("/9j/") {
        "image/jpeg"
    } else if payload.starts_with("iVBORw0KGgo") {
        "image/png"
    } else if payload.starts_with("R0lGODlh") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawSpecification;

    fn record() -> RawExtractionRecord {
        RawExtractionRecord {
            product_id: 1,
            product_name: "Lamp".into(),
            specifications: vec![RawSpecification::new(NOT_PRESENT, NOT_PRESENT)],
            images: vec![],
            price: "₹500".into(),
            description: NOT_PRESENT.into(),
            page_number: Some(2),
        }
    }

    #[test]
    fn lamp_scenario() {
        let product = normalize(&record(), Some("Lighting"));

        assert_eq!(product.id, "1");
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, "500");
        assert_eq!(product.currency, Currency::Inr);
        assert_eq!(product.category, "Lighting");
        assert_eq!(product.description, "");
        assert_eq!(product.specifications.get(NOT_PRESENT), Some(NOT_PRESENT));
        assert!(product.images.is_empty());
        assert_eq!(product.page_number, Some(2));
        assert!(!product.is_editing);
    }

    #[test]
    fn price_sentinel_yields_empty_price_inr() {
        assert_eq!(split_price(NOT_PRESENT), (String::new(), Currency::Inr));
        assert_eq!(split_price(""), (String::new(), Currency::Inr));
    }

    #[test]
    fn currency_precedence_rupee_beats_dollar() {
        let (amount, currency) = split_price("₹500 ($6)");
        assert_eq!(currency, Currency::Inr);
        assert_eq!(amount, "500 (6)");
    }

    #[test]
    fn currency_detection_per_glyph() {
        assert_eq!(split_price("$12.50").1, Currency::Usd);
        assert_eq!(split_price("€99").1, Currency::Eur);
        assert_eq!(split_price("£45").1, Currency::Gbp);
        assert_eq!(split_price("1200").1, Currency::Inr);
    }

    #[test]
    fn price_keeps_unit_suffix_without_validation() {
        let (amount, currency) = split_price("₹100/kg");
        assert_eq!(amount, "100/kg");
        assert_eq!(currency, Currency::Inr);
    }

    #[test]
    fn price_trims_surrounding_whitespace() {
        assert_eq!(split_price("₹ 500 ").0, "500");
    }

    #[test]
    fn image_sentinels_and_empties_are_dropped() {
        for entry in [UNCLEAR, NOT_PRESENT, EXTRACTION_FAILED, "", "   "] {
            assert_eq!(canonicalize_image(entry), None, "entry: {entry:?}");
        }
    }

    #[test]
    fn image_output_never_longer_than_input() {
        let mut rec = record();
        rec.images = vec![
            UNCLEAR.into(),
            "/9j/abc".into(),
            String::new(),
            "https://example.com/a.jpg".into(),
        ];
        let product = normalize(&rec, None);
        assert!(product.images.len() <= rec.images.len());
        assert_eq!(product.images.len(), 2);
    }

    #[test]
    fn bare_png_payload_gets_png_data_uri() {
        let out = canonicalize_image("iVBORw0KGgoAAAANSU").unwrap();
        assert!(out.starts_with("data:image/png;base64,"));
        assert!(out.ends_with("iVBORw0KGgoAAAANSU"));
    }

    #[test]
    fn bare_payload_mime_sniffing() {
        assert!(canonicalize_image("/9j/4AAQ")
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
        assert!(canonicalize_image("R0lGODlhAQ")
            .unwrap()
            .starts_with("data:image/gif;base64,"));
        // Unknown prefix defaults to JPEG.
        assert!(canonicalize_image("QUJDRA==")
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn data_uri_and_url_pass_through_unchanged() {
        assert_eq!(
            canonicalize_image("data:image/gif;base64,XYZ").as_deref(),
            Some("data:image/gif;base64,XYZ")
        );
        assert_eq!(
            canonicalize_image("http://example.com/p.jpg").as_deref(),
            Some("http://example.com/p.jpg")
        );
        assert_eq!(
            canonicalize_image("https://example.com/p.jpg").as_deref(),
            Some("https://example.com/p.jpg")
        );
    }

    #[test]
    fn image_order_preserved_no_dedup() {
        let mut rec = record();
        rec.images = vec![
            "https://a.example/1.jpg".into(),
            "https://a.example/1.jpg".into(),
            "/9j/zz".into(),
        ];
        let product = normalize(&rec, None);
        assert_eq!(
            product.images,
            vec![
                "https://a.example/1.jpg".to_string(),
                "https://a.example/1.jpg".to_string(),
                "data:image/jpeg;base64,/9j/zz".to_string(),
            ]
        );
    }

    #[test]
    fn duplicate_spec_names_fold_last_wins() {
        let mut rec = record();
        rec.specifications = vec![
            RawSpecification::new("Weight", "10kg"),
            RawSpecification::new("Power", "500W"),
            RawSpecification::new("Weight", "12kg"),
        ];
        let product = normalize(&rec, None);
        assert_eq!(product.specifications.get("Weight"), Some("12kg"));
        let order: Vec<&str> = product.specifications.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["Weight", "Power"]);
    }

    #[test]
    fn empty_specs_stay_empty() {
        let mut rec = record();
        rec.specifications = vec![];
        assert!(normalize(&rec, None).specifications.is_empty());
    }

    #[test]
    fn missing_category_uses_fallback_label() {
        assert_eq!(normalize(&record(), None).category, FALLBACK_CATEGORY);
    }

    #[test]
    fn description_text_passes_through() {
        let mut rec = record();
        rec.description = "A bright lamp".into();
        assert_eq!(normalize(&rec, None).description, "A bright lamp");
    }

    #[test]
    fn only_not_present_blanks_description() {
        // The image sentinels are ordinary text in the description field.
        let mut rec = record();
        for text in [UNCLEAR, EXTRACTION_FAILED] {
            rec.description = text.into();
            assert_eq!(normalize(&rec, None).description, text);
        }
        rec.description = NOT_PRESENT.into();
        assert_eq!(normalize(&rec, None).description, "");
    }

    #[test]
    fn normalize_is_total_on_degenerate_input() {
        let rec = RawExtractionRecord {
            product_id: -3,
            product_name: String::new(),
            specifications: vec![],
            images: vec![String::new(), UNCLEAR.into()],
            price: "$$$".into(),
            description: String::new(),
            page_number: None,
        };
        let product = normalize(&rec, None);
        assert_eq!(product.id, "-3");
        assert_eq!(product.price, "");
        assert_eq!(product.currency, Currency::Usd);
        assert!(product.images.is_empty());
    }
}
