//! Data model: raw extraction records, enrichment records, and the
//! normalized [`Product`] owned by the catalog.
//!
//! Two *immutable* wire shapes exist side by side:
//!
//! * [`RawExtractionRecord`] — one product as emitted by the Gemini
//!   extraction call. Field names (including the capital-D `Description`)
//!   match the JSON schema the prompt asks for.
//! * [`ApiExtractionRecord`] — one product as returned by the remote
//!   enrichment API. It carries a single `image` string instead of a list
//!   and is rendered from its own shape, never merged into [`Product`].
//!
//! [`Product`] is the session-owned shape derived once per record via
//! [`crate::normalize::normalize`] and then mutated in place through
//! [`crate::catalog::Catalog`].
//!
//! ## Sentinels
//!
//! The extractor uses reserved strings instead of nulls to mean "field
//! intentionally absent". They are ordinary values at this layer — only the
//! normalizer interprets them — with one documented exception: the
//! `("Not Present", "Not Present")` specification pair survives
//! normalization as a literal map entry.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel for a field the extractor could not populate.
pub const NOT_PRESENT: &str = "Not Present";
/// Sentinel for an image the extractor saw but could not read.
pub const UNCLEAR: &str = "unclear";
/// Sentinel for an image whose extraction failed outright.
pub const EXTRACTION_FAILED: &str = "extraction_failed";

/// One name/value specification pair as emitted by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpecification {
    pub spec_name: String,
    pub spec_value: String,
}

impl RawSpecification {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            spec_name: name.into(),
            spec_value: value.into(),
        }
    }
}

/// One product as extracted by the model, prior to normalization.
///
/// Every field defaults so that imperfect model output (a missing key, an
/// omitted array) still deserializes; the normalizer degrades gracefully
/// from there. `product_id` is unique within one extraction batch only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExtractionRecord {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub specifications: Vec<RawSpecification>,
    /// Each entry is a bare base64 payload, a `data:` URI, an HTTP(S) URL,
    /// or one of the image sentinels.
    #[serde(default)]
    pub images: Vec<String>,
    /// Currency-glyph-prefixed amount (`₹500/kg`) or [`NOT_PRESENT`].
    #[serde(default)]
    pub price: String,
    /// Free text or [`NOT_PRESENT`]. Capital-D key per the model schema.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// 1-based source page.
    #[serde(default)]
    pub page_number: Option<u32>,
}

/// One product as returned by the enrichment API.
///
/// Distinct from [`RawExtractionRecord`]: a single `image` field (bare
/// base64 or [`NOT_PRESENT`]) replaces the images list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiExtractionRecord {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub specifications: Vec<RawSpecification>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub page_number: Option<u32>,
}

/// Currency detected from the price string's glyph. INR is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// The glyph this currency is recognised by in extracted price strings.
    pub fn glyph(self) -> char {
        match self {
            Currency::Inr => '₹',
            Currency::Usd => '$',
            Currency::Eur => '€',
            Currency::Gbp => '£',
        }
    }

    /// Detection priority when a price string carries several glyphs:
    /// ₹ wins, then $, then €, then £.
    pub const DETECTION_ORDER: [Currency; 4] =
        [Currency::Inr, Currency::Usd, Currency::Eur, Currency::Gbp];
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        };
        f.write_str(code)
    }
}

/// Insertion-ordered specification map with the documented duplicate-key
/// behaviour: writing an existing name replaces its value **in place** —
/// last value wins, first position kept.
///
/// Serializes as a JSON object in insertion order. Backed by a vector
/// because specification lists are tiny (a handful of entries) and the
/// in-place overwrite quirk must stay observable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationMap {
    entries: Vec<(String, String)>,
}

impl SpecificationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. On a duplicate name the value is replaced at
    /// the name's original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for SpecificationMap {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (n, v) in iter {
            map.insert(n, v);
        }
        map
    }
}

impl Serialize for SpecificationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (n, v) in &self.entries {
            map.serialize_entry(n, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SpecificationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = SpecificationMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of specification names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = SpecificationMap::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    map.insert(name, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// A normalized, catalog-owned product record.
///
/// Invariants maintained by [`crate::normalize::normalize`]:
/// * `images` holds only renderable sources (`data:`/`http` URIs) —
///   sentinels and empty strings never appear.
/// * `price` is either empty ("not set") or the glyph-stripped remainder of
///   the extracted string; the currency travels separately in `currency`.
/// * `specifications` is empty only when the source declared zero entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: String,
    pub currency: Currency,
    pub category: String,
    pub description: String,
    pub specifications: SpecificationMap,
    pub images: Vec<String>,
    #[serde(rename = "isEditing", default)]
    pub is_editing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_map_last_value_wins_first_position_kept() {
        let mut map = SpecificationMap::new();
        map.insert("Weight", "10kg");
        map.insert("Material", "Steel");
        map.insert("Weight", "12kg");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Weight"), Some("12kg"));
        let order: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["Weight", "Material"]);
    }

    #[test]
    fn spec_map_serializes_as_object_in_insertion_order() {
        let map: SpecificationMap = [("Power", "500W"), ("Weight", "28kg")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Power":"500W","Weight":"28kg"}"#);
    }

    #[test]
    fn spec_map_round_trips_sentinel_entry() {
        let map: SpecificationMap = [(NOT_PRESENT, NOT_PRESENT)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        let back: SpecificationMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(NOT_PRESENT), Some(NOT_PRESENT));
    }

    #[test]
    fn raw_record_tolerates_missing_fields() {
        let record: RawExtractionRecord =
            serde_json::from_str(r#"{"product_id": 7, "product_name": "Pump"}"#).unwrap();
        assert_eq!(record.product_id, 7);
        assert!(record.specifications.is_empty());
        assert!(record.images.is_empty());
        assert_eq!(record.price, "");
        assert_eq!(record.page_number, None);
    }

    #[test]
    fn raw_record_reads_capital_d_description() {
        let record: RawExtractionRecord =
            serde_json::from_str(r#"{"product_id": 1, "Description": "A lamp"}"#).unwrap();
        assert_eq!(record.description, "A lamp");
    }

    #[test]
    fn api_record_has_single_image_field() {
        let record: ApiExtractionRecord = serde_json::from_str(
            r#"{"product_id": 2, "product_name": "Fan", "image": "/9j/abc", "price": "₹900"}"#,
        )
        .unwrap();
        assert_eq!(record.image, "/9j/abc");
    }

    #[test]
    fn currency_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Inr).unwrap(), "\"INR\"");
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
    }

    #[test]
    fn product_serializes_is_editing_camel_case() {
        let product = Product {
            id: "1".into(),
            name: "Lamp".into(),
            price: "500".into(),
            currency: Currency::Inr,
            category: "Lighting".into(),
            description: String::new(),
            specifications: SpecificationMap::new(),
            images: vec![],
            is_editing: false,
            page_number: Some(2),
        };
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"isEditing\":false"));
        assert!(json.contains("\"page_number\":2"));
    }
}
