//! The extraction prompt sent alongside the PDF.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking a rule (say, the description
//!    length guidance) happens in exactly one place.
//! 2. **Testability** — unit tests can inspect the instruction string
//!    without a live model call.
//!
//! Callers can override the whole prompt via
//! [`crate::config::ExtractionConfig::prompt`]; this builder is used only
//! when no override is provided.

/// Build the extraction instruction for the given category label.
///
/// The prompt pins the output schema (including the capital-D
/// `Description` key and the sentinel conventions the normalizer relies
/// on), asks for prices in Indian Rupees, limits descriptions to 250
/// characters — a request to the model, not a constraint enforced locally —
/// and restricts output to the top 3 products in document order.
pub fn extraction_prompt(category: &str) -> String {
    format!(
        r#"You are a structured data extraction system for "{category}" product specifications.
Extract clean, normalized product data from the provided content.

Schema (output format):
{{
  "product_id": int,
  "product_name": string,
  "specifications": [
    {{"spec_name": string, "spec_value": string}}
  ],
  "images": [base64 string],
  "price": string,
  "Description": string,
  "page_number": int
}}

1. **Product Names**:
- Use descriptive product names only (e.g., "Decorative Table Lamp") and do not include model numbers or internal codes.

2. **Specifications Extraction**:
- Extract all relevant specifications found in the document.
- Preserve special characters (≤, ≥, ±, °C, %) in their original form.
- For each specification, create a spec_name and spec_value pair.
- If no specifications are available for a product, both the spec_name and spec_value must be set to "Not Present".
- Use normalized, consistent spec_name values (e.g., "Weight", "Dimensions", "Capacity", "Material", "Brand", "Model", "Power", "Voltage").
- Do not include price information in the specifications.

3. **Price Extraction**:
- Extract the product price if available, standardized with currency (e.g., "₹100/kg", "₹500/piece").
- Provide the price in Indian Rupees (₹).
- If the price is missing or ambiguous, set "price": "Not Present".

4. **Description**:
- Extract the product description provided in the PDF, summarized in max 250 characters.
- Focus on key differentiators and main features.
- If no description is provided in the PDF, set "Description": "Not Present". Do not invent one.

5. **Data Quality**:
- Standardize similar specification names (e.g., "Wi-Fi" and "Wireless LAN" → "Wi-Fi").
- Correct spelling errors and keep measurement units consistent.
- Mark unclear image values as "unclear".

6. **Multiple Products**:
- Treat variants as separate products with unique integer product_id values.
- Extract only the top 3 products from the PDF, exactly in the order they appear.
- Include "page_number" for the page each product appears on.

Return only a valid JSON array of product objects, no additional text or explanations."#
    )
}
