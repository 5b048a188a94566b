//! Configuration for PDF-to-catalog extraction.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. The credential is validated once at build
//! time: an absent or placeholder key is a [`CatalogError::Configuration`]
//! surfaced before any PDF can be submitted, rather than being discovered
//! on first use.
//!
//! No request timeout is configured here. The workflow suspends while each
//! of the two external calls is outstanding and relies on the services'
//! own timeout behaviour.

use crate::error::CatalogError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default Gemini model for catalog extraction.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint base.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Placeholder credentials shipped in documentation; never valid.
const PLACEHOLDER_KEYS: [&str; 2] = ["YOUR_GEMINI_API_KEY", "YOUR_ACTUAL_GEMINI_API_KEY_HERE"];

/// Configuration for one extraction session.
///
/// # Example
/// ```rust
/// use pdf2catalog::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .api_key("AIza-example")
///     .enrich_url("https://api.example.com/extract")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Gemini API key. Required; validated at build time.
    pub api_key: String,

    /// Model identifier, e.g. "gemini-1.5-flash".
    pub model: String,

    /// REST endpoint base (override for proxies or test servers).
    pub endpoint: String,

    /// Enrichment API URL. When `None`, the enrichment step is skipped and
    /// the extraction output carries no enriched records.
    pub enrich_url: Option<String>,

    /// Sampling temperature for the extraction completion. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to what is printed on the
    /// page — exactly what structured extraction wants.
    pub temperature: f32,

    /// Custom extraction prompt. If `None`, [`crate::prompts::extraction_prompt`]
    /// builds the default from the category label.
    pub prompt: Option<String>,

    /// Optional per-phase progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("enrich_url", &self.enrich_url)
            .field("temperature", &self.temperature)
            .field("prompt", &self.prompt.as_ref().map(|p| p.len()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::default()
    }

    /// Build a config from the environment: `GEMINI_API_KEY` (required)
    /// and `PDF2CATALOG_ENRICH_URL` (optional).
    pub fn from_env() -> Result<Self, CatalogError> {
        let mut builder = Self::builder();
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Ok(url) = std::env::var("PDF2CATALOG_ENRICH_URL") {
            if !url.is_empty() {
                builder = builder.enrich_url(url);
            }
        }
        builder.build()
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    api_key: String,
    model: String,
    endpoint: String,
    enrich_url: Option<String>,
    temperature: f32,
    prompt: Option<String>,
    progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            enrich_url: None,
            temperature: 0.2,
            prompt: None,
            progress_callback: None,
        }
    }
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn enrich_url(mut self, url: impl Into<String>) -> Self {
        self.enrich_url = Some(url.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress_callback = Some(Arc::clone(&cb));
        self
    }

    /// Build the configuration, validating the credential and endpoints.
    pub fn build(self) -> Result<ExtractionConfig, CatalogError> {
        if self.api_key.trim().is_empty() {
            return Err(CatalogError::Configuration {
                hint: "no API key provided — set GEMINI_API_KEY or call .api_key(…)".into(),
            });
        }
        if PLACEHOLDER_KEYS.contains(&self.api_key.as_str()) || self.api_key.starts_with("YOUR_") {
            return Err(CatalogError::Configuration {
                hint: "API key is a placeholder — replace it with a real Gemini credential".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("model must not be empty".into()));
        }
        if let Some(ref url) = self.enrich_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CatalogError::InvalidConfig(format!(
                    "enrichment URL must be HTTP(S), got '{url}'"
                )));
            }
        }

        Ok(ExtractionConfig {
            api_key: self.api_key,
            model: self.model,
            endpoint: self.endpoint,
            enrich_url: self.enrich_url,
            temperature: self.temperature,
            prompt: self.prompt,
            progress_callback: self.progress_callback,
        })
    }
}
