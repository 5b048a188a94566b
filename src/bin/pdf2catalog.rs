//! CLI binary for pdf2catalog.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints or writes results.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2catalog::{
    extract, DisplaySource, ExportBatch, ExtractionConfig, ExtractionProgressCallback,
    ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner reporting each pipeline phase. The pipeline is a
/// single sequential timeline, so one message line at a time is enough.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Extracting");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, pdf_bytes: usize) {
        self.bar
            .set_message(format!("Sending PDF to model ({} KiB)…", pdf_bytes / 1024));
    }

    fn on_response_received(&self, reply_chars: usize) {
        self.bar
            .set_message(format!("Parsing model reply ({reply_chars} chars)…"));
    }

    fn on_records_extracted(&self, count: usize) {
        self.bar
            .println(format!("  {} {} products extracted", green("✓"), count));
    }

    fn on_enrich_start(&self, count: usize) {
        self.bar.set_prefix("Enriching");
        self.bar
            .set_message(format!("Submitting PDF + {count} records…"));
    }

    fn on_enrich_complete(&self, count: usize) {
        self.bar
            .println(format!("  {} {} enriched records", green("✓"), count));
    }

    fn on_enrich_error(&self, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!("  {} enrichment failed: {}", red("✗"), red(&msg)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract products (pretty JSON on stdout)
  pdf2catalog catalogue.pdf

  # Category label applied to every product
  pdf2catalog --category "Lighting" catalogue.pdf

  # Write the export artifact next to the input
  pdf2catalog catalogue.pdf -o products.json

  # Re-process through an enrichment API
  pdf2catalog --enrich-url https://api.example.com/extract catalogue.pdf

  # Export the raw extraction records instead of normalized products
  pdf2catalog --raw catalogue.pdf -o extracted.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY           Gemini API key (required)
  PDF2CATALOG_MODEL        Override the model ID
  PDF2CATALOG_ENRICH_URL   Enrichment API URL
  PDF2CATALOG_CATEGORY     Default category label

SETUP:
  1. Set API key:   export GEMINI_API_KEY=AIza...
  2. Extract:       pdf2catalog catalogue.pdf -o products.json
"#;

/// Extract structured product records from a PDF catalogue.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2catalog",
    version,
    about = "Extract structured product records from PDF catalogues using Gemini",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Category label applied to every extracted product.
    #[arg(short = 'c', long, env = "PDF2CATALOG_CATEGORY")]
    category: Option<String>,

    /// Gemini model ID.
    #[arg(long, env = "PDF2CATALOG_MODEL")]
    model: Option<String>,

    /// Enrichment API URL; when unset the enrichment step is skipped.
    #[arg(long, env = "PDF2CATALOG_ENRICH_URL")]
    enrich_url: Option<String>,

    /// Skip the enrichment step even when an URL is configured.
    #[arg(long)]
    no_enrich: bool,

    /// Write the export artifact to this file instead of stdout.
    /// A directory gets the date-stamped default file name.
    #[arg(short, long, env = "PDF2CATALOG_OUTPUT")]
    output: Option<PathBuf>,

    /// Export the raw extraction records instead of normalized products.
    #[arg(long)]
    raw: bool,

    /// Path to a text file containing a custom extraction prompt.
    #[arg(long, env = "PDF2CATALOG_PROMPT")]
    prompt: Option<PathBuf>,

    /// Model sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2CATALOG_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Disable the progress spinner.
    #[arg(long, env = "PDF2CATALOG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CATALOG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the artifact itself.
    #[arg(short, long, env = "PDF2CATALOG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

    let mut builder = ExtractionConfig::builder()
        .api_key(api_key)
        .temperature(cli.temperature);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.as_str());
    }
    if !cli.no_enrich {
        if let Some(ref url) = cli.enrich_url {
            builder = builder.enrich_url(url.as_str());
        }
    }
    if let Some(ref prompt_path) = cli.prompt {
        let prompt = std::fs::read_to_string(prompt_path)
            .with_context(|| format!("Failed to read prompt file '{}'", prompt_path.display()))?;
        builder = builder.prompt(prompt);
    }

    let progress: Option<Arc<CliProgressCallback>> = if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(Arc::clone(&cb) as ProgressCallback);
        Some(cb)
    } else {
        None
    };

    let config = builder.build().context("Invalid configuration")?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let result = extract(&cli.input, cli.category.as_deref(), &config).await;
    if let Some(ref cb) = progress {
        cb.finish();
    }
    let output = result.context("Extraction failed")?;

    if !cli.quiet {
        let source = match output.display_source() {
            DisplaySource::Products => "extracted",
            DisplaySource::Enriched => "enriched",
        };
        eprintln!(
            "{} {} products ({}) in {}  {}",
            green("✔"),
            bold(&output.products.len().to_string()),
            source,
            format_duration(output.stats.total_duration_ms),
            dim(&format!(
                "model {}ms, enrich {}ms",
                output.stats.model_duration_ms, output.stats.enrich_duration_ms
            )),
        );
        if let Some(ref e) = output.enrich_error {
            eprintln!("{} enrichment failed: {e}", red("⚠"));
        }
    }

    // ── Emit the artifact ────────────────────────────────────────────────
    let batch = if cli.raw || output.display_source() == DisplaySource::Products {
        ExportBatch::Raw(output.records.clone())
    } else {
        ExportBatch::Enriched(output.enriched.clone())
    };

    match cli.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(batch.file_name(Local::now().date_naive()))
            } else {
                path
            };
            batch
                .write_to_file(&path)
                .await
                .context("Failed to write export file")?;
            if !cli.quiet {
                eprintln!("{} wrote {}", green("✔"), path.display());
            }
        }
        None => {
            let json = if cli.raw || batch.is_empty() || output.display_source() == DisplaySource::Enriched
            {
                batch.to_pretty_json().context("Failed to serialize records")?
            } else {
                serde_json::to_string_pretty(&output.products)
                    .context("Failed to serialize products")?
            };
            println!("{json}");
        }
    }

    Ok(())
}

fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}
