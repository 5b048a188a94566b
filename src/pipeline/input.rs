//! Input handling: validate a local PDF and prepare its bytes for upload.
//!
//! The PDF travels to the model as inline base64 rather than a rendered
//! image per page — the extractor reads the document wholesale, so there is
//! no rasterisation stage. We validate the `%PDF` magic bytes up front so
//! callers get a meaningful error instead of an opaque model refusal.

use crate::error::CatalogError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The PDF file magic: every valid PDF starts with `%PDF`.
const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// True when the byte buffer starts with the PDF magic.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.len() >= PDF_MAGIC.len() && &bytes[..PDF_MAGIC.len()] == PDF_MAGIC
}

/// Read a local PDF, validating existence, readability, and magic bytes.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, CatalogError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => CatalogError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CatalogError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    if !is_pdf(&bytes) {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(CatalogError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Read PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Base64-encode PDF bytes for the model's `inline_data` part.
pub fn encode_pdf(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded PDF → {} bytes base64", b64.len());
    b64
}

/// A display name for the `pdf` part of the enrichment form.
pub fn file_name(path: impl AsRef<Path>) -> String {
    PathBuf::from(path.as_ref())
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string())
}
