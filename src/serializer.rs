//! Serialization and persistence of the composed OpenAPI document.
//!
//! The document is serialized to pretty-printed JSON with a trailing newline
//! and written wholesale to a fixed, well-known path. Persistence reports
//! success or failure as a boolean; a failed write means the document was not
//! generated, and the run carries no retry logic; regeneration from scratch
//! is always safe.

use crate::document::OpenApiDocument;
use anyhow::{Context, Result};
use log::{debug, error};
use std::fs;
use std::path::Path;

/// The well-known location the generated document is published at.
pub const DOCUMENT_OUTPUT_PATH: &str = "/usr/local/share/openapi-docgen/openapi.json";

/// Serializes an OpenAPI document to pretty-printed JSON.
///
/// The output is formatted with indentation for readability, making it
/// suitable for human review and version control. Serialization is
/// deterministic: the same document always yields the same string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Serializes the document and writes it to `path`, appending a trailing
/// newline. Parent directories are created if missing.
///
/// Returns `true` on success. Failures are logged and reported as `false`;
/// they are not escalated further.
pub fn write_document(doc: &OpenApiDocument, path: &Path) -> bool {
    match try_write_document(doc, path) {
        Ok(()) => {
            debug!("Wrote OpenAPI document to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to write OpenAPI document: {:#}", e);
            false
        }
    }
}

/// Writes the document to the well-known [`DOCUMENT_OUTPUT_PATH`].
pub fn write_document_default(doc: &OpenApiDocument) -> bool {
    write_document(doc, Path::new(DOCUMENT_OUTPUT_PATH))
}

fn try_write_document(doc: &OpenApiDocument, path: &Path) -> Result<()> {
    let mut content = serialize_json(doc)?;
    content.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, &content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
