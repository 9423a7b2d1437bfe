//! OpenAPI documentation generation engine for registered API metadata.
//!
//! This library composes a single OpenAPI 3.0 document describing an entire
//! API surface from five registered class families - endpoints, models,
//! responses, auth methods and content handlers - and persists it as JSON at
//! a well-known path. The surrounding system implements the capability
//! traits in [`interfaces`] on its classes, registers factories for them in
//! a [`registry::Registry`], and triggers generation; the document is always
//! rebuilt from scratch.
//!
//! # Architecture
//!
//! The pipeline flows one direction through several modules:
//!
//! 1. [`registry`] - Explicit registration and namespace-based discovery of
//!    class implementations
//! 2. [`extractor`] - Instantiates each registration and snapshots its
//!    declared attributes into immutable descriptors
//! 3. [`composer`] - Builds the complete document tree: info, security,
//!    shared components, and per-endpoint `paths` entries
//! 4. [`serializer`] - Serializes the document to JSON and writes it to the
//!    fixed output path
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_docgen::composer::ComposerSettings;
//! use openapi_docgen::extractor::{HttpMethod, MethodDoc};
//! use openapi_docgen::interfaces::{Endpoint, Model, VersionReporter};
//! use openapi_docgen::registry::Registry;
//! use serde_json::json;
//! use std::path::Path;
//!
//! struct SystemVersionEndpoint;
//!
//! impl Endpoint for SystemVersionEndpoint {
//!     fn url(&self) -> String { "/api/v2/system/version".to_string() }
//!     fn tag(&self) -> String { "SYSTEM".to_string() }
//!     fn model_name(&self) -> String { "SystemVersion".to_string() }
//!     fn request_methods(&self) -> Vec<HttpMethod> { vec![HttpMethod::Get] }
//!     fn method_doc(&self, _method: HttpMethod) -> MethodDoc {
//!         MethodDoc {
//!             privileges: vec!["page-system-version".to_string()],
//!             help_text: "Reads the current system version.".to_string(),
//!         }
//!     }
//! }
//!
//! struct SystemVersion;
//!
//! impl Model for SystemVersion {
//!     fn required_fields(&self) -> Vec<String> { Vec::new() }
//!     fn openapi_schema(&self) -> serde_json::Value {
//!         json!({"type": "object", "properties": {"version": {"type": "string"}}})
//!     }
//! }
//!
//! struct SystemVersionReporter;
//!
//! impl VersionReporter for SystemVersionReporter {
//!     fn current_version(&self) -> String { "2.0.0".to_string() }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_endpoint("SystemVersionEndpoint", || Ok(Box::new(SystemVersionEndpoint)));
//! registry.register_model("SystemVersion", || Ok(Box::new(SystemVersion)));
//!
//! let written = openapi_docgen::generate_to_file(
//!     &registry,
//!     ComposerSettings::default(),
//!     &SystemVersionReporter,
//!     Path::new("/usr/local/share/openapi-docgen/openapi.json"),
//! ).unwrap();
//! assert!(written);
//! ```

pub mod composer;
pub mod document;
pub mod error;
pub mod extractor;
pub mod interfaces;
pub mod registry;
pub mod serializer;

use crate::composer::{ComposerSettings, DocumentComposer};
use crate::document::OpenApiDocument;
use crate::interfaces::VersionReporter;
use crate::registry::Registry;
use log::info;
use std::path::Path;

/// Runs discovery, extraction and composition, returning the finished
/// document.
///
/// # Errors
///
/// Extraction and composition failures are fatal for the whole run; no
/// partial document is produced.
pub fn generate(
    registry: &Registry,
    settings: ComposerSettings,
    version_reporter: &dyn VersionReporter,
) -> error::Result<OpenApiDocument> {
    info!("Starting OpenAPI document generation");

    if registry.is_empty() {
        info!("Registry is empty; generating a skeleton document");
    }

    let metadata = extractor::extract_all(registry)?;
    info!(
        "Extracted metadata for {} endpoints and {} models",
        metadata.endpoints.len(),
        metadata.models.len()
    );

    let composer = DocumentComposer::new(settings, version_reporter);
    let document = composer.compose(&metadata)?;
    info!(
        "Composed OpenAPI document with {} paths and {} tags",
        document.paths.len(),
        document.tags.len()
    );

    Ok(document)
}

/// Runs the full pipeline and persists the document at `path`.
///
/// Returns `Ok(true)` when the document was written, `Ok(false)` when the
/// write failed (the failure is logged, not escalated).
///
/// # Errors
///
/// Extraction and composition failures still surface as hard errors; only
/// persistence degrades to a boolean result.
pub fn generate_to_file(
    registry: &Registry,
    settings: ComposerSettings,
    version_reporter: &dyn VersionReporter,
    path: &Path,
) -> error::Result<bool> {
    let document = generate(registry, settings, version_reporter)?;
    Ok(serializer::write_document(&document, path))
}
