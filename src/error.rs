/// Result type alias for the generation pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the generation pipeline.
///
/// These cover the fatal extraction and composition failures; persistence
/// failures never reach here, they are handled inside the serializer and
/// reported as a boolean result.
#[derive(Debug)]
pub enum Error {
    /// A registered class could not be instantiated. Fatal for the whole
    /// run; there is no partial-document fallback.
    Extraction { class: String, source: anyhow::Error },
    /// An endpoint references a model that is not registered.
    UnresolvedModel { endpoint: String, model: String },
    /// A model references a parent model that is not registered.
    UnresolvedParentModel { model: String, parent: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Extraction { class, source } => {
                write!(f, "Failed to instantiate class {}: {}", class, source)
            }
            Error::UnresolvedModel { endpoint, model } => {
                write!(f, "Endpoint {} references unknown model {}", endpoint, model)
            }
            Error::UnresolvedParentModel { model, parent } => {
                write!(f, "Model {} references unknown parent model {}", model, parent)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Extraction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
