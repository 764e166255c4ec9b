//! Errors from the packaging layer.

/// Failures that abort a packaging call.
///
/// Soft violations (oversized assets, style warnings) never appear
/// here; they are recorded in the validation report instead.
#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    /// Required files missing or structurally invalid.
    #[error("Packaging validation failed: {0}")]
    Validation(String),

    /// Filesystem failure while writing or removing artifacts.
    #[error("Archive I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be serialized or parsed.
    #[error("Manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// ZIP container failure.
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
