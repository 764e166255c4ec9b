//! The content-generation adapter seam.
//!
//! The pipeline depends only on [`ContentGenerator`]; production wiring
//! injects the HTTP implementation from [`crate::api`], tests inject
//! in-memory fakes.

use async_trait::async_trait;
use modcraft_core::SectionDescriptor;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Hard failures from the generation service.
///
/// A hard failure fails the section (after retries). Malformed-but-
/// delivered payloads are not errors at this layer; they surface from
/// [`crate::content::parse_content`] and take the fallback path instead.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request never completed (network, DNS, TLS, connection reset).
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Generation service error ({status}): {body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The per-section deadline elapsed before the service answered.
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Enrichment context passed alongside the descriptor.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// HTML already accepted for earlier sections of the same design,
    /// letting the service keep structure and naming consistent.
    pub prior_html: Option<String>,
}

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// A service that turns a section descriptor into structured content.
///
/// Returns the raw structured payload; the caller is responsible for
/// typed parsing so that malformed payloads can be recovered via
/// fallback construction rather than failing the section.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        descriptor: &SectionDescriptor,
        context: &GenerationContext,
    ) -> Result<serde_json::Value, GenerationError>;
}
