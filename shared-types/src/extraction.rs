use serde::{Deserialize, Serialize};

use crate::ContactFields;

/// Core trait that all contact extractors implement.
///
/// Extraction is total: noisy or empty input yields a partially filled (or
/// empty) record, never an error.
pub trait Extractor {
    /// Extract contact fields from raw OCR text
    fn extract(&self, raw_text: &str) -> ContactFields;

    /// What extraction method does this extractor use?
    fn method(&self) -> ExtractionMethod;

    /// Get extractor version for tracking
    fn version(&self) -> String {
        "1.0.0".to_string()
    }
}

/// Extraction methods available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    PatternBased,
}

/// Errors raised when parsing user-supplied field names and resolutions
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown contact field: {0}")]
    UnknownField(String),

    #[error("Unknown resolution '{0}', expected 'old' or 'new'")]
    UnknownResolution(String),
}
