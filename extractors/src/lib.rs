//! Extractors Crate
//!
//! This crate turns unstructured text into structured contact records.
//!
//! # Architecture
//!
//! - **Types**: `ContactFields` and the `Extractor` trait live in the `shared-types` crate
//! - **Implementations**: Concrete extractors are implemented in this crate
//!
//! # Available Extractors
//!
//! - `BusinessCardExtractor`: Multi-pass heuristic extraction from business card OCR text
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::BusinessCardExtractor;
//! use shared_types::Extractor;
//!
//! let extractor = BusinessCardExtractor::new();
//! let contact = extractor.extract(&ocr_text);
//! ```

pub mod business_card;

pub use business_card::BusinessCardExtractor;

// Re-export the Extractor trait from shared-types for convenience
pub use shared_types::Extractor;
