pub mod contact;
pub mod extraction;
pub mod merge;

pub use contact::{ContactField, ContactFields, ImageRef, NoteEntry};
pub use extraction::{ExtractionMethod, Extractor, ParseError};
pub use merge::{MergeConflict, Resolution};
