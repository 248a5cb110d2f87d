//! Contact Merge Crate
//!
//! Combines two records describing the same person.
//!
//! Pure engine crate: the caller has already decided the records are
//! duplicates. Merging is two-step: [`diff`] proposes a draft and lists the
//! conflicts, [`apply_resolutions`] (or [`resolve_with`]) finalizes it.

pub mod engine;

pub use engine::{apply_resolutions, diff, merge, resolve_with, MergeDraft, MergeOutcome};
pub use shared_types::{MergeConflict, Resolution};
