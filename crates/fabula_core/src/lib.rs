//! Core data types for the Fabula novel co-authoring library.
//!
//! This crate provides the foundation data types used across all Fabula interfaces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chapter;
mod character;
mod history;
mod outline;
mod project;
mod request;
mod snapshot;
mod text;

pub use chapter::{Chapter, DRAFT_STATUS, SUMMARY_MAX_CHARS};
pub use character::Character;
pub use history::{GenerationHistory, HistoryEntry};
pub use outline::{NewOutline, NewOutlineRecord, Outline, OutlineChanges};
pub use project::Project;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use snapshot::{SnapshotMerge, merge_snapshot};
pub use text::truncate_chars;
