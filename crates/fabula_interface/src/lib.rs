//! Trait definitions for the Fabula outline generation library.
//!
//! This crate provides the two seams the outline pipeline is built around:
//! [`TextGenerator`] for AI providers and [`OutlineStore`] for persistence,
//! plus the [`ProgressEvent`] contract streamed to delivery layers.

mod events;
mod store;
mod traits;

pub use events::ProgressEvent;
pub use store::{OutlineStore, ReorderEntry, ReorderOutcome};
pub use traits::TextGenerator;
