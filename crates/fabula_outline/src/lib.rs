//! Outline generation engine for the Fabula novel co-authoring library.
//!
//! This crate turns a generation request into persisted, contiguously
//! numbered outline entries: it plans batch rounds, assembles prompts from
//! project context, parses imperfect AI responses leniently, and commits
//! each round independently so interrupted runs keep their finished work.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod context;
mod extraction;
mod generator;
mod in_memory;
mod progress;
mod prompt;
mod records;
mod request;

pub use batch::{BATCH_SIZE, BatchPlan, BatchRound};
pub use context::{ContinuationContext, OutlineContext};
pub use extraction::parse_outline_response;
pub use generator::{OutlineBatch, OutlineGenerator};
pub use in_memory::InMemoryOutlineStore;
pub use progress::ProgressReporter;
pub use prompt::{complete_outline, outline_continuation, stage_instruction};
pub use records::ChapterRecord;
pub use request::{GenerationMode, OutlineRequest, OutlineRequestBuilder, PlotStage};
