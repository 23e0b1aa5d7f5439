//! Fabula - AI-assisted novel outline generation
//!
//! Fabula generates and maintains novel outlines with an LLM as co-author.
//! It plans multi-round generation batches, parses imperfect AI responses,
//! and persists every outline entry alongside a paired chapter stub so the
//! two views of the book never drift apart.
//!
//! # Features
//!
//! - **Generator Seam**: Single `TextGenerator` trait for all LLM providers
//! - **Synchronized Persistence**: Outline entries and chapter stubs move together
//! - **Batch Planning**: Long continuations split into committed rounds
//! - **Lenient Parsing**: Malformed AI output degrades instead of failing
//! - **Progress Streaming**: Typed events for UI progress reporting
//! - **Database Integration**: Optional PostgreSQL persistence
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fabula::{OpenAiCompatClient, OutlineGenerator, OutlineRequestBuilder, InMemoryOutlineStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryOutlineStore::new();
//!     let project = store.add_project("Signal to Noise").await;
//!
//!     let driver = OpenAiCompatClient::openai_from_env("gpt-4o-mini")?;
//!     let generator = OutlineGenerator::new(Arc::new(store), driver);
//!
//!     let request = OutlineRequestBuilder::default()
//!         .project_id(project.id)
//!         .chapter_count(12)
//!         .build()?;
//!
//!     let batch = generator.generate_batch(&request).await?;
//!     println!("Generated {} chapters", batch.new_chapters);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL database integration
//!
//! # Architecture
//!
//! Fabula is organized as a workspace with focused crates:
//!
//! - `fabula_core` - Core data types (Project, Outline, Chapter, etc.)
//! - `fabula_interface` - TextGenerator and OutlineStore trait definitions
//! - `fabula_error` - Error types
//! - `fabula_models` - LLM provider implementations
//! - `fabula_outline` - Outline generation engine
//! - `fabula_database` - PostgreSQL integration
//!
//! This crate (`fabula`) re-exports everything for convenience.

// Re-export core crates (always available)
pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::*;
pub use fabula_models::OpenAiCompatClient;
pub use fabula_outline::{
    BATCH_SIZE, BatchPlan, BatchRound, ChapterRecord, ContinuationContext, GenerationMode,
    InMemoryOutlineStore, OutlineBatch, OutlineContext, OutlineGenerator, OutlineRequest,
    OutlineRequestBuilder, PlotStage, ProgressReporter, complete_outline, outline_continuation,
    parse_outline_response, stage_instruction,
};

// Re-export optional crates based on features
#[cfg(feature = "database")]
pub use fabula_database::*;

pub mod telemetry;
