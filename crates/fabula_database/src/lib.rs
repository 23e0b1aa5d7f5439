//! PostgreSQL integration for Fabula.
//!
//! This crate provides the Diesel schema, row models, and the
//! [`PgOutlineStore`] implementation of `OutlineStore` that keeps outline
//! entries and their paired chapters consistent inside database
//! transactions.
//!
//! # Example
//!
//! ```rust,ignore
//! use fabula_database::{PgOutlineStore, establish_connection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = establish_connection()?;
//! let store = PgOutlineStore::new(conn);
//! // Use store through the OutlineStore trait...
//! # Ok(())
//! # }
//! ```

mod connection;
mod models;
mod outline_store;

// Public module for external queries against the same tables
pub mod schema;

pub use connection::establish_connection;
pub use models::{
    ChapterRow, CharacterRow, GenerationHistoryRow, NewChapterRow, NewGenerationHistoryRow,
    NewOutlineRow, OutlineRow, ProjectRow,
};
pub use outline_store::PgOutlineStore;
