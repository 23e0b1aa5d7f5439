//! Error types for the Fabula library.
//!
//! This crate provides the foundation error types used throughout the Fabula ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabula_error::{FabulaResult, JsonError};
//!
//! fn decode_payload() -> FabulaResult<String> {
//!     Err(JsonError::new("unexpected end of input"))?
//! }
//!
//! match decode_payload() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod generation;
mod json;
mod provider;
mod store;

pub use builder::{BuilderError, BuilderErrorKind};
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use store::{StoreError, StoreErrorKind};
