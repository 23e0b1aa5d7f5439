//! LLM provider integrations for Fabula.
//!
//! This crate provides the [`OpenAiCompatClient`], a driver for any provider
//! exposing an OpenAI-compatible chat completions endpoint (OpenAI itself,
//! DeepSeek, Groq, local gateways, and so on).
//!
//! # Example
//!
//! ```no_run
//! use fabula_models::OpenAiCompatClient;
//! use fabula_interface::TextGenerator;
//! use fabula_core::GenerateRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiCompatClient::openai_from_env("gpt-4o-mini")?;
//! let request = GenerateRequest::new("Outline a heist story in three acts.");
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
