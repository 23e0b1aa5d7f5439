//! Request and response types for provider text generation.

use serde::{Deserialize, Serialize};

/// Text generation request sent to a provider driver.
///
/// # Examples
///
/// ```
/// use fabula_core::GenerateRequestBuilder;
///
/// let request = GenerateRequestBuilder::default()
///     .prompt("Write a haiku about rain.")
///     .temperature(0.7_f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.temperature, Some(0.7));
/// assert!(request.model.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// Prompt text sent verbatim to the provider
    pub prompt: String,
    /// Model identifier overriding the driver default
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Request carrying only a prompt, with driver defaults for the rest.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// Text returned by a provider driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub text: String,
    /// Model that produced the text
    pub model: String,
}
