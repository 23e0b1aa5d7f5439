//! Provider trait for text generation.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::FabulaResult;

/// Core trait every text-generation provider implements.
///
/// This is the minimal seam between the outline pipeline and an AI provider:
/// one prompt in, one completion out. Providers surface transport and API
/// failures as errors; no retry happens at this layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the given request.
    async fn generate(&self, request: &GenerateRequest) -> FabulaResult<GenerateResponse>;

    /// Provider label, e.g. `"openai"`.
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when the request carries no override.
    fn model_name(&self) -> &str;
}
