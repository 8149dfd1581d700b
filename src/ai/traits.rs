use crate::ai::types::ImageAttachment;
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Ordered text fragments of a streamed reply
pub type TextStream = BoxStream<'static, Result<String>>;

/// Hosted model used by the guide and the ranker
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Free-form completion, streamed as it is generated
    async fn stream_text(&self, prompt: &str, image: Option<&ImageAttachment>)
        -> Result<TextStream>;

    /// Single-shot completion constrained to `schema`; returns the raw JSON text
    async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<String>;
}
