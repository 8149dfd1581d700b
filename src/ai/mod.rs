pub mod client;
pub mod guide;
pub mod ranker;
pub mod traits;
pub mod types;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use client::GeminiClient;
pub use guide::{AiGuide, GuideStream};
pub use ranker::{rank_listings, SuitabilityRanker, MIN_SUITABILITY_SCORE};
pub use traits::{ModelBackend, TextStream};
pub use types::ImageAttachment;

use crate::config::Config;
use std::sync::Arc;

/// Shared backend for the guide and ranker, absent without a credential
pub fn backend_from_config(config: &Config) -> Option<Arc<dyn ModelBackend>> {
    GeminiClient::from_config(config).map(|client| Arc::new(client) as Arc<dyn ModelBackend>)
}
