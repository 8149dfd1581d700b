use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use shamba_scout::ai::{ImageAttachment, ModelBackend, SuitabilityRanker, TextStream};
use shamba_scout::app::{LandFilter, LandSearch};
use shamba_scout::fixtures::land_listings;
use shamba_scout::{MarketError, Result};
use std::sync::{Arc, Mutex};

/// Replies with fixed scores for whatever listings the prompt mentions
struct FixedScores {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FixedScores {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ModelBackend for FixedScores {
    async fn stream_text(
        &self,
        _prompt: &str,
        _image: Option<&ImageAttachment>,
    ) -> Result<TextStream> {
        Ok(stream::empty().boxed())
    }

    async fn generate_json(&self, prompt: &str, _schema: &serde_json::Value) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

const MAIZE_AND_BEANS: &str = r#"[
    {"id": 1, "suitabilityScore": 85, "reason": "Loam soil with a water source suits maize and beans."},
    {"id": 2, "suitabilityScore": 20, "reason": "Sandy commercial plot drains too fast."},
    {"id": 3, "suitabilityScore": 60, "reason": "Good loam, but relies on rainfall."},
    {"id": 4, "suitabilityScore": 45, "reason": "Black cotton soil needs careful drainage."}
]"#;

#[tokio::test]
async fn maize_and_beans_shows_three_ranked_cards() {
    let backend = FixedScores::new(MAIZE_AND_BEANS);
    let ranker = SuitabilityRanker::new(Some(backend.clone() as Arc<dyn ModelBackend>));

    let mut search = LandSearch::new(land_listings());
    search.set_query("maize and beans");
    assert!(search.analyze(&ranker).await);

    let cards = search.enriched().expect("results applied");
    let ids: Vec<_> = cards.iter().map(|c| c.listing.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    let scores: Vec<_> = cards.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![85, 60, 45]);
    assert_eq!(
        cards[0].reason,
        "Loam soil with a water source suits maize and beans."
    );
    assert!(cards.iter().all(|c| !c.reason.is_empty()));

    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("maize and beans"));
    assert!(prompts[0].contains("Black Cotton"));
}

#[tokio::test]
async fn ranker_returns_exactly_the_submitted_ids() {
    let backend = FixedScores::new(MAIZE_AND_BEANS);
    let ranker = SuitabilityRanker::new(Some(backend as Arc<dyn ModelBackend>));

    let results = ranker.rank("maize and beans", &land_listings()).await.unwrap();
    let mut ids: Vec<_> = results.iter().map(|r| r.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn filtered_set_rejects_reply_for_other_plots() {
    let backend = FixedScores::new(MAIZE_AND_BEANS);
    let ranker = SuitabilityRanker::new(Some(backend as Arc<dyn ModelBackend>));

    let mut search = LandSearch::new(land_listings());
    search.set_filter(LandFilter {
        water_source: Some(true),
        ..LandFilter::default()
    });
    search.set_query("maize and beans");

    // Reply scores plots 3 and 4, which were never submitted
    assert!(!search.analyze(&ranker).await);
    assert!(search.enriched().is_none());
    assert!(search.notice().is_some());
}

#[tokio::test]
async fn missing_credential_surfaces_notice() {
    let ranker = SuitabilityRanker::new(None);
    let err = ranker.rank("coffee", &land_listings()).await.unwrap_err();
    assert!(matches!(err, MarketError::ServiceUnavailable));

    let mut search = LandSearch::new(land_listings());
    search.set_query("coffee");
    assert!(!search.analyze(&ranker).await);
    assert_eq!(search.notice(), Some(err.notice()));
}
