use crate::ai::traits::ModelBackend;
use crate::ai::util::strip_code_blocks;
use crate::error::{MarketError, Result};
use crate::models::{Listing, ListingId, RankedListing, SuitabilityResult};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Listings scoring below this are hidden from the ranked view
pub const MIN_SUITABILITY_SCORE: u8 = 40;

/// The subset of a land listing sent to the model
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LandSummary<'a> {
    id: ListingId,
    location: &'a str,
    soil_type: Option<&'a str>,
    water_source: Option<bool>,
    land_use: Option<&'a str>,
    ai_tips: &'a [String],
}

impl<'a> From<&'a Listing> for LandSummary<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            id: listing.id,
            location: &listing.location,
            soil_type: listing.soil_type.as_deref(),
            water_source: listing.water_source,
            land_use: listing.land_use.as_deref(),
            ai_tips: &listing.ai_tips,
        }
    }
}

/// Response schema: one `{id, suitabilityScore, reason}` object per listing
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER" },
                "suitabilityScore": {
                    "type": "INTEGER",
                    "description": "How well the land fits the query, from 0 to 100",
                    "minimum": 0,
                    "maximum": 100
                },
                "reason": {
                    "type": "STRING",
                    "description": "One short sentence explaining the score"
                }
            },
            "required": ["id", "suitabilityScore", "reason"]
        }
    })
}

/// Scores land listings against a free-text farming query
#[derive(Clone)]
pub struct SuitabilityRanker {
    backend: Option<Arc<dyn ModelBackend>>,
}

impl SuitabilityRanker {
    pub fn new(backend: Option<Arc<dyn ModelBackend>>) -> Self {
        Self { backend }
    }

    /// Score every listing. The result holds exactly one entry per input id.
    pub async fn rank(&self, query: &str, listings: &[Listing]) -> Result<Vec<SuitabilityResult>> {
        let backend = self.backend.as_ref().ok_or(MarketError::ServiceUnavailable)?;

        if listings.is_empty() {
            debug!("No listings to analyze");
            return Ok(Vec::new());
        }

        let prompt = build_prompt(query, listings)?;
        info!(query = %query, listings = listings.len(), "Requesting suitability analysis");

        let raw = backend.generate_json(&prompt, &response_schema()).await?;
        let results = parse_results(&raw, listings)?;

        info!(results = results.len(), "Suitability analysis complete");
        Ok(results)
    }
}

fn build_prompt(query: &str, listings: &[Listing]) -> Result<String> {
    let summaries: Vec<LandSummary> = listings.iter().map(LandSummary::from).collect();
    let payload = serde_json::to_string_pretty(&summaries)
        .map_err(|e| MarketError::SchemaViolation(format!("Could not encode listings: {e}")))?;

    Ok(format!(
        "You are an agricultural land advisor in Uganda. A farmer is looking for land for: \"{query}\".\n\
         Score how suitable each plot below is for that purpose from 0 (unsuitable) to 100 (ideal), \
         considering soil type, water source, current land use, location and the listed farming tips.\n\
         Return one entry for every plot, using its id, with a one-sentence reason.\n\n\
         Plots:\n{payload}"
    ))
}

/// Decode and validate a structured reply against the submitted listings
pub fn parse_results(raw: &str, listings: &[Listing]) -> Result<Vec<SuitabilityResult>> {
    let results: Vec<SuitabilityResult> = serde_json::from_str(strip_code_blocks(raw))
        .map_err(|e| {
            warn!(error = %e, "Suitability response did not match schema");
            MarketError::SchemaViolation(format!("Invalid suitability response: {e}"))
        })?;

    if let Some(bad) = results.iter().find(|r| r.suitability_score > 100) {
        return Err(MarketError::SchemaViolation(format!(
            "Score {} for listing {} is out of range",
            bad.suitability_score, bad.id
        )));
    }

    let expected: BTreeSet<ListingId> = listings.iter().map(|l| l.id).collect();
    let mut seen = BTreeSet::new();
    for result in &results {
        if !seen.insert(result.id) {
            return Err(MarketError::SchemaViolation(format!(
                "Listing {} scored more than once",
                result.id
            )));
        }
    }
    if seen != expected {
        let missing: Vec<_> = expected.difference(&seen).collect();
        let unknown: Vec<_> = seen.difference(&expected).collect();
        return Err(MarketError::SchemaViolation(format!(
            "Result ids do not match listings (missing {missing:?}, unknown {unknown:?})"
        )));
    }

    Ok(results)
}

/// Listings scoring at least `threshold`, best first. Listings without a
/// result are left out; equal scores keep listing order.
pub fn rank_listings(
    listings: &[Listing],
    results: &[SuitabilityResult],
    threshold: u8,
) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = listings
        .iter()
        .filter_map(|listing| {
            let result = results.iter().find(|r| r.id == listing.id)?;
            (result.suitability_score >= threshold).then(|| RankedListing {
                listing: listing.clone(),
                score: result.suitability_score,
                reason: result.reason.clone(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
